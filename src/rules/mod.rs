// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility rules.
//!
//! Each rule is an independent check over the shared, read-only document.
//! Rules are grouped by theme into modules; [`registry`] fixes the order in
//! which they run, and that order is also the order of the output.

pub mod contrast;
pub mod duplicates;
pub mod forms;
pub mod images;
pub mod keyboard;
pub mod media;
pub mod page;
pub mod structure;
pub mod viewport;

use crate::config::ContrastConfig;
use crate::document::{Document, Node};
use crate::locate::LineResolver;
use crate::violation::{AffectedNode, Severity, Violation};
use tracing::warn;

/// Everything a rule may look at while evaluating one document
pub struct RuleContext<'a> {
    pub document: &'a Document,
    pub lines: &'a LineResolver<'a>,
    pub contrast: &'a ContrastConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        document: &'a Document,
        lines: &'a LineResolver<'a>,
        contrast: &'a ContrastConfig,
    ) -> Self {
        Self {
            document,
            lines,
            contrast,
        }
    }

    /// Elements matching one of the rule's built-in selectors
    ///
    /// Selectors here are fixed strings, so a parse failure is a programming
    /// error; it is logged and the rule sees no elements.
    pub fn select(&self, selector: &str) -> Vec<Node<'a>> {
        match self.document.select(selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("{}", e);
                Vec::new()
            }
        }
    }

    /// Snapshot an element for reporting
    pub fn affected(&self, node: &Node<'_>, description: impl Into<String>) -> AffectedNode {
        AffectedNode::new(node.outer_html())
            .with_line(self.lines.resolve(node))
            .with_description(description)
    }
}

/// Trait implemented by all rules
pub trait Rule: Send + Sync {
    /// Violation id; for rules that emit one violation per group this is
    /// the id prefix
    fn id(&self) -> &'static str;

    /// What the rule checks, also used as the violation description
    fn description(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Evaluate the rule; an empty result means the document passed
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation>;

    /// Wrap affected nodes into this rule's single violation, or nothing
    fn violation(&self, nodes: Vec<AffectedNode>) -> Vec<Violation> {
        if nodes.is_empty() {
            return Vec::new();
        }
        vec![Violation::new(self.id(), self.description(), self.severity()).with_nodes(nodes)]
    }
}

/// All rules, in the order they run and report
pub fn registry() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(images::ImageAlt),
        Box::new(forms::FormLabel),
        Box::new(contrast::Contrast),
        Box::new(images::ChartAlt),
        Box::new(structure::TableHeaders),
        Box::new(forms::FieldsetLegend),
        Box::new(structure::Landmark),
        Box::new(structure::Headings),
        Box::new(keyboard::LinkName),
        Box::new(keyboard::FocusableName),
        Box::new(page::MissingTitle),
        Box::new(page::MissingLang),
        Box::new(keyboard::HighTabindex),
        Box::new(duplicates::DuplicateRole),
        Box::new(page::IframeTitle),
        Box::new(keyboard::EmptyLinksButtons),
        Box::new(duplicates::DuplicateId),
        Box::new(media::MediaAlternatives),
        Box::new(structure::UnlabeledLandmarks),
        Box::new(viewport::ViewportRestrictsZoom),
        Box::new(viewport::ViewportMissing),
        Box::new(viewport::CssZoomRestriction),
    ]
}

/// Position in the registry of the rule that emits `violation_id`
pub fn rule_index(rules: &[Box<dyn Rule>], violation_id: &str) -> Option<usize> {
    rules.iter().position(|rule| {
        let id = rule.id();
        violation_id == id
            || violation_id
                .strip_prefix(id)
                .is_some_and(|suffix| suffix.starts_with('-'))
    })
}

/// Whether an element carries a non-empty `aria-label` or `aria-labelledby`
pub(crate) fn has_aria_name(node: &Node<'_>) -> bool {
    node.non_empty_attr("aria-label").is_some() || node.non_empty_attr("aria-labelledby").is_some()
}

/// Run one rule against markup with default settings
#[cfg(test)]
pub(crate) fn run_rule(rule: &dyn Rule, html: &str) -> Vec<Violation> {
    let document = Document::parse(html);
    let lines = LineResolver::new(html);
    let contrast = ContrastConfig::default();
    rule.evaluate(&RuleContext::new(&document, &lines, &contrast))
}
