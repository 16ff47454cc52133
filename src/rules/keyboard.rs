// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard and focus - WCAG 2.4.3 Focus Order, 2.4.4 Link Purpose,
//! 4.1.2 Name, Role, Value (Level A)

use super::{has_aria_name, Rule, RuleContext};
use crate::document::Node;
use crate::violation::{Severity, Violation};

/// Elements that can receive keyboard focus
pub const FOCUSABLE_SELECTOR: &str = "a, button, input, textarea, select, [tabindex]";

/// Links with no discernible purpose
pub struct LinkName;

impl Rule for LinkName {
    fn id(&self) -> &'static str {
        "link-name"
    }

    fn description(&self) -> &'static str {
        "Links must have discernible text and a real destination."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("a")
            .iter()
            .filter_map(|link| {
                let description = if link.attr("href") == Some("#") {
                    "Link points to \"#\""
                } else if !link.has_text() && link.non_empty_attr("aria-label").is_none() {
                    "Link has no text or aria-label"
                } else {
                    return None;
                };
                Some(ctx.affected(link, description))
            })
            .collect();
        self.violation(nodes)
    }
}

/// Focusable elements without an accessible name
pub struct FocusableName;

impl Rule for FocusableName {
    fn id(&self) -> &'static str {
        "focusable-name"
    }

    fn description(&self) -> &'static str {
        "Focusable elements are missing an accessible name."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select(FOCUSABLE_SELECTOR)
            .iter()
            .filter(|n| is_unnamed(n))
            .map(|n| ctx.affected(n, "Focusable element has no accessible name"))
            .collect();
        self.violation(nodes)
    }
}

/// Positive tabindex values
pub struct HighTabindex;

impl Rule for HighTabindex {
    fn id(&self) -> &'static str {
        "high-tabindex"
    }

    fn description(&self) -> &'static str {
        "Positive tabindex values disrupt the natural focus order."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select(FOCUSABLE_SELECTOR)
            .iter()
            .filter_map(|n| {
                let index = tab_index(n)?;
                (index > 0).then(|| {
                    ctx.affected(
                        n,
                        format!("tabindex=\"{}\" overrides the natural focus order", index),
                    )
                })
            })
            .collect();
        self.violation(nodes)
    }
}

/// Links and buttons with neither text nor an aria name
pub struct EmptyLinksButtons;

impl Rule for EmptyLinksButtons {
    fn id(&self) -> &'static str {
        "empty-links-buttons"
    }

    fn description(&self) -> &'static str {
        "Links and buttons must not be empty."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("a, button")
            .iter()
            .filter(|n| is_unnamed(n))
            .map(|n| ctx.affected(n, format!("Empty <{}> element", n.tag_name())))
            .collect();
        self.violation(nodes)
    }
}

fn is_unnamed(node: &Node<'_>) -> bool {
    !node.has_text() && !has_aria_name(node)
}

/// Parsed `tabindex`, or `None` when absent or not an integer
fn tab_index(node: &Node<'_>) -> Option<i32> {
    node.attr("tabindex")?.trim().parse().ok()
}
