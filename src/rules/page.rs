// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page-level checks - WCAG 2.4.2 Page Titled, 3.1.1 Language of Page,
//! 4.1.2 for frames

use super::{Rule, RuleContext};
use crate::violation::{Severity, Violation};

/// Documents without a usable `<title>`
pub struct MissingTitle;

impl Rule for MissingTitle {
    fn id(&self) -> &'static str {
        "missing-title"
    }

    fn description(&self) -> &'static str {
        "Document is missing a title."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        match ctx.document.title() {
            Some(title) if title.has_text() => Vec::new(),
            _ => vec![Violation::new(self.id(), self.description(), self.severity())],
        }
    }
}

/// Documents whose root element has no `lang` attribute
///
/// Only presence is checked; `lang=""` is an explicit "unknown language".
pub struct MissingLang;

impl Rule for MissingLang {
    fn id(&self) -> &'static str {
        "missing-lang"
    }

    fn description(&self) -> &'static str {
        "The html element is missing a lang attribute."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        if ctx.document.root().has_attr("lang") {
            return Vec::new();
        }
        vec![Violation::new(self.id(), self.description(), self.severity())]
    }
}

/// Frames without a title
pub struct IframeTitle;

impl Rule for IframeTitle {
    fn id(&self) -> &'static str {
        "iframe-title"
    }

    fn description(&self) -> &'static str {
        "Iframes are missing a title attribute."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("iframe")
            .iter()
            .filter(|frame| !frame.has_attr("title"))
            .map(|frame| ctx.affected(frame, "Iframe has no title attribute"))
            .collect();
        self.violation(nodes)
    }
}
