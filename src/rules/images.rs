// SPDX-License-Identifier: PMPL-1.0-or-later
//! Non-text content - WCAG 1.1.1 (Level A)
//!
//! - `image-alt`: every `<img>` needs a non-blank `alt`
//! - `chart-alt`: `<svg>`, `<canvas>` and `role="img"` graphics need an
//!   `aria-label` or `aria-labelledby`

use super::{has_aria_name, Rule, RuleContext};
use crate::violation::{Severity, Violation};

/// Images without alternative text
pub struct ImageAlt;

impl Rule for ImageAlt {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn description(&self) -> &'static str {
        "Image elements are missing alt attributes."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("img")
            .iter()
            .filter(|img| img.non_empty_attr("alt").is_none())
            .map(|img| ctx.affected(img, "Missing alt attribute"))
            .collect();
        self.violation(nodes)
    }
}

/// Charts and graphics without a text alternative
pub struct ChartAlt;

impl Rule for ChartAlt {
    fn id(&self) -> &'static str {
        "chart-alt"
    }

    fn description(&self) -> &'static str {
        "Charts or graphs are missing text alternatives."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("svg, canvas, [role='img']")
            .iter()
            .filter(|graphic| !has_aria_name(graphic))
            .map(|graphic| ctx.affected(graphic, "Missing text alternative for chart/graph"))
            .collect();
        self.violation(nodes)
    }
}
