// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast - WCAG 1.4.3 Contrast (Minimum) (Level AA)
//!
//! Every element with a resolvable text color is checked against its
//! effective background: its own background, else the nearest ancestor's,
//! else the configured default. Colors that do not parse skip the element.

use super::{Rule, RuleContext};
use crate::contrast::{contrast_ratio, parse_color, Rgb};
use crate::document::Node;
use crate::violation::{Severity, Violation};
use tracing::debug;

/// Text whose contrast against its background is too low
pub struct Contrast;

impl Rule for Contrast {
    fn id(&self) -> &'static str {
        "contrast"
    }

    fn description(&self) -> &'static str {
        "Text contrast is below WCAG recommended levels."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let default_bg = parse_color(&ctx.contrast.default_background).unwrap_or(Rgb::WHITE);
        let mut nodes = Vec::new();

        for element in ctx.document.elements() {
            let Some(fg_text) = element.computed_style("color") else {
                continue;
            };
            let Some(fg) = parse_color(&fg_text) else {
                debug!("Skipping <{}>: unparseable color {:?}", element.tag_name(), fg_text);
                continue;
            };
            let bg = match background_of(&element) {
                Some(bg_text) => match parse_color(&bg_text) {
                    Some(bg) => bg,
                    None => {
                        debug!(
                            "Skipping <{}>: unparseable background {:?}",
                            element.tag_name(),
                            bg_text
                        );
                        continue;
                    }
                },
                None => default_bg,
            };

            let ratio = contrast_ratio(fg, bg);
            if ratio < ctx.contrast.min_ratio {
                nodes.push(ctx.affected(
                    &element,
                    format!("Low text contrast ({:.2}:1, {} on {})", ratio, fg, bg),
                ));
            }
        }

        self.violation(nodes)
    }
}

/// Background declared on the element or its nearest ancestor that has one
fn background_of(node: &Node<'_>) -> Option<String> {
    std::iter::once(*node)
        .chain(node.ancestors())
        .find_map(|n| {
            n.computed_style("background-color").or_else(|| {
                n.computed_style("background")
                    .filter(|shorthand| parse_color(shorthand).is_some())
            })
        })
}
