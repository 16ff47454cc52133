// SPDX-License-Identifier: PMPL-1.0-or-later
//! Zoom and reflow - WCAG 1.4.4 Resize Text (Level AA)
//!
//! Covers the viewport meta tag and body-level CSS that blocks text scaling.

use super::{Rule, RuleContext};
use crate::document::Node;
use crate::violation::{Severity, Violation};

/// Body style declarations that prevent text resizing
const BLOCKING_STYLES: &[(&str, &str)] = &[("zoom", "1"), ("text-size-adjust", "none")];

/// Viewport metas that disable pinch zoom
pub struct ViewportRestrictsZoom;

impl Rule for ViewportRestrictsZoom {
    fn id(&self) -> &'static str {
        "viewport-restricts-zoom"
    }

    fn description(&self) -> &'static str {
        "The viewport meta tag prevents users from zooming."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = viewport_metas(ctx)
            .iter()
            .filter_map(|meta| {
                let reasons = zoom_restrictions(meta.attr("content").unwrap_or_default());
                (!reasons.is_empty()).then(|| {
                    ctx.affected(meta, format!("Zoom disabled by {}", reasons.join(", ")))
                })
            })
            .collect();
        self.violation(nodes)
    }
}

/// Documents without a viewport meta tag
pub struct ViewportMissing;

impl Rule for ViewportMissing {
    fn id(&self) -> &'static str {
        "viewport-missing"
    }

    fn description(&self) -> &'static str {
        "Document is missing a viewport meta tag."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        if !viewport_metas(ctx).is_empty() {
            return Vec::new();
        }
        vec![Violation::new(self.id(), self.description(), self.severity())]
    }
}

/// Body styles that lock the text size
///
/// Only `<body>` is inspected, and each offending property is reported as
/// its own violation.
pub struct CssZoomRestriction;

impl Rule for CssZoomRestriction {
    fn id(&self) -> &'static str {
        "css-zoom-restriction"
    }

    fn description(&self) -> &'static str {
        "CSS on the page body prevents text from being resized."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(body) = ctx.document.body() else {
            return Vec::new();
        };

        BLOCKING_STYLES
            .iter()
            .filter_map(|(property, blocking)| {
                let value = body.computed_style(property)?;
                value.trim().eq_ignore_ascii_case(blocking).then(|| {
                    Violation::new(self.id(), self.description(), self.severity())
                        .with_node(ctx.affected(&body, format!("{}: {}", property, value.trim())))
                })
            })
            .collect()
    }
}

fn viewport_metas<'a>(ctx: &RuleContext<'a>) -> Vec<Node<'a>> {
    ctx.select("meta[name]")
        .into_iter()
        .filter(|meta| {
            meta.attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("viewport"))
        })
        .collect()
}

/// Viewport settings that disable zooming
///
/// Matched as substrings of the whitespace-stripped, lowercased `content`, so
/// `maximum-scale=1.0` and `maximum-scale=10` both count.
const ZOOM_BLOCKERS: &[&str] = &["maximum-scale=1", "user-scalable=no", "user-scalable=0"];

/// The settings in a viewport `content` that disable zooming
pub fn zoom_restrictions(content: &str) -> Vec<&'static str> {
    let normalized: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    ZOOM_BLOCKERS
        .iter()
        .copied()
        .filter(|blocker| normalized.contains(blocker))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::run_rule;

    #[test]
    fn test_zoom_restrictions() {
        assert_eq!(zoom_restrictions("user-scalable=no"), vec!["user-scalable=no"]);
        assert_eq!(zoom_restrictions("maximum-scale=1.0"), vec!["maximum-scale=1"]);
        assert_eq!(
            zoom_restrictions("user-scalable=0, maximum-scale=1"),
            vec!["maximum-scale=1", "user-scalable=0"]
        );
        assert!(zoom_restrictions("width=device-width, initial-scale=1").is_empty());
        assert!(zoom_restrictions("maximum-scale=5, user-scalable=yes").is_empty());
    }

    #[test]
    fn test_zoom_restrictions_match_substrings() {
        assert_eq!(zoom_restrictions("maximum-scale=10"), vec!["maximum-scale=1"]);
        assert_eq!(zoom_restrictions("maximum-scale=1.5"), vec!["maximum-scale=1"]);
        assert_eq!(zoom_restrictions("Maximum-Scale = 1"), vec!["maximum-scale=1"]);
        assert_eq!(zoom_restrictions("user-scalable = NO"), vec!["user-scalable=no"]);
        assert!(zoom_restrictions("minimum-scale=1, maximum-scale=2").is_empty());
    }

    #[test]
    fn test_viewport_max_scale_ten_fires() {
        let html = r#"<meta name="viewport" content="width=device-width, maximum-scale=10">"#;
        let violations = run_rule(&ViewportRestrictsZoom, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].nodes[0].description.as_deref(),
            Some("Zoom disabled by maximum-scale=1")
        );
    }

    #[test]
    fn test_viewport_restricts_zoom() {
        let html = r#"<head><meta name="viewport" content="user-scalable=no"></head>"#;
        let violations = run_rule(&ViewportRestrictsZoom, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert_eq!(
            violations[0].nodes[0].description.as_deref(),
            Some("Zoom disabled by user-scalable=no")
        );
        assert!(run_rule(&ViewportMissing, html).is_empty());
    }

    #[test]
    fn test_viewport_name_case_insensitive() {
        let html = r#"<meta name="Viewport" content="width=device-width, maximum-scale=1">"#;
        assert_eq!(run_rule(&ViewportRestrictsZoom, html).len(), 1);
        assert!(run_rule(&ViewportMissing, html).is_empty());
    }

    #[test]
    fn test_viewport_missing() {
        let violations = run_rule(&ViewportMissing, "<html><head><title>x</title></head></html>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Moderate);
        assert!(violations[0].is_document_level());
    }

    #[test]
    fn test_css_zoom_restriction() {
        let html = r#"<html><body style="zoom: 1; text-size-adjust: none"><p>x</p></body></html>"#;
        let violations = run_rule(&CssZoomRestriction, html);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].nodes[0].description.as_deref(), Some("zoom: 1"));
        assert_eq!(
            violations[1].nodes[0].description.as_deref(),
            Some("text-size-adjust: none")
        );
        assert!(violations[0].nodes[0].element.starts_with("<body"));
    }

    #[test]
    fn test_css_zoom_from_stylesheet_and_scope() {
        let html = r#"<style>body { text-size-adjust: none }</style><body><div style="zoom: 1"></div></body>"#;
        let violations = run_rule(&CssZoomRestriction, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].nodes[0].description.as_deref(),
            Some("text-size-adjust: none")
        );
        assert!(run_rule(&CssZoomRestriction, r#"<body style="zoom: 1.5"></body>"#).is_empty());
    }
}
