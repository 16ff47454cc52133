// SPDX-License-Identifier: PMPL-1.0-or-later
//! Semantic structure - WCAG 1.3.1 Info and Relationships (Level A),
//! 2.4.6 Headings and Labels (Level AA)
//!
//! Checks tables, landmark regions and heading nesting.

use super::{has_aria_name, Rule, RuleContext};
use crate::violation::{Severity, Violation};

/// ARIA roles that mark landmark regions
pub const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "main",
    "navigation",
    "complementary",
    "contentinfo",
];

/// Data tables without header cells
pub struct TableHeaders;

impl Rule for TableHeaders {
    fn id(&self) -> &'static str {
        "table-headers"
    }

    fn description(&self) -> &'static str {
        "Data tables are missing header cells."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("table")
            .iter()
            .filter(|table| !table.has_descendant("th"))
            .map(|table| ctx.affected(table, "Table is missing header cells"))
            .collect();
        self.violation(nodes)
    }
}

/// Landmark elements with neither a role nor a label
pub struct Landmark;

impl Rule for Landmark {
    fn id(&self) -> &'static str {
        "landmark"
    }

    fn description(&self) -> &'static str {
        "Landmark regions are missing proper roles or labels."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("header, main, footer, nav, aside")
            .iter()
            .filter(|region| {
                region.non_empty_attr("role").is_none()
                    && region.non_empty_attr("aria-label").is_none()
            })
            .map(|region| ctx.affected(region, "Landmark is missing role or label"))
            .collect();
        self.violation(nodes)
    }
}

/// Headings that skip levels
///
/// The only rule with state: headings are folded in document order with the
/// previous level starting at 0, so a document may open with `<h1>` only.
pub struct Headings;

impl Rule for Headings {
    fn id(&self) -> &'static str {
        "headings"
    }

    fn description(&self) -> &'static str {
        "Heading levels should only increase by one."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let (_, nodes) = ctx.select("h1, h2, h3, h4, h5, h6").iter().fold(
            (0u8, Vec::new()),
            |(previous, mut nodes), heading| {
                let level = heading_level(heading.tag_name());
                if level > previous + 1 {
                    nodes.push(ctx.affected(
                        heading,
                        format!("Heading level {} follows level {}", level, previous),
                    ));
                }
                (level, nodes)
            },
        );
        self.violation(nodes)
    }
}

fn heading_level(tag: &str) -> u8 {
    tag.strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Landmark roles without an accessible label
pub struct UnlabeledLandmarks;

impl Rule for UnlabeledLandmarks {
    fn id(&self) -> &'static str {
        "unlabeled-landmarks"
    }

    fn description(&self) -> &'static str {
        "Landmark roles are missing an accessible label."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let nodes = ctx
            .select("[role]")
            .iter()
            .filter(|n| {
                n.attr("role")
                    .map(|r| r.trim().to_ascii_lowercase())
                    .is_some_and(|r| LANDMARK_ROLES.contains(&r.as_str()))
            })
            .filter(|n| !has_aria_name(n))
            .map(|n| ctx.affected(n, "Landmark role has no aria-label or aria-labelledby"))
            .collect();
        self.violation(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::run_rule;

    #[test]
    fn test_table_headers() {
        let html = r#"
            <table><thead><tr><th>Name</th></tr></thead><tbody><tr><td>A</td></tr></tbody></table>
            <table><tr><td>1</td><td>2</td></tr></table>"#;
        let violations = run_rule(&TableHeaders, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].nodes.len(), 1);
        assert!(violations[0].nodes[0].element.contains("<td>1</td>"));
    }

    #[test]
    fn test_landmark() {
        let html = r#"
            <header role="banner"></header>
            <nav aria-label="Primary"></nav>
            <main></main>
            <aside role=""></aside>
            <footer></footer>"#;
        let violations = run_rule(&Landmark, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Moderate);
        let tags: Vec<_> = violations[0].nodes.iter().map(|n| n.element.as_str()).collect();
        assert_eq!(tags, vec!["<main></main>", "<aside role=\"\"></aside>", "<footer></footer>"]);
    }

    #[test]
    fn test_skipped_heading_level() {
        let html = "<h1>Title</h1>\n<h3>Skipped</h3>";
        let violations = run_rule(&Headings, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].nodes.len(), 1);
        assert_eq!(violations[0].nodes[0].element, "<h3>Skipped</h3>");
        assert_eq!(violations[0].nodes[0].line, Some(2));
    }

    #[test]
    fn test_sequential_headings_pass() {
        assert!(run_rule(&Headings, "<h1>a</h1><h2>b</h2><h3>c</h3>").is_empty());
        // Going back up any number of levels is fine
        assert!(run_rule(&Headings, "<h1>a</h1><h2>b</h2><h3>c</h3><h1>d</h1><h2>e</h2>").is_empty());
    }

    #[test]
    fn test_first_heading_must_be_h1() {
        let violations = run_rule(&Headings, "<h2>Start</h2><h3>Next</h3>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].nodes.len(), 1);
        assert_eq!(
            violations[0].nodes[0].description.as_deref(),
            Some("Heading level 2 follows level 0")
        );
    }

    #[test]
    fn test_previous_level_tracks_flagged_headings() {
        // h4 is flagged, then h5 follows h4 and passes
        let violations = run_rule(&Headings, "<h1>a</h1><h4>b</h4><h5>c</h5>");
        assert_eq!(violations[0].nodes.len(), 1);
    }

    #[test]
    fn test_unlabeled_landmarks() {
        let html = r#"
            <div role="banner"></div>
            <div role="navigation" aria-label="Main menu"></div>
            <div role="Main"></div>
            <div role="button"></div>
            <div role="contentinfo" aria-labelledby="foot-title"></div>"#;
        let violations = run_rule(&UnlabeledLandmarks, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].nodes.len(), 2);
    }
}
