// SPDX-License-Identifier: PMPL-1.0-or-later
//! Uniqueness checks - WCAG 4.1.1 Parsing, 1.3.1 Info and Relationships
//!
//! Both rules emit one violation per duplicated value rather than one per
//! rule, so their violation ids and descriptions are built per group.

use super::{Rule, RuleContext};
use crate::document::Node;
use crate::violation::{Severity, Violation};
use std::collections::HashMap;

/// Landmark roles that should appear at most once per page
pub const UNIQUE_ROLES: &[&str] = &["banner", "main", "navigation"];

/// Group nodes by key, keeping only keys shared by more than one node
///
/// Groups come back in the order their key was first seen; nodes within a
/// group keep their input order. Nodes the key function maps to `None` are
/// ignored.
pub fn group_duplicates<'a, F>(nodes: &[Node<'a>], key: F) -> Vec<(String, Vec<Node<'a>>)>
where
    F: Fn(&Node<'a>) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Node<'a>>)> = Vec::new();
    for node in nodes {
        let Some(k) = key(node) else {
            continue;
        };
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(*node),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![*node]));
            }
        }
    }
    groups.retain(|(_, members)| members.len() > 1);
    groups
}

/// Unique landmark roles used more than once
pub struct DuplicateRole;

impl Rule for DuplicateRole {
    fn id(&self) -> &'static str {
        "duplicate-role"
    }

    fn description(&self) -> &'static str {
        "Landmark roles that should be unique appear more than once."
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let groups = group_duplicates(&ctx.select("[role]"), |n| {
            n.attr("role")
                .map(|r| r.trim().to_ascii_lowercase())
                .filter(|r| UNIQUE_ROLES.contains(&r.as_str()))
        });

        UNIQUE_ROLES
            .iter()
            .filter_map(|role| groups.iter().find(|(k, _)| k.as_str() == *role))
            .map(|(role, members)| {
                Violation::new(
                    format!("{}-{}", self.id(), role),
                    format!("The \"{}\" role is used on more than one element.", role),
                    self.severity(),
                )
                .with_nodes(
                    members
                        .iter()
                        .map(|n| ctx.affected(n, format!("Duplicate role=\"{}\"", role)))
                        .collect(),
                )
            })
            .collect()
    }
}

/// `id` values shared by several elements
pub struct DuplicateId;

impl Rule for DuplicateId {
    fn id(&self) -> &'static str {
        "duplicate-id"
    }

    fn description(&self) -> &'static str {
        "Element ids must be unique."
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let groups = group_duplicates(&ctx.select("[id]"), |n| {
            n.non_empty_attr("id").map(str::to_string)
        });

        groups
            .into_iter()
            .map(|(value, members)| {
                Violation::new(
                    self.id(),
                    format!("The id \"{}\" is used on more than one element.", value),
                    self.severity(),
                )
                .with_nodes(
                    members
                        .iter()
                        .map(|n| ctx.affected(n, format!("Duplicate id=\"{}\"", value)))
                        .collect(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::rules::run_rule;

    #[test]
    fn test_group_duplicates_first_seen_order() {
        let doc = Document::parse(
            r#"<p class="b"></p><p class="a"></p><p class="b"></p><p></p><p class="a"></p><p class="c"></p>"#,
        );
        let nodes = doc.select("p").unwrap();
        let groups = group_duplicates(&nodes, |n| n.attr("class").map(str::to_string));
        let keys: Vec<_> = groups.iter().map(|(k, m)| (k.as_str(), m.len())).collect();
        assert_eq!(keys, vec![("b", 2), ("a", 2)]);
    }

    #[test]
    fn test_group_duplicates_many_ids() {
        let html: String = (0..2000)
            .map(|i| format!(r#"<span id="id-{}"></span>"#, i % 1000))
            .collect();
        let doc = Document::parse(&html);
        let nodes = doc.select("span").unwrap();
        let groups = group_duplicates(&nodes, |n| n.attr("id").map(str::to_string));
        assert_eq!(groups.len(), 1000);
        assert_eq!(groups[0].0, "id-0");
        assert_eq!(groups[999].0, "id-999");
        assert!(groups.iter().all(|(_, members)| members.len() == 2));
    }

    #[test]
    fn test_duplicate_id() {
        let html = "<div id=\"dup\"></div>\n<span id=\"dup\"></span>\n<p id=\"solo\"></p>";
        let violations = run_rule(&DuplicateId, html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].id, "duplicate-id");
        assert_eq!(violations[0].severity, Severity::Critical);
        assert!(violations[0].description.contains("\"dup\""));
        let lines: Vec<_> = violations[0].nodes.iter().map(|n| n.line).collect();
        assert_eq!(lines, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_one_violation_per_duplicated_id() {
        let html = r#"<a id="x"></a><a id="y"></a><a id="x"></a><a id="y"></a><a id=""></a><a id=""></a>"#;
        let violations = run_rule(&DuplicateId, html);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].description.contains("\"x\""));
        assert!(violations[1].description.contains("\"y\""));
    }

    #[test]
    fn test_duplicate_role_fixed_order() {
        let html = r#"
            <div role="navigation"></div>
            <div role="navigation"></div>
            <div role="main"></div>
            <div role="MAIN"></div>
            <div role="banner"></div>
            <div role="contentinfo"></div>
            <div role="contentinfo"></div>"#;
        let violations = run_rule(&DuplicateRole, html);
        let ids: Vec<_> = violations.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["duplicate-role-main", "duplicate-role-navigation"]);
        assert!(violations.iter().all(|v| v.severity == Severity::Moderate));
        assert!(violations.iter().all(|v| v.nodes.len() == 2));
    }

    #[test]
    fn test_unique_roles_pass() {
        let html = r#"<header role="banner"></header><main role="main"></main>"#;
        assert!(run_rule(&DuplicateRole, html).is_empty());
    }
}
