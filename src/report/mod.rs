// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for rule violations.
//!
//! Supports multiple output formats:
//! - Text: violations grouped by severity with line numbers and snippets
//! - JSON: violations plus a summary for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration
//!
//! Also provides the per-node export lines and the counts that feed charts.

use crate::violation::{has_critical, AffectedNode, Severity, Violation};
use serde::Serialize;
use std::collections::BTreeMap;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Violation and affected-node counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Count {
    pub violations: usize,
    pub nodes: usize,
}

impl Count {
    fn add(&mut self, violation: &Violation) {
        self.violations += 1;
        self.nodes += violation.nodes.len();
    }
}

/// Counts for one violation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdCount {
    pub id: String,
    pub severity: Severity,
    #[serde(flatten)]
    pub count: Count,
}

/// Aggregate counts over a violation list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_violations: usize,
    pub total_nodes: usize,
    /// Per id, in order of first appearance
    pub by_id: Vec<IdCount>,
    /// Per severity, most severe first
    pub by_severity: BTreeMap<Severity, Count>,
}

impl Summary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = Summary::default();

        for violation in violations {
            summary.total_violations += 1;
            summary.total_nodes += violation.nodes.len();

            match summary.by_id.iter_mut().find(|c| c.id == violation.id) {
                Some(entry) => entry.count.add(violation),
                None => {
                    let mut count = Count::default();
                    count.add(violation);
                    summary.by_id.push(IdCount {
                        id: violation.id.clone(),
                        severity: violation.severity,
                        count,
                    });
                }
            }

            summary
                .by_severity
                .entry(violation.severity)
                .or_default()
                .add(violation);
        }

        summary
    }

    /// Plain-text rendering for the `summary` command
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} violation(s) affecting {} node(s)\n",
            self.total_violations, self.total_nodes
        ));

        if !self.by_id.is_empty() {
            output.push_str("\nBy rule:\n");
            for entry in &self.by_id {
                output.push_str(&format!(
                    "  {:<28} {:<9} {:>3} violation(s) {:>4} node(s)\n",
                    entry.id, entry.severity, entry.count.violations, entry.count.nodes
                ));
            }
        }

        if !self.by_severity.is_empty() {
            output.push_str("\nBy severity:\n");
            for (severity, count) in &self.by_severity {
                output.push_str(&format!(
                    "  {:<9} {:>3} violation(s) {:>4} node(s)\n",
                    severity, count.violations, count.nodes
                ));
            }
        }

        output
    }
}

/// Generate a report for the violations found in `artifact`
///
/// `artifact` names the analyzed input; it is used as the location in text
/// and SARIF output.
pub fn generate_report(violations: &[Violation], format: OutputFormat, artifact: &str) -> String {
    match format {
        OutputFormat::Text => generate_text_report(violations, artifact),
        OutputFormat::Json => generate_json_report(violations),
        OutputFormat::Sarif => generate_sarif_report(violations, artifact),
    }
}

/// Generate human-readable text report
fn generate_text_report(violations: &[Violation], artifact: &str) -> String {
    let mut output = String::new();

    output.push_str("=== wcagbot Accessibility Report ===\n\n");

    if violations.is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n");
        return output;
    }

    let summary = Summary::from_violations(violations);
    output.push_str(&format!(
        "Found {} violation(s) affecting {} node(s)\n\n",
        summary.total_violations, summary.total_nodes
    ));

    for severity in Severity::ALL {
        let group: Vec<_> = violations.iter().filter(|v| v.severity == severity).collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, group.len()));

        for violation in group {
            output.push_str(&format!("[{}] {}\n", violation.id, violation.description));

            for node in &violation.nodes {
                match node.line {
                    Some(line) => output.push_str(&format!("  Location: {}:{}\n", artifact, line)),
                    None => output.push_str(&format!("  Location: {}\n", artifact)),
                }
                if let Some(ref description) = node.description {
                    output.push_str(&format!("  Issue: {}\n", description));
                }
                output.push_str(&format!("  Element: {}\n", snippet(&node.element)));
            }

            output.push('\n');
        }
    }

    if has_critical(violations) {
        output.push_str("RESULT: FAIL (critical violations found)\n");
    } else {
        output.push_str("RESULT: PASS WITH WARNINGS\n");
    }

    output
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    violations: &'a [Violation],
    summary: Summary,
}

/// Generate JSON report
fn generate_json_report(violations: &[Violation]) -> String {
    let report = JsonReport {
        violations,
        summary: Summary::from_violations(violations),
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize violations: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<SarifRegion>,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::Serious => "error",
        Severity::Moderate => "warning",
        Severity::Minor => "note",
    }
}

fn sarif_location(artifact: &str, line: Option<usize>) -> SarifLocation {
    SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: artifact.to_string(),
            },
            region: line.map(|l| SarifRegion { start_line: l }),
        },
    }
}

/// Generate SARIF report, one result per affected node
fn generate_sarif_report(violations: &[Violation], artifact: &str) -> String {
    let results: Vec<SarifResult> = violations
        .iter()
        .flat_map(|v| {
            let level = sarif_level(v.severity);
            let result = |text: String, line: Option<usize>| SarifResult {
                rule_id: v.id.clone(),
                level: level.to_string(),
                message: SarifMessage { text },
                locations: vec![sarif_location(artifact, line)],
            };

            if v.nodes.is_empty() {
                vec![result(v.description.clone(), None)]
            } else {
                v.nodes
                    .iter()
                    .map(|node| result(node_message(v, node), node.line))
                    .collect()
            }
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "wcagbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://github.com/hyperpolymath/gitbot-fleet".to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}

fn node_message(violation: &Violation, node: &AffectedNode) -> String {
    match node.description {
        Some(ref description) => format!("{}: {}", violation.description, description),
        None => violation.description.clone(),
    }
}

/// One line per affected node: `ID / Description / Severity / Nodes: Line / snippet`
///
/// Node-less violations export a single line with `Nodes: N/A / -`.
pub fn export_lines(violations: &[Violation]) -> Vec<String> {
    violations
        .iter()
        .flat_map(|v| {
            let prefix = format!("{} / {} / {}", v.id, v.description, v.severity);
            if v.nodes.is_empty() {
                return vec![format!("{} / Nodes: N/A / -", prefix)];
            }
            v.nodes
                .iter()
                .map(|node| {
                    let line = node
                        .line
                        .map(|l| l.to_string())
                        .unwrap_or_else(|| "N/A".to_string());
                    format!("{} / Nodes: {} / {}", prefix, line, snippet(&node.element))
                })
                .collect()
        })
        .collect()
}

/// Collapse runs of whitespace into single spaces
fn snippet(element: &str) -> String {
    element.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_violations() -> Vec<Violation> {
        vec![
            Violation::new("image-alt", "Image elements are missing alt attributes.", Severity::Critical)
                .with_node(
                    AffectedNode::new("<img src=\"a.png\">")
                        .with_line(Some(10))
                        .with_description("Missing alt attribute"),
                )
                .with_node(AffectedNode::new("<img\n    src=\"b.png\">")),
            Violation::new("missing-lang", "The html element is missing a lang attribute.", Severity::Critical),
            Violation::new("fieldset-legend", "Fieldsets are missing legends.", Severity::Minor)
                .with_node(AffectedNode::new("<fieldset></fieldset>").with_line(Some(3))),
        ]
    }

    #[test]
    fn test_text_report_empty() {
        let report = generate_report(&[], OutputFormat::Text, "index.html");
        assert!(report.contains("No accessibility issues found"));
    }

    #[test]
    fn test_text_report_with_violations() {
        let report = generate_report(&sample_violations(), OutputFormat::Text, "index.html");
        assert!(report.contains("[image-alt]"));
        assert!(report.contains("Location: index.html:10"));
        assert!(report.contains("Element: <img src=\"b.png\">"));
        assert!(report.contains("RESULT: FAIL"));
        // Critical group comes before minor
        assert!(report.find("--- critical").unwrap() < report.find("--- minor").unwrap());
    }

    #[test]
    fn test_json_report() {
        let report = generate_report(&sample_violations(), OutputFormat::Json, "index.html");
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["violations"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["violations"][0]["nodes"][0]["line"], 10);
        assert!(parsed["violations"][0]["nodes"][1]["line"].is_null());
        assert!(parsed["violations"][0]["nodes"][1].get("description").is_none());
        assert_eq!(parsed["summary"]["total_nodes"], 3);
        assert_eq!(parsed["summary"]["by_severity"]["critical"]["violations"], 2);
    }

    #[test]
    fn test_sarif_report() {
        let report = generate_report(&sample_violations(), OutputFormat::Sarif, "index.html");
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().unwrap();
        // Two image nodes, one document-level violation, one fieldset node
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["level"], "error");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            10
        );
        assert_eq!(results[2]["ruleId"], "missing-lang");
        assert_eq!(results[3]["level"], "note");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("sarif".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_violations(&sample_violations());
        assert_eq!(summary.total_violations, 3);
        assert_eq!(summary.total_nodes, 3);
        let ids: Vec<_> = summary.by_id.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["image-alt", "missing-lang", "fieldset-legend"]);
        assert_eq!(
            summary.by_severity[&Severity::Critical],
            Count { violations: 2, nodes: 2 }
        );
        assert!(!summary.by_severity.contains_key(&Severity::Moderate));
        assert!(summary.to_text().contains("2 violation(s)"));
    }

    #[test]
    fn test_summary_groups_repeated_ids() {
        let violations = vec![
            Violation::new("duplicate-id", "The id \"a\" is used on more than one element.", Severity::Critical)
                .with_nodes(vec![AffectedNode::new("<p id=\"a\">"), AffectedNode::new("<i id=\"a\">")]),
            Violation::new("duplicate-id", "The id \"b\" is used on more than one element.", Severity::Critical)
                .with_nodes(vec![AffectedNode::new("<p id=\"b\">"), AffectedNode::new("<i id=\"b\">")]),
        ];
        let summary = Summary::from_violations(&violations);
        assert_eq!(summary.by_id.len(), 1);
        assert_eq!(summary.by_id[0].count, Count { violations: 2, nodes: 4 });
    }

    #[test]
    fn test_export_lines() {
        let lines = export_lines(&sample_violations());
        assert_eq!(
            lines,
            vec![
                "image-alt / Image elements are missing alt attributes. / critical / Nodes: 10 / <img src=\"a.png\">",
                "image-alt / Image elements are missing alt attributes. / critical / Nodes: N/A / <img src=\"b.png\">",
                "missing-lang / The html element is missing a lang attribute. / critical / Nodes: N/A / -",
                "fieldset-legend / Fieldsets are missing legends. / minor / Nodes: 3 / <fieldset></fieldset>",
            ]
        );
    }
}
