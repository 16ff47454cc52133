// SPDX-License-Identifier: PMPL-1.0-or-later
//! Violation types produced by the rule set.

use serde::{Deserialize, Serialize};

/// Severity of a violation, used for display grouping only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access to content for affected users
    Critical,
    /// Seriously degrades access
    Serious,
    /// Makes access harder
    Moderate,
    /// Minor inconvenience
    Minor,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "serious" => Ok(Severity::Serious),
            "moderate" => Ok(Severity::Moderate),
            "minor" => Ok(Severity::Minor),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// A concrete element affected by a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedNode {
    /// Serialized element (outer HTML)
    pub element: String,
    /// 1-based source line, when it could be recovered
    pub line: Option<usize>,
    /// Node-specific explanation overriding the violation description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AffectedNode {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            line: None,
            description: None,
        }
    }

    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One detected issue category with its affected elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub description: String,
    pub severity: Severity,
    /// Affected elements in document order; empty for document-level checks
    pub nodes: Vec<AffectedNode>,
}

impl Violation {
    pub fn new(id: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            severity,
            nodes: Vec::new(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<AffectedNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_node(mut self, node: AffectedNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Whether this violation concerns the document as a whole
    pub fn is_document_level(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Whether any violation is critical
pub fn has_critical(violations: &[Violation]) -> bool {
    violations.iter().any(|v| v.severity == Severity::Critical)
}
