// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rule orchestration.
//!
//! Parses the input once, then runs every registered rule in registry order.
//! There is no early exit: each rule runs regardless of what earlier rules
//! found, and the output concatenates their violations in that order.

use crate::audit::{run_audit, AuditEngine, AuditOutcome};
use crate::config::{Config, ContrastConfig};
use crate::document::Document;
use crate::locate::LineResolver;
use crate::rules::{registry, Rule, RuleContext};
use crate::violation::Violation;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Rule violations plus the result of an external audit
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub violations: Vec<Violation>,
    pub audit: AuditOutcome,
}

/// The accessibility rule engine
pub struct Engine {
    rules: Vec<Box<dyn Rule>>,
    contrast: ContrastConfig,
    audit_timeout: Duration,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Engine {
    pub fn new(config: &Config) -> Self {
        Self {
            rules: registry(),
            contrast: config.contrast.clone(),
            audit_timeout: config.audit.timeout(),
        }
    }

    /// Registered rules in execution order
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Parse and analyze raw markup
    pub fn analyze(&self, source: &str) -> Vec<Violation> {
        let document = Document::parse(source);
        self.analyze_document(&document, source)
    }

    /// Analyze an already parsed document
    ///
    /// `source` is the text the document was parsed from; it is only used to
    /// recover line numbers.
    pub fn analyze_document(&self, document: &Document, source: &str) -> Vec<Violation> {
        let lines = LineResolver::new(source);
        let ctx = RuleContext::new(document, &lines, &self.contrast);
        let start = Instant::now();

        let mut violations = Vec::new();
        for rule in &self.rules {
            let rule_start = Instant::now();
            let found = rule.evaluate(&ctx);
            debug!(
                "Rule {} produced {} violation(s) in {:?}",
                rule.id(),
                found.len(),
                rule_start.elapsed()
            );
            violations.extend(found);
        }

        info!(
            "Analysis complete: {} violation(s) from {} rules in {:?}",
            violations.len(),
            self.rules.len(),
            start.elapsed()
        );
        violations
    }

    /// Run the rule set, then an external audit engine on the same document
    ///
    /// The audit result is reported alongside the rule violations and never
    /// affects them.
    pub async fn analyze_with_audit(&self, source: &str, engine: &dyn AuditEngine) -> Analysis {
        let document = Document::parse(source);
        let violations = self.analyze_document(&document, source);
        let audit = run_audit(engine, &document, self.audit_timeout).await;
        Analysis { violations, audit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::rules::rule_index;
    use crate::violation::Severity;
    use async_trait::async_trait;

    const SAMPLE: &str = r##"<html>
<head></head>
<body>
<h1>Title</h1>
<h3>Skipped</h3>
<img src="a.png">
<div id="dup"></div>
<span id="dup"></span>
<a href="#"></a>
</body>
</html>"##;

    fn ids(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn test_violations_follow_registry_order() {
        let engine = Engine::default();
        let violations = engine.analyze(SAMPLE);
        let positions: Vec<_> = violations
            .iter()
            .map(|v| rule_index(engine.rules(), &v.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert_eq!(
            ids(&violations),
            vec![
                "image-alt",
                "headings",
                "link-name",
                "focusable-name",
                "missing-title",
                "missing-lang",
                "empty-links-buttons",
                "duplicate-id",
                "viewport-missing",
            ]
        );
    }

    #[test]
    fn test_placeholder_link_in_sample() {
        let violations = Engine::default().analyze(SAMPLE);
        let link = violations.iter().find(|v| v.id == "link-name").unwrap();
        assert_eq!(link.nodes.len(), 1);
        assert_eq!(link.nodes[0].description.as_deref(), Some("Link points to \"#\""));
        assert_eq!(link.nodes[0].line, Some(9));
    }

    #[test]
    fn test_idempotent() {
        let engine = Engine::default();
        assert_eq!(engine.analyze(SAMPLE), engine.analyze(SAMPLE));
    }

    #[test]
    fn test_empty_input() {
        let violations = Engine::default().analyze("");
        assert_eq!(ids(&violations), vec!["missing-title", "missing-lang", "viewport-missing"]);
        assert!(violations.iter().all(|v| v.is_document_level()));
    }

    #[test]
    fn test_image_without_alt_has_one_node() {
        let violations = Engine::default().analyze(r#"<img src="x.png" alt="">"#);
        let image_alt: Vec<_> = violations.iter().filter(|v| v.id == "image-alt").collect();
        assert_eq!(image_alt.len(), 1);
        assert_eq!(image_alt[0].nodes.len(), 1);
    }

    #[test]
    fn test_configured_contrast_ratio() {
        let source = r#"<p style="color: #777">grey</p>"#;
        assert!(ids(&Engine::default().analyze(source)).contains(&"contrast"));

        let mut config = Config::default();
        config.contrast.min_ratio = 3.0;
        assert!(!ids(&Engine::new(&config).analyze(source)).contains(&"contrast"));
    }

    struct BrokenEngine;

    #[async_trait(?Send)]
    impl AuditEngine for BrokenEngine {
        fn name(&self) -> &str {
            "broken"
        }

        async fn audit(&self, _document: &Document) -> Result<serde_json::Value> {
            Err(Error::Audit("no browser".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_audit_leaves_violations_unchanged() {
        let engine = Engine::default();
        let analysis = engine.analyze_with_audit(SAMPLE, &BrokenEngine).await;
        assert_eq!(analysis.violations, engine.analyze(SAMPLE));
        assert!(!analysis.audit.is_completed());
        assert!(analysis
            .violations
            .iter()
            .any(|v| v.severity == Severity::Critical));
    }
}
