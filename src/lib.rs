// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcagbot - heuristic WCAG violation detection for HTML documents
//!
//! Part of the gitbot-fleet ecosystem. wcagbot parses one markup document,
//! runs a fixed set of accessibility rules over it and reports each violation
//! with the affected elements and their best-effort source lines.
//!
//! ## Rules
//!
//! - **Non-text content** (1.1.1): `image-alt`, `chart-alt`
//! - **Forms** (3.3.2/1.3.1): `form-label`, `fieldset-legend`
//! - **Contrast** (1.4.3): `contrast`
//! - **Structure** (1.3.1/2.4.6): `table-headers`, `landmark`, `headings`,
//!   `unlabeled-landmarks`
//! - **Keyboard** (2.4.3/2.4.4/4.1.2): `link-name`, `focusable-name`,
//!   `high-tabindex`, `empty-links-buttons`
//! - **Page** (2.4.2/3.1.1): `missing-title`, `missing-lang`, `iframe-title`
//! - **Uniqueness** (4.1.1): `duplicate-role-*`, `duplicate-id`
//! - **Media** (1.2.2): `media-alternatives`
//! - **Zoom** (1.4.4): `viewport-restricts-zoom`, `viewport-missing`,
//!   `css-zoom-restriction`
//!
//! ```
//! let violations = wcagbot::analyze(r#"<html lang="en"><img src="logo.png"></html>"#);
//! assert_eq!(violations[0].id, "image-alt");
//! ```

pub mod audit;
pub mod config;
pub mod contrast;
pub mod document;
pub mod engine;
pub mod error;
pub mod locate;
pub mod report;
pub mod rules;
pub mod violation;

pub use document::Document;
pub use engine::{Analysis, Engine};
pub use error::{Error, Result};
pub use violation::{AffectedNode, Severity, Violation};

/// Analyze markup with the default configuration
pub fn analyze(source: &str) -> Vec<Violation> {
    Engine::default().analyze(source)
}
