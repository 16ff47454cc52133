// SPDX-License-Identifier: PMPL-1.0-or-later
//! Style resolution without a layout engine.
//!
//! Browsers expose a fully cascaded computed style for every element. Without
//! a rendering engine we approximate it from what the author declared:
//! - the element's inline `style` attribute wins
//! - otherwise the last `<style>` rule whose selector matches the element and
//!   declares the property (source order, no specificity)
//! - no inheritance and no user-agent defaults
//!
//! Contrast and zoom checks therefore only see colors and zoom settings that
//! are declared directly on the element they inspect.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

/// Computed-style lookup capability
pub trait StyleResolver {
    /// Resolved value of `property` for `element`, if one can be determined
    fn resolve(&self, element: ElementRef<'_>, property: &str) -> Option<String>;
}

/// One `property: value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug)]
struct StyleRule {
    selector: Selector,
    declarations: Vec<Declaration>,
}

/// Styles declared in `<style>` blocks and inline `style` attributes
#[derive(Debug, Default)]
pub struct DeclaredStyles {
    rules: Vec<StyleRule>,
}

impl DeclaredStyles {
    /// Collect the rules of every `<style>` element in document order
    pub fn from_html(html: &Html) -> Self {
        let mut styles = DeclaredStyles::default();
        let blocks = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "style");

        for block in blocks {
            let css: String = block.text().collect();
            styles.add_stylesheet(&css);
        }

        styles
    }

    /// Append the rules of one stylesheet
    pub fn add_stylesheet(&mut self, css: &str) {
        let css = COMMENT_RE.replace_all(css, "");
        for (prelude, body) in split_rules(&css) {
            match Selector::parse(prelude) {
                Ok(selector) => self.rules.push(StyleRule {
                    selector,
                    declarations: parse_declarations(body),
                }),
                Err(e) => debug!("Skipping unsupported selector {:?}: {:?}", prelude, e),
            }
        }
    }

    /// Number of usable rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl StyleResolver for DeclaredStyles {
    fn resolve(&self, element: ElementRef<'_>, property: &str) -> Option<String> {
        let property = property.to_ascii_lowercase();

        if let Some(inline) = element.value().attr("style") {
            let found = parse_declarations(inline)
                .into_iter()
                .rev()
                .find(|d| d.property == property);
            if let Some(declaration) = found {
                return Some(declaration.value);
            }
        }

        self.rules
            .iter()
            .rev()
            .filter(|rule| rule.selector.matches(&element))
            .find_map(|rule| {
                rule.declarations
                    .iter()
                    .rev()
                    .find(|d| d.property == property)
                    .map(|d| d.value.clone())
            })
    }
}

/// Parse a declaration list (`color: red; zoom: 1`)
pub fn parse_declarations(text: &str) -> Vec<Declaration> {
    text.split(';')
        .filter_map(|part| {
            let (property, value) = part.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = strip_important(value.trim());
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some(Declaration {
                property,
                value: value.to_string(),
            })
        })
        .collect()
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(pos) if lower[pos..].trim() == "!important" => value[..pos].trim_end(),
        _ => value,
    }
}

/// Split a stylesheet into `(selector list, declaration block)` pairs,
/// skipping at-rules and their nested blocks
fn split_rules(css: &str) -> Vec<(&str, &str)> {
    let mut rules = Vec::new();
    let mut rest = css;

    while let Some(open) = rest.find('{') {
        // Statements such as `@import url(x);` end at a semicolon
        let prelude = rest[..open].rsplit(';').next().unwrap_or("").trim();
        let after = &rest[open + 1..];

        if prelude.starts_with('@') {
            let mut depth = 1;
            let mut end = after.len();
            for (i, c) in after.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            end = i;
                            break;
                        }
                    }
                    _ => {}
                }
            }
            rest = after.get(end + 1..).unwrap_or("");
            continue;
        }

        let Some(close) = after.find('}') else {
            break;
        };
        if !prelude.is_empty() {
            rules.push((prelude, &after[..close]));
        }
        rest = &after[close + 1..];
    }

    rules
}
