// SPDX-License-Identifier: PMPL-1.0-or-later
//! Best-effort source line recovery.
//!
//! The parsed tree carries no source positions, so an element's line is
//! recovered by searching the original text for a line containing its
//! opening tag and every one of its attributes. Attribute names and values
//! are escaped before they become part of a pattern.
//!
//! This is a heuristic. Tags spread over several lines, entity-encoded
//! attribute values or attributes the parser synthesized will not be found,
//! and the element then simply has no line. Identical elements all resolve to
//! the first line that matches.

use crate::document::Node;
use regex::Regex;
use tracing::debug;

/// Resolves elements back to 1-based line numbers in their source text
#[derive(Debug, Clone, Copy)]
pub struct LineResolver<'s> {
    source: &'s str,
}

impl<'s> LineResolver<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }

    /// First line containing the element's opening tag and attributes
    pub fn resolve(&self, node: &Node<'_>) -> Option<usize> {
        self.resolve_parts(node.tag_name(), &node.attributes())
    }

    /// Same as [`resolve`](Self::resolve) for an explicit tag/attribute snapshot
    pub fn resolve_parts(&self, tag: &str, attributes: &[(&str, &str)]) -> Option<usize> {
        let patterns = match build_patterns(tag, attributes) {
            Ok(patterns) => patterns,
            Err(e) => {
                debug!("Cannot build line pattern for <{}>: {}", tag, e);
                return None;
            }
        };

        self.source
            .lines()
            .position(|line| patterns.iter().all(|re| re.is_match(line)))
            .map(|idx| idx + 1)
    }
}

/// Build one pattern for the opening tag plus one per attribute
pub fn build_patterns(tag: &str, attributes: &[(&str, &str)]) -> Result<Vec<Regex>, regex::Error> {
    let mut patterns = Vec::with_capacity(attributes.len() + 1);
    patterns.push(Regex::new(&format!(
        r"(?i)<{}(?:[\s/>]|$)",
        regex::escape(tag)
    ))?);

    for (name, value) in attributes {
        let name = regex::escape(name);
        let pattern = if value.is_empty() {
            format!(r#"(?:^|[\s"'/])(?i:{name})(?:[\s/>=]|$)"#)
        } else {
            let value = regex::escape(value);
            format!(
                r#"(?:^|[\s"'/])(?i:{name})\s*=\s*(?:"{value}"|'{value}'|{value}(?:[\s/>]|$))"#
            )
        };
        patterns.push(Regex::new(&pattern)?);
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn line_of(source: &str, selector: &str, index: usize) -> Option<usize> {
        let doc = Document::parse(source);
        let nodes = doc.select(selector).unwrap();
        LineResolver::new(source).resolve(&nodes[index])
    }

    #[test]
    fn test_finds_line_of_element() {
        let source = "<html>\n<body>\n<p>text</p>\n<img src=\"logo.png\">\n</body>\n</html>";
        assert_eq!(line_of(source, "img", 0), Some(4));
        assert_eq!(line_of(source, "p", 0), Some(3));
    }

    #[test]
    fn test_distinguishes_by_attributes() {
        let source = "<img src=\"a.png\">\n<img src=\"b.png\" alt=\"\">";
        assert_eq!(line_of(source, "img", 0), Some(1));
        assert_eq!(line_of(source, "img", 1), Some(2));
    }

    #[test]
    fn test_quote_styles_and_attribute_order() {
        let source = "<div>\n<input name='q' type=text>\n</div>";
        assert_eq!(line_of(source, "input", 0), Some(2));
        assert_eq!(
            LineResolver::new(source).resolve_parts("input", &[("type", "text"), ("name", "q")]),
            Some(2)
        );
    }

    #[test]
    fn test_regex_special_characters_are_escaped() {
        let source = "<p>\n<a href=\"a(b)c\">x</a>\n<a href=\"[*+?]{2}\\d$^|\">y</a>\n</p>";
        assert_eq!(line_of(source, "a", 0), Some(2));
        assert_eq!(line_of(source, "a", 1), Some(3));
    }

    #[test]
    fn test_tag_prefix_does_not_match() {
        // `<i` must not match `<img` or `<input`
        let source = "<img src=x>\n<i>italic</i>";
        assert_eq!(line_of(source, "i", 0), Some(2));
    }

    #[test]
    fn test_no_match_is_none() {
        // Synthesized elements never appear in the source
        assert_eq!(line_of("<p>hi</p>", "body", 0), None);

        // Tag split over lines
        let source = "<img\n  src=\"a.png\">";
        assert_eq!(line_of(source, "img", 0), None);
    }

    #[test]
    fn test_bare_attribute() {
        let source = "<input type=text>\n<input type=text disabled>";
        assert_eq!(line_of(source, "input", 1), Some(2));
    }
}
