// SPDX-License-Identifier: PMPL-1.0-or-later
//! Read-only HTML document model.
//!
//! Markup is parsed with the html5ever tree builder (via `scraper`), so
//! unclosed tags, missing `<html>`/`<head>`/`<body>` and other malformed input
//! are repaired instead of rejected. The tree is never mutated after
//! [`Document::parse`] returns; rules only ever see `&Document` and the
//! [`Node`] handles borrowed from it.

pub mod style;

use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use style::{DeclaredStyles, StyleResolver};
use tracing::debug;

/// A parsed HTML document together with its declared stylesheet
#[derive(Debug)]
pub struct Document {
    html: Html,
    styles: DeclaredStyles,
}

impl Document {
    /// Parse markup permissively. Never fails; empty input yields the
    /// implicit `<html><head></head><body></body></html>` skeleton.
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        if !html.errors.is_empty() {
            debug!("Parser recovered from {} markup error(s)", html.errors.len());
        }
        let styles = DeclaredStyles::from_html(&html);
        Self { html, styles }
    }

    /// The document element (`<html>`)
    pub fn root(&self) -> Node<'_> {
        Node::new(self.html.root_element(), self)
    }

    /// The `<body>` element, if the tree has one
    pub fn body(&self) -> Option<Node<'_>> {
        self.root().children().into_iter().find(|n| n.tag_name() == "body")
    }

    /// The first `<title>` element that is not part of inline SVG
    pub fn title(&self) -> Option<Node<'_>> {
        self.elements()
            .find(|n| n.tag_name() == "title" && !n.ancestors().any(|a| a.tag_name() == "svg"))
    }

    /// Every element in document order, starting with the root
    pub fn elements(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.root().descendants_and_self()
    }

    /// Select elements matching a CSS selector, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<Node<'_>>> {
        let parsed = parse_selector(selector)?;
        Ok(self
            .html
            .select(&parsed)
            .map(|element| Node::new(element, self))
            .collect())
    }

    /// The style resolver backing [`Node::computed_style`]
    pub fn styles(&self) -> &dyn StyleResolver {
        &self.styles
    }

    /// Serialize the whole (repaired) document back to markup
    pub fn to_html(&self) -> String {
        self.html.html()
    }
}

/// Parse a CSS selector into a typed error instead of panicking
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// A borrowed handle to one element of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
    document: &'a Document,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for Node<'_> {}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>, document: &'a Document) -> Self {
        Self { element, document }
    }

    /// The underlying `scraper` element
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    /// Lowercase local tag name
    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Attribute value if present and not blank
    ///
    /// Mirrors how scripts test `getAttribute(name)` for truthiness: an
    /// attribute set to `""` counts as missing.
    pub fn non_empty_attr(&self, name: &str) -> Option<&'a str> {
        self.attr(name).filter(|v| !v.trim().is_empty())
    }

    /// All attributes in source order
    pub fn attributes(&self) -> Vec<(&'a str, &'a str)> {
        self.element.value().attrs().collect()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Whether the element contains any non-whitespace text
    pub fn has_text(&self) -> bool {
        self.element.text().any(|t| !t.trim().is_empty())
    }

    /// Outer HTML of this element
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Child elements in order
    pub fn children(&self) -> Vec<Node<'a>> {
        let document = self.document;
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(|e| Node::new(e, document))
            .collect()
    }

    /// Ancestor elements, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let document = self.document;
        self.element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(move |e| Node::new(e, document))
    }

    /// Descendant elements in document order, excluding this one
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        self.descendants_and_self().skip(1)
    }

    fn descendants_and_self(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let document = self.document;
        self.element
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(move |e| Node::new(e, document))
    }

    /// Whether any descendant element has the given tag name
    pub fn has_descendant(&self, tag: &str) -> bool {
        self.descendants().any(|d| d.tag_name() == tag)
    }

    /// Resolved value of a style property, see [`style`] for the approximation
    pub fn computed_style(&self, property: &str) -> Option<String> {
        self.document.styles().resolve(self.element, property)
    }

    /// `<label>` elements associated with this control: `label[for=id]`
    /// anywhere in the document, then wrapping labels
    pub fn labels(&self) -> Vec<Node<'a>> {
        let mut labels: Vec<Node<'a>> = Vec::new();

        if let Some(id) = self.non_empty_attr("id") {
            labels.extend(
                self.document
                    .elements()
                    .filter(|n| n.tag_name() == "label" && n.attr("for") == Some(id)),
            );
        }

        for ancestor in self.ancestors().filter(|a| a.tag_name() == "label") {
            if !labels.contains(&ancestor) {
                labels.push(ancestor);
            }
        }

        labels
    }
}
