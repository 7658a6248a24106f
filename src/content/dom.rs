//! Rendered DOM snapshot and visible-text collection.
//!
//! A [`BrowsingSession`](crate::render::BrowsingSession) hands back a
//! [`DomSnapshot`]: the `<body>` subtree with the computed-style signals
//! needed to decide visibility. [`TextCollector`] walks it in document
//! order and emits each distinct visible text fragment once.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid blank-line regex"));

/// The `<body>` of a rendered page plus its title.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DomSnapshot {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<DomNode>,
}

/// A child of an element: a text node or another element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DomNode {
    Text(String),
    Element(DomElement),
}

/// An element with its computed visibility state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomElement {
    /// Lowercase tag name.
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub style: ComputedStyle,
    /// Whether the element takes part in layout (`offsetParent` is set).
    #[serde(default = "default_true")]
    pub in_layout: bool,
    #[serde(default)]
    pub children: Vec<DomNode>,
}

fn default_true() -> bool {
    true
}

/// The computed style properties that decide visibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".into(),
            visibility: "visible".into(),
            opacity: "1".into(),
        }
    }
}

impl DomElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            classes: Vec::new(),
            style: ComputedStyle::default(),
            in_layout: true,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(DomNode::Text(text.to_string()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: DomElement) -> Self {
        self.children.push(DomNode::Element(child));
        self
    }

    /// Visible iff not `display: none`, not `visibility: hidden`, opacity
    /// not zero, and laid out.
    pub fn is_visible(&self) -> bool {
        let opacity_zero = self
            .style
            .opacity
            .trim()
            .parse::<f64>()
            .is_ok_and(|o| o == 0.0);

        self.style.display != "none"
            && self.style.visibility != "hidden"
            && !opacity_zero
            && self.in_layout
    }

    /// Immediate text-node children, each trimmed, concatenated without a
    /// separator. `<p>Hello <b>bold</b> world</p>` gives `"Helloworld"`.
    pub fn direct_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                DomNode::Text(text) => Some(text.trim()),
                DomNode::Element(_) => None,
            })
            .collect()
    }

    /// `li` and `h1`–`h6` keep their text inside inline children, so they
    /// also contribute their full text.
    fn is_structural(&self) -> bool {
        match self.tag.as_bytes() {
            b"li" => true,
            [b'h', level] => (b'1'..=b'6').contains(level),
            _ => false,
        }
    }
}

/// A noise selector: a bare tag name or a `.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NoiseSelector {
    Tag(String),
    Class(String),
}

impl NoiseSelector {
    fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        match selector.strip_prefix('.') {
            Some("") => None,
            Some(class) => Some(Self::Class(class.to_string())),
            None if selector.is_empty() => None,
            None => Some(Self::Tag(selector.to_lowercase())),
        }
    }

    fn matches(&self, element: &DomElement) -> bool {
        match self {
            Self::Tag(tag) => element.tag == *tag,
            Self::Class(class) => element.classes.iter().any(|c| c == class),
        }
    }
}

/// Collects deduplicated visible text from a [`DomSnapshot`].
///
/// The collector itself is immutable; each [`collect`](Self::collect) call
/// owns its own seen set, so one collector can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct TextCollector {
    noise: Vec<NoiseSelector>,
}

impl TextCollector {
    pub fn new<S: AsRef<str>>(noise_selectors: &[S]) -> Self {
        Self {
            noise: noise_selectors
                .iter()
                .filter_map(|s| NoiseSelector::parse(s.as_ref()))
                .collect(),
        }
    }

    fn is_noise(&self, element: &DomElement) -> bool {
        self.noise.iter().any(|sel| sel.matches(element))
    }

    /// Ordered, deduplicated visible text of the snapshot, joined by
    /// newlines. Returns an empty string when nothing is visible.
    pub fn collect(&self, snapshot: &DomSnapshot) -> String {
        let mut seen = HashSet::new();
        let mut fragments = Vec::new();

        for node in &snapshot.body {
            if let DomNode::Element(element) = node {
                self.visit(element, &mut seen, &mut fragments);
            }
        }

        let joined = fragments.join("\n");
        BLANK_LINES.replace_all(&joined, "\n").trim().to_string()
    }

    fn visit(&self, element: &DomElement, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        if self.is_noise(element) {
            return;
        }

        if element.is_visible() {
            push_unseen(element.direct_text(), seen, out);

            if element.is_structural() {
                let full = self.full_text_without_noise(element);
                push_unseen(full.trim().to_string(), seen, out);
            }
        }

        for child in &element.children {
            if let DomNode::Element(child) = child {
                self.visit(child, seen, out);
            }
        }
    }

    /// Full text of `element`, skipping noise descendants (they are removed
    /// from the page before collection).
    fn full_text_without_noise(&self, element: &DomElement) -> String {
        let mut out = String::new();
        for child in &element.children {
            match child {
                DomNode::Text(text) => out.push_str(text),
                DomNode::Element(el) if !self.is_noise(el) => {
                    out.push_str(&self.full_text_without_noise(el));
                }
                DomNode::Element(_) => {}
            }
        }
        out
    }
}

impl Default for TextCollector {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NOISE_SELECTORS)
    }
}

fn push_unseen(text: String, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    if !text.is_empty() && seen.insert(text.clone()) {
        out.push(text);
    }
}
