//! Static HTML to [`DomSnapshot`] conversion.
//!
//! Used by the HTTP renderer, which has no layout engine. Computed style is
//! approximated from the inline `style` attribute, the `hidden` attribute
//! and CSS inheritance rules:
//!
//! - `display` is not inherited, but a `display: none` ancestor takes the
//!   whole subtree out of layout.
//! - `visibility` is inherited unless overridden.
//! - `position: fixed` elements have no offset parent.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

use super::dom::{ComputedStyle, DomElement, DomNode, DomSnapshot};

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid body selector"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));

/// Elements the UA stylesheet renders with `display: none`.
const NEVER_RENDERED: &[&str] = &["template", "head", "meta", "link", "base", "title", "datalist"];

/// Style state inherited from the parent element.
#[derive(Debug, Clone, Copy)]
struct Inherited<'a> {
    visibility: &'a str,
    in_layout: bool,
}

/// Parse an HTML document into a snapshot of its `<body>`.
pub fn parse_snapshot(html: &str) -> DomSnapshot {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default();

    let root = Inherited {
        visibility: "visible",
        in_layout: true,
    };
    let body = document
        .select(&BODY)
        .next()
        .map(|body| child_nodes(body, root))
        .unwrap_or_default();

    DomSnapshot { title, body }
}

fn child_nodes(parent: ElementRef<'_>, inherited: Inherited<'_>) -> Vec<DomNode> {
    parent
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(DomNode::Text(text.to_string())),
            Node::Element(_) => ElementRef::wrap(child)
                .map(|el| DomNode::Element(convert_element(el, inherited))),
            _ => None,
        })
        .collect()
}

fn convert_element(el: ElementRef<'_>, inherited: Inherited<'_>) -> DomElement {
    let element = el.value();
    let tag = element.name().to_lowercase();
    let declarations = parse_inline_style(element.attr("style").unwrap_or(""));
    let lookup = |prop: &str| {
        declarations
            .iter()
            .rev()
            .find(|(name, _)| name == prop)
            .map(|(_, value)| value.as_str())
    };

    let display = if element.attr("hidden").is_some() || NEVER_RENDERED.contains(&tag.as_str()) {
        "none"
    } else {
        lookup("display").unwrap_or("block")
    };
    let visibility = lookup("visibility").unwrap_or(inherited.visibility);
    let opacity = lookup("opacity").unwrap_or("1");
    let fixed = lookup("position") == Some("fixed");

    let in_layout = inherited.in_layout && display != "none" && !fixed;
    let children = child_nodes(
        el,
        Inherited {
            visibility,
            in_layout: inherited.in_layout && display != "none",
        },
    );

    DomElement {
        tag,
        classes: element.classes().map(ToString::to_string).collect(),
        style: ComputedStyle {
            display: display.to_string(),
            visibility: visibility.to_string(),
            opacity: opacity.to_string(),
        },
        in_layout,
        children,
    }
}

/// Split `a: b; c: d !important` into lowercase `(property, value)` pairs.
fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let value = value.trim().trim_end_matches("!important").trim();
            let name = name.trim();
            (!name.is_empty() && !value.is_empty())
                .then(|| (name.to_lowercase(), value.to_lowercase()))
        })
        .collect()
}

/// Strip and collapse whitespace the way `document.title` does.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
