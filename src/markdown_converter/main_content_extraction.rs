//! Main content extraction from page markup.
//!
//! Finds the element holding the page's primary content and serializes it
//! back to HTML with navigation, chrome, and consent banners removed.

use anyhow::{Result, anyhow};
use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::utils::MAX_REGENERATION_HTML_BYTES;

/// Nesting depth past which serialization stops descending
const MAX_HTML_NESTING_DEPTH: usize = 100;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Main-content containers, most specific first
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role='main']",
    "article",
    ".content",
    ".main-content",
    ".markdown-body",
    ".docs-content",
    ".doc-content",
    ".prose",
    ".md-content",
    "#content-area",
    "[data-docs-content]",
    "[data-content]",
];

/// Navigation, page chrome, and cookie-consent widgets
const EXCLUDED_SELECTORS: &[&str] = &[
    "nav",
    "footer",
    "header",
    "aside",
    "form",
    "#navbar",
    "#onetrust-banner-sdk",
    ".toc",
    ".table-of-contents",
    ".breadcrumbs",
    ".sidebar",
    "[class*='sidebar']",
    "[role='navigation']",
    "[data-testid='breadcrumbs']",
    ".cky-consent-container",
    ".cky-preference-center",
    ".cky-overlay",
    ".cky-modal",
    ".cky-consent-bar",
    ".cky-notice",
];

static MAIN_CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    MAIN_CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("MAIN_CONTENT: hardcoded CSS selector is valid"))
        .collect()
});

static EXCLUDED: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    EXCLUDED_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("EXCLUDED: hardcoded CSS selector is valid"))
        .collect()
});

/// Extract the main content of `html` as an HTML fragment.
///
/// `custom` is tried before the built-in container list. Returns `Ok(None)`
/// when no container matches.
///
/// # Errors
///
/// Returns an error when `html` exceeds [`MAX_REGENERATION_HTML_BYTES`].
pub fn extract_main_content(html: &str, custom: Option<&Selector>) -> Result<Option<String>> {
    if html.len() > MAX_REGENERATION_HTML_BYTES {
        return Err(anyhow!(
            "HTML input too large: {} bytes (limit {})",
            html.len(),
            MAX_REGENERATION_HTML_BYTES
        ));
    }

    let document = Html::parse_document(html);

    let container = custom
        .into_iter()
        .chain(MAIN_CONTENT.iter())
        .find_map(|selector| document.select(selector).next());

    let Some(container) = container else {
        tracing::debug!("No main content container matched");
        return Ok(None);
    };

    let mut to_remove: HashSet<NodeId> = HashSet::new();
    for selector in EXCLUDED.iter() {
        for element in container.select(selector) {
            // Never drop the container itself, only its descendants
            if element.id() != container.id() {
                to_remove.insert(element.id());
            }
        }
    }

    let mut output = String::with_capacity(html.len() / 2);
    serialize_children(&container, &to_remove, &mut output, 0);
    Ok(Some(output))
}

fn push_escaped(output: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            c => output.push(c),
        }
    }
}

/// Serialize the children of `element`, skipping removed subtrees.
fn serialize_children(
    element: &ElementRef,
    to_remove: &HashSet<NodeId>,
    output: &mut String,
    depth: usize,
) {
    if depth > MAX_HTML_NESTING_DEPTH {
        tracing::warn!(
            element = element.value().name(),
            limit = MAX_HTML_NESTING_DEPTH,
            "Maximum HTML nesting depth exceeded, truncating"
        );
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_escaped(output, text),
            Node::Element(_) => {
                let Some(child_elem) = ElementRef::wrap(child) else {
                    continue;
                };
                if to_remove.contains(&child_elem.id()) {
                    continue;
                }

                let name = child_elem.value().name();
                output.push('<');
                output.push_str(name);
                for (attr, value) in child_elem.value().attrs() {
                    output.push(' ');
                    output.push_str(attr);
                    output.push_str("=\"");
                    push_escaped(output, value);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }

                serialize_children(&child_elem, to_remove, output, depth + 1);
                output.push_str("</");
                output.push_str(name);
                output.push('>');
            }
            _ => {}
        }
    }
}
