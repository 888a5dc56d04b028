//! Labeled-value extraction.
//!
//! Detail surfaces expose fields as label/value pairs in no particular
//! markup: `<dt>/<dd>`, bold label with trailing text, a table row, or a
//! label span inside a container with a value-marked sibling. The resolver
//! finds the first text node matching the label pattern and walks an ordered
//! fallback chain around it; any failure yields `""`, never an error.

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use tracing::trace;

use super::{element_text, normalize_ws};

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded selector 'body' is statically valid")
});

static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td, th").expect("BUG: hardcoded selector 'td, th' is statically valid")
});

static VALUE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("dd, [data-value], [class*='value']")
        .expect("BUG: hardcoded value selector is statically valid")
});

/// Elements treated as generic containers for the descendant-value fallback.
const CONTAINER_TAGS: [&str; 7] = ["div", "section", "li", "p", "dl", "fieldset", "article"];

/// Normalized text of the value associated with the first label matching
/// `pattern`, or `""` when no label (or no value) is found.
///
/// Resolution order around the label's text node:
/// 1. its own following sibling (text or element) within the label element;
/// 2. the label element's following sibling;
/// 3. the last cell of the enclosing table row;
/// 4. a value-marked descendant of the nearest generic container ancestor.
#[must_use]
pub fn labeled_value(doc: &Html, pattern: &Regex) -> String {
    // Head text (title, metadata) is not visible; search the body only.
    let scope = doc
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| doc.root_element());
    for node in scope.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !pattern.is_match(text) {
            continue;
        }
        let Some(label_el) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if is_invisible(label_el) {
            continue;
        }
        trace!("label matched in <{}>", label_el.value().name());
        return resolve_value(node, label_el).unwrap_or_default();
    }
    String::new()
}

fn resolve_value(label_node: NodeRef<'_, Node>, label_el: ElementRef<'_>) -> Option<String> {
    if let Some(value) = following_text(label_node) {
        return Some(value);
    }
    if let Some(value) = following_text(*label_el) {
        return Some(value);
    }
    if let Some(value) = row_last_cell(label_node, label_el) {
        return Some(value);
    }
    container_value(label_node, label_el)
}

/// Text of the first meaningful sibling after `node`: a non-whitespace text
/// node, or the first element (whose emptiness ends the search).
fn following_text(node: NodeRef<'_, Node>) -> Option<String> {
    for sibling in node.next_siblings() {
        if let Some(text) = sibling.value().as_text() {
            let value = normalize_ws(text);
            if !value.is_empty() {
                return Some(value);
            }
            continue;
        }
        if let Some(el) = ElementRef::wrap(sibling) {
            if is_invisible(el) {
                continue;
            }
            let value = element_text(el);
            return if value.is_empty() { None } else { Some(value) };
        }
    }
    None
}

/// Last cell of the table row enclosing the label, unless the label sits in
/// that cell itself.
fn row_last_cell(label_node: NodeRef<'_, Node>, label_el: ElementRef<'_>) -> Option<String> {
    let row = label_el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name().eq_ignore_ascii_case("tr"))?;
    let cell = row.select(&CELL_SELECTOR).last()?;
    if contains_node(cell, label_node) {
        return None;
    }
    let value = element_text(cell);
    (!value.is_empty()).then_some(value)
}

/// Value-marked descendant of the nearest generic container ancestor.
fn container_value(label_node: NodeRef<'_, Node>, label_el: ElementRef<'_>) -> Option<String> {
    for ancestor in label_el.ancestors().filter_map(ElementRef::wrap) {
        let tag = ancestor.value().name();
        if !CONTAINER_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)) {
            continue;
        }
        for candidate in ancestor.select(&VALUE_SELECTOR) {
            if contains_node(candidate, label_node) {
                continue;
            }
            let value = element_text(candidate);
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

fn contains_node(el: ElementRef<'_>, node: NodeRef<'_, Node>) -> bool {
    el.descendants().any(|d| d.id() == node.id())
}

fn is_invisible(el: ElementRef<'_>) -> bool {
    let tag = el.value().name();
    tag.eq_ignore_ascii_case("script") || tag.eq_ignore_ascii_case("style")
}
