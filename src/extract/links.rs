//! Part-link and disclosure resolution within a row.
//!
//! A part link is whatever clickable element carries the part's name in its
//! visible text. Anchors are preferred (they carry a navigable `href`);
//! buttons are a fallback and yield no target. Disclosure affordances are
//! reported by label so the orchestrator can click them on the live page
//! before the final snapshot.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use super::element_text;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("BUG: hardcoded selector 'a' is statically valid")
});

static BUTTON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("button").expect("BUG: hardcoded selector 'button' is statically valid")
});

static COLLAPSED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[aria-expanded='false'], summary, .collapsed")
        .expect("BUG: hardcoded collapsed selector is statically valid")
});

/// Buttons and anchors whose label announces hidden detail.
static DISCLOSURE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(expand|details|show)\b")
        .expect("BUG: hardcoded disclosure pattern is statically valid")
});

/// CSS scope used when clicking disclosure affordances on the live page.
pub const DISCLOSURE_CLICK_SELECTOR: &str =
    "a, button, summary, [aria-expanded='false'], .collapsed";

/// A clickable element believed to represent a named part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLink {
    /// Normalized visible text of the element.
    pub text: String,
    /// Raw `href` when the element is an anchor; buttons have none.
    pub href: Option<String>,
}

/// First clickable element in `row` whose visible text matches `pattern`.
///
/// Anchors win over buttons; within each kind, document order decides.
/// Returns `None` when nothing matches — never an error.
#[must_use]
pub fn find_part_link(row: ElementRef<'_>, pattern: &Regex) -> Option<PartLink> {
    for anchor in row.select(&ANCHOR_SELECTOR) {
        let text = element_text(anchor);
        if pattern.is_match(&text) {
            return Some(PartLink {
                text,
                href: anchor.value().attr("href").map(str::to_string),
            });
        }
    }

    for button in row.select(&BUTTON_SELECTOR) {
        let text = element_text(button);
        if pattern.is_match(&text) {
            return Some(PartLink { text, href: None });
        }
    }

    None
}

/// Labels of collapsed/disclosure affordances within a row.
///
/// Covers explicitly collapsed markup (`aria-expanded="false"`, `summary`,
/// a `collapsed` class) and buttons/anchors labeled Expand/Details/Show.
/// Empty-text affordances are dropped: the live click is text-addressed.
#[must_use]
pub fn disclosure_labels(row: ElementRef<'_>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    let mut push = |text: String| {
        if !text.is_empty() && !labels.contains(&text) {
            labels.push(text);
        }
    };

    for el in row.select(&COLLAPSED_SELECTOR) {
        push(element_text(el));
    }
    for el in row
        .select(&BUTTON_SELECTOR)
        .chain(row.select(&ANCHOR_SELECTOR))
    {
        let text = element_text(el);
        if DISCLOSURE_TEXT.is_match(&text) {
            push(text);
        }
    }

    labels
}
