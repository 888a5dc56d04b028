//! Pure extraction heuristics over parsed HTML snapshots.
//!
//! Nothing in this module touches the live browser: every function takes a
//! [`scraper::Html`] document (or an [`ElementRef`] into one) produced from a
//! surface snapshot. The markup has no schema contract, so each resolver is an
//! ordered list of fallback strategies; structural absence yields an empty
//! result, never an error.

pub mod labeled;
pub mod links;
pub mod specs;
pub mod table;

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

/// Label pattern for the skp part link within a row.
pub static SKP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bskp\b").expect("BUG: hardcoded skp pattern is statically valid")
});

/// Label pattern for the interchange part link within a row.
pub static INTERCHANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\binterchange\b")
        .expect("BUG: hardcoded interchange pattern is statically valid")
});

/// Label pattern for the description field on a detail surface.
pub static DESCRIPTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)description").expect("BUG: hardcoded description pattern is statically valid")
});

/// Label pattern for the secondary info affordance on a detail surface.
pub static INFO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)info").expect("BUG: hardcoded info pattern is statically valid")
});

/// One resolved guide row: the vehicle/engine fields plus whatever part
/// links and disclosure affordances the row exposes. Owned data only — row
/// handles do not outlive the snapshot they were parsed from.
#[derive(Debug, Clone, Default)]
pub struct GuideRow {
    pub vehicle: String,
    pub engine: String,
    pub skp: Option<links::PartLink>,
    pub interchange: Option<links::PartLink>,
    pub disclosures: Vec<String>,
}

/// Resolve a full guide snapshot: table plan, row set, and per-row fields.
///
/// This is the composition point of the table resolver and the link
/// resolver; everything downstream (navigation, detail extraction) works
/// from the owned [`GuideRow`]s it returns.
#[must_use]
pub fn parse_guide(html: &str) -> Vec<GuideRow> {
    let doc = scraper::Html::parse_document(html);
    let plan = table::resolve_table(&doc);
    let (_strategy, rows) = table::resolve_rows(&doc, &plan);

    rows.into_iter()
        .map(|row| GuideRow {
            vehicle: table::row_field(row, plan.vehicle_col, 0),
            engine: table::row_field(row, plan.engine_col, 1),
            skp: links::find_part_link(row, &SKP_PATTERN),
            interchange: links::find_part_link(row, &INTERCHANGE_PATTERN),
            disclosures: links::disclosure_labels(row),
        })
        .collect()
}

/// Collapse internal whitespace runs to single spaces and trim.
#[must_use]
pub fn normalize_ws(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = true; // leading whitespace is dropped
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Normalized visible text of an element and all its descendants.
#[must_use]
pub fn element_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_runs_and_trims() {
        assert_eq!(normalize_ws("  a \n\t b  c "), "a b c");
        assert_eq!(normalize_ws(""), "");
        assert_eq!(normalize_ws(" \n "), "");
    }

    #[test]
    fn part_patterns_are_whole_word() {
        assert!(SKP_PATTERN.is_match("SKP Part"));
        assert!(SKP_PATTERN.is_match("view skp"));
        assert!(!SKP_PATTERN.is_match("skips"));
        assert!(INTERCHANGE_PATTERN.is_match("Interchange"));
        assert!(!INTERCHANGE_PATTERN.is_match("interchanges"));
    }
}
