//! Specification aggregation from tabular and definition-list markup.
//!
//! Detail surfaces describe a part with key/value attributes in either (or
//! both of) a specifications table and a `<dl>` definition list. Both sources
//! feed one insertion-ordered map; when a key appears in both, the
//! definition-list pass overwrites the table value in place.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::trace;

use super::element_text;

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table").expect("BUG: hardcoded selector 'table' is statically valid")
});

static TR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is statically valid")
});

static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("th, td").expect("BUG: hardcoded selector 'th, td' is statically valid")
});

static DT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("dt").expect("BUG: hardcoded selector 'dt' is statically valid")
});

static SPEC_TABLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)spec").expect("BUG: hardcoded spec pattern is statically valid")
});

/// Insertion-ordered label → value mapping for a part's specifications.
///
/// Keys are whatever labels the surface exposes, not a fixed set. Inserting
/// an existing key overwrites its value but keeps its original position, so
/// the merge of two sources stays deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecMap {
    entries: Vec<(String, String)>,
}

impl SpecMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Last writer wins; first insertion fixes position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `"key: value"` pairs joined by `" | "`, in insertion order.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Merge every discoverable specification pair on a detail surface.
///
/// Pass 1 reads the first table whose text mentions "spec": any row with at
/// least two cells contributes cell 0 as key and cell 1 as value. Pass 2
/// reads every `dt`, valued by its next sibling element. Empty keys are
/// skipped in both passes; pass 2 wins key conflicts.
#[must_use]
pub fn collect_specs(doc: &Html) -> SpecMap {
    let mut specs = SpecMap::new();

    if let Some(table) = doc
        .select(&TABLE_SELECTOR)
        .find(|t| SPEC_TABLE_PATTERN.is_match(&element_text(*t)))
    {
        for row in table.select(&TR_SELECTOR) {
            let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
            if cells.len() < 2 {
                continue;
            }
            let key = element_text(cells[0]);
            if key.is_empty() {
                continue;
            }
            specs.insert(key, element_text(cells[1]));
        }
        trace!("spec table contributed {} pairs", specs.len());
    }

    for dt in doc.select(&DT_SELECTOR) {
        let key = element_text(dt);
        if key.is_empty() {
            continue;
        }
        let value = dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .map(element_text)
            .unwrap_or_default();
        specs.insert(key, value);
    }

    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_in_place() {
        let mut specs = SpecMap::new();
        specs.insert("A", "1");
        specs.insert("B", "2");
        specs.insert("A", "9");
        assert_eq!(specs.render(), "A: 9 | B: 2");
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn render_empty_map() {
        assert_eq!(SpecMap::new().render(), "");
    }
}
