//! Guide table, row-set, and column-index resolution.
//!
//! The buyers-guide page carries its applications data in a table whose exact
//! markup varies. Table detection, header mapping, and row enumeration each
//! walk an ordered strategy list; the first strategy with a non-empty result
//! wins and is logged for diagnosability. An empty row set is a valid outcome.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use super::{element_text, normalize_ws};

static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table").expect("BUG: hardcoded selector 'table' is statically valid")
});

static BODY_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody tr").expect("BUG: hardcoded selector 'tbody tr' is statically valid")
});

static TR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr").expect("BUG: hardcoded selector 'tr' is statically valid")
});

static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td, th").expect("BUG: hardcoded selector 'td, th' is statically valid")
});

static TH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("th").expect("BUG: hardcoded selector 'th' is statically valid")
});

static TD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("td").expect("BUG: hardcoded selector 'td' is statically valid")
});

static ROLE_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[role='row']")
        .expect("BUG: hardcoded selector \"[role='row']\" is statically valid")
});

static ROW_CLASS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".row").expect("BUG: hardcoded selector '.row' is statically valid")
});

/// Header label pattern for the vehicle column.
pub static VEHICLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)vehicle").expect("BUG: hardcoded vehicle pattern is statically valid")
});

/// Header label pattern for the engine column.
pub static ENGINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)engine").expect("BUG: hardcoded engine pattern is statically valid")
});

/// How the guide table was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStrategy {
    /// Header cells matched both the vehicle and the engine label.
    HeaderMatch,
    /// No header match; first table whose full text mentions "vehicle".
    TextMatch,
    /// No table qualified.
    None,
}

/// How the row set was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStrategy {
    /// Body rows of the selected table.
    TableBody,
    /// Elements carrying an ARIA `role="row"` marker.
    RoleMarker,
    /// Elements carrying a `row` class token.
    RowClass,
    /// Any `tr` in the document outside a `thead`.
    AnyTableRow,
    /// Nothing row-like found; zero output rows.
    Empty,
}

/// Result of table detection: which table (by document order), how it was
/// found, and where the vehicle/engine columns sit. `None` indices trigger
/// the positional per-row fallback.
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub table_index: Option<usize>,
    pub strategy: TableStrategy,
    pub vehicle_col: Option<usize>,
    pub engine_col: Option<usize>,
}

/// Locate the guide table and its column indices.
#[must_use]
pub fn resolve_table(doc: &Html) -> TablePlan {
    let tables: Vec<ElementRef<'_>> = doc.select(&TABLE_SELECTOR).collect();

    // Strategy 1: headers name both columns.
    for (index, table) in tables.iter().enumerate() {
        let headers = header_texts(*table);
        let vehicle = header_index(&headers, &VEHICLE_PATTERN);
        let engine = header_index(&headers, &ENGINE_PATTERN);
        if vehicle.is_some() && engine.is_some() {
            debug!("guide table {index} located via header match");
            return TablePlan {
                table_index: Some(index),
                strategy: TableStrategy::HeaderMatch,
                vehicle_col: vehicle,
                engine_col: engine,
            };
        }
    }

    // Strategy 2: any table that at least talks about vehicles.
    for (index, table) in tables.iter().enumerate() {
        if VEHICLE_PATTERN.is_match(&element_text(*table)) {
            let headers = header_texts(*table);
            debug!("guide table {index} located via text match");
            return TablePlan {
                table_index: Some(index),
                strategy: TableStrategy::TextMatch,
                vehicle_col: header_index(&headers, &VEHICLE_PATTERN),
                engine_col: header_index(&headers, &ENGINE_PATTERN),
            };
        }
    }

    debug!("no guide table found, row-marker fallback will be used");
    TablePlan {
        table_index: None,
        strategy: TableStrategy::None,
        vehicle_col: None,
        engine_col: None,
    }
}

/// Enumerate the row set for a plan.
///
/// Table body rows first; when the table yields nothing (or there is no
/// table), fall through the row-marker chain. Returns the strategy that fired
/// alongside the rows so callers can log it; an empty set is valid.
#[must_use]
pub fn resolve_rows<'a>(doc: &'a Html, plan: &TablePlan) -> (RowStrategy, Vec<ElementRef<'a>>) {
    if let Some(index) = plan.table_index
        && let Some(table) = doc.select(&TABLE_SELECTOR).nth(index)
    {
        let rows: Vec<ElementRef<'a>> = table
            .select(&BODY_ROW_SELECTOR)
            .filter(|row| !is_header_row(*row))
            .collect();
        if !rows.is_empty() {
            return (RowStrategy::TableBody, rows);
        }
    }

    let role_rows: Vec<ElementRef<'a>> = doc.select(&ROLE_ROW_SELECTOR).collect();
    if !role_rows.is_empty() {
        debug!("row set resolved via role marker ({} rows)", role_rows.len());
        return (RowStrategy::RoleMarker, role_rows);
    }

    let class_rows: Vec<ElementRef<'a>> = doc.select(&ROW_CLASS_SELECTOR).collect();
    if !class_rows.is_empty() {
        debug!("row set resolved via row class ({} rows)", class_rows.len());
        return (RowStrategy::RowClass, class_rows);
    }

    let any_rows: Vec<ElementRef<'a>> = doc
        .select(&TR_SELECTOR)
        .filter(|row| !in_thead(*row) && !is_header_row(*row))
        .collect();
    if !any_rows.is_empty() {
        debug!("row set resolved via bare tr scan ({} rows)", any_rows.len());
        return (RowStrategy::AnyTableRow, any_rows);
    }

    (RowStrategy::Empty, Vec::new())
}

/// Read one named field from a row.
///
/// With a known column index, the cell's trimmed text. Without one, the
/// positional fallback: the row's text lines, `line` picking which (0 for
/// vehicle, 1 for engine). Both paths yield `""` on absence, never an error.
#[must_use]
pub fn row_field(row: ElementRef<'_>, col: Option<usize>, line: usize) -> String {
    if let Some(col) = col {
        return row
            .select(&CELL_SELECTOR)
            .nth(col)
            .map(element_text)
            .unwrap_or_default();
    }
    text_lines(row).into_iter().nth(line).unwrap_or_default()
}

/// Header cell texts of a table: `th` cells, else the first row's cells.
fn header_texts(table: ElementRef<'_>) -> Vec<String> {
    let th: Vec<String> = table.select(&TH_SELECTOR).map(element_text).collect();
    if !th.is_empty() {
        return th;
    }
    table
        .select(&TR_SELECTOR)
        .next()
        .map(|row| row.select(&CELL_SELECTOR).map(element_text).collect())
        .unwrap_or_default()
}

/// 0-based position of the first header cell matching `pattern`.
fn header_index(headers: &[String], pattern: &Regex) -> Option<usize> {
    headers.iter().position(|h| pattern.is_match(h))
}

/// A row made of header cells only carries no application data.
fn is_header_row(row: ElementRef<'_>) -> bool {
    row.select(&TD_SELECTOR).next().is_none() && row.select(&TH_SELECTOR).next().is_some()
}

fn in_thead(row: ElementRef<'_>) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name().eq_ignore_ascii_case("thead"))
}

/// Visible text of a row split into lines, one per child block.
///
/// Approximates rendered-text line structure: each child element contributes
/// its whole text as one line, bare text nodes contribute their own. Used by
/// the positional field fallback when no column header matched.
#[must_use]
pub fn text_lines(row: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for child in row.children() {
        if let Some(text) = child.value().as_text() {
            let line = normalize_ws(text);
            if !line.is_empty() {
                lines.push(line);
            }
        } else if let Some(el) = ElementRef::wrap(child) {
            let line = element_text(el);
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }
    lines
}
