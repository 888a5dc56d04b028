//! Output records and CSV serialization.
//!
//! One [`OutputRow`] per guide row, in source order, flattened to exactly ten
//! columns. Quoting follows the csv crate's necessary-only default: a field
//! is quoted (with internal quotes doubled) only when it contains a comma, a
//! quote, or a line break. Missing values are empty fields.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::extract::specs::SpecMap;

/// Column header of the emitted CSV, in order.
pub const CSV_HEADER: [&str; 10] = [
    "vehicle",
    "engine",
    "skpPart",
    "skpUrl",
    "skpDescription",
    "skpSpecs",
    "interchangePart",
    "interchangeUrl",
    "interchangeDescription",
    "interchangeSpecs",
];

/// One part's extracted record. An absent link still yields a record — all
/// fields empty — never a hole in the output row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartRecord {
    pub part: String,
    pub url: String,
    pub description: String,
    pub specs: SpecMap,
}

impl PartRecord {
    /// The all-empty record used when a row has no matching part link.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One flattened guide row: vehicle, engine, and both part records.
#[derive(Debug, Clone, Default)]
pub struct OutputRow {
    pub vehicle: String,
    pub engine: String,
    pub skp: PartRecord,
    pub interchange: PartRecord,
}

impl OutputRow {
    fn fields(&self) -> [String; 10] {
        [
            self.vehicle.clone(),
            self.engine.clone(),
            self.skp.part.clone(),
            self.skp.url.clone(),
            self.skp.description.clone(),
            self.skp.specs.render(),
            self.interchange.part.clone(),
            self.interchange.url.clone(),
            self.interchange.description.clone(),
            self.interchange.specs.render(),
        ]
    }
}

/// Serialize all rows to `path`, header first, preserving row order.
pub fn write_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    write_rows(&mut writer, rows)?;
    writer
        .flush()
        .with_context(|| format!("failed to flush output file {}", path.display()))?;
    Ok(())
}

/// Serialize to any writer. Split out so tests can round-trip in memory.
pub fn write_rows<W: Write>(writer: &mut csv::Writer<W>, rows: &[OutputRow]) -> Result<()> {
    writer
        .write_record(CSV_HEADER)
        .context("failed to write CSV header")?;
    for row in rows {
        writer
            .write_record(row.fields())
            .context("failed to write CSV row")?;
    }
    Ok(())
}

/// What a finished run produced, for the final log line.
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    /// Output rows emitted (equals the resolved row count).
    pub rows: usize,
    /// Part links whose detail extraction succeeded.
    pub parts_resolved: usize,
    /// Part links that failed even after retries (partial records emitted).
    pub parts_failed: usize,
    /// Where the CSV landed.
    pub output_path: PathBuf,
}
