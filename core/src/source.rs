//! Raw tabular input and the sources that produce it.
//!
//! RULE: Fetching is the only step that touches I/O. A TicketSource hands
//! the pipeline an in-memory RawTable; everything after that is pure.

use crate::error::{SlaError, SlaResult};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::PathBuf};

/// Header row plus string cells. Rows may be shorter than the header; the
/// missing trailing cells read as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows:    Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Strip surrounding whitespace from every column name.
    pub fn trim_headers(&mut self) {
        for header in &mut self.headers {
            let trimmed = header.trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (row, column); empty cells and missing-value markers read
    /// as `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|s| !is_missing_marker(s))
    }
}

/// Spreadsheet exports spell "no value" in several ways. Matched exactly,
/// case included.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_marker(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Parse CSV text with a header row.
pub fn read_csv<R: Read>(reader: R) -> SlaResult<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Anything that can produce the raw ticket table for one refresh.
pub trait TicketSource {
    /// Human-readable name used in logs and error messages.
    fn name(&self) -> String;

    fn fetch(&self) -> SlaResult<RawTable>;
}

/// A CSV file on disk.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TicketSource for CsvFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> SlaResult<RawTable> {
        let file = File::open(&self.path).map_err(|e| SlaError::Fetch {
            source_name: self.name(),
            message: e.to_string(),
        })?;
        let table = read_csv(file)?;
        log::debug!("read {} rows from {}", table.len(), self.name());
        Ok(table)
    }
}

/// A table already in memory. Used by tests and by callers that fetch on
/// their own.
pub struct StaticSource {
    label: String,
    table: RawTable,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, table: RawTable) -> Self {
        Self { label: label.into(), table }
    }
}

impl TicketSource for StaticSource {
    fn name(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self) -> SlaResult<RawTable> {
        Ok(self.table.clone())
    }
}
