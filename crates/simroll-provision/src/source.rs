//! Tabular row sources.
//!
//! A provisioning batch reads records from one or more sheets of
//! account data. The [`RowSource`] trait hides the physical format;
//! [`CsvRowSource`] is the production implementation, reading one CSV
//! file per sheet with the first row as a header.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::error::{ProvisionError, ProvisionResult};

/// One row of account data, keyed by lower-cased column name.
pub type RowRecord = BTreeMap<String, String>;

/// A source of provisioning rows.
pub trait RowSource {
    /// Read every row from every sheet, in order.
    fn rows(&mut self) -> ProvisionResult<Vec<RowRecord>>;
}

/// Reads rows from CSV files, one file per sheet.
///
/// Headers are lower-cased and trimmed, a UTF-8 BOM on the first
/// header is stripped, and cell whitespace is trimmed. Files are read
/// in the order they were added.
pub struct CsvRowSource {
    paths: Vec<PathBuf>,
}

impl CsvRowSource {
    /// Create a source over the given files.
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    fn read_file(path: &Path) -> ProvisionResult<Vec<RowRecord>> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| {
            ProvisionError::source_failed_with_source(&display, "could not open file", e)
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| {
                ProvisionError::source_failed_with_source(&display, "could not read header row", e)
            })?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| {
                ProvisionError::source_failed_with_source(&display, "malformed row", e)
            })?;
            let row: RowRecord = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl RowSource for CsvRowSource {
    fn rows(&mut self) -> ProvisionResult<Vec<RowRecord>> {
        let mut all = Vec::new();
        for path in &self.paths {
            let rows = Self::read_file(path)?;
            info!(path = %path.display(), rows = rows.len(), "sheet loaded");
            all.extend(rows);
        }
        Ok(all)
    }
}
