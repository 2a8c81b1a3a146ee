//! CSV-backed table store

use std::path::Path;

use tracing::debug;

use crate::errors::{csv_error, io_error, Result};
use crate::table::{TableDocument, TableStore};

/// Reads and writes table documents as CSV files with a header row
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvStore;

impl CsvStore {
    /// Create a CSV store
    pub fn new() -> Self {
        Self
    }
}

impl TableStore for CsvStore {
    fn read_table(&self, path: &Path) -> Result<TableDocument> {
        // flexible: users delete trailing cells in editors; short rows read
        // back as empty cells rather than hard errors
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| csv_error(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut document = TableDocument::new(headers);
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            document.push_row(record.iter().map(str::to_string).collect());
        }

        debug!(
            path = %path.display(),
            rows = document.row_count(),
            "read table document"
        );
        Ok(document)
    }

    fn write_table(&self, path: &Path, document: &TableDocument) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;

        writer
            .write_record(&document.headers)
            .map_err(|e| csv_error(path, e))?;
        for row in &document.rows {
            writer.write_record(row).map_err(|e| csv_error(path, e))?;
        }
        writer.flush().map_err(|e| io_error("flush", path, e))?;

        debug!(
            path = %path.display(),
            rows = document.row_count(),
            "wrote table document"
        );
        Ok(())
    }
}
