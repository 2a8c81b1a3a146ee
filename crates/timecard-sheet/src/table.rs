//! In-memory tabular document and the storage seam
//!
//! The engine works on a [`TableDocument`] of plain string cells and never
//! names a file format. [`TableStore`] is the only interface to disk; the
//! CSV store implements it today and a different format can slot in behind
//! the same trait.

use std::path::Path;

use crate::errors::Result;

/// A rectangular document: one header row plus zero or more data rows.
///
/// Cells are untyped strings; typing happens at import. Data row `i` holds
/// the document row numbered `i + 2` (row 1 is the header).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDocument {
    /// Column headers, in document order
    pub headers: Vec<String>,
    /// Data rows; each row holds one cell per header (short rows read as
    /// empty cells)
    pub rows: Vec<Vec<String>>,
}

impl TableDocument {
    /// Create an empty document with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Position of a header by exact name
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at data row `row` and column `col`; `None` when the row is
    /// shorter than the column index
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Document row number of data row `index` (1-based, counting the
    /// header row)
    pub fn row_number(index: usize) -> usize {
        index + 2
    }
}

/// Cell-level document I/O.
///
/// Reading yields headers plus rows of string cells; writing persists them
/// deterministically. Implementations decide the on-disk format.
pub trait TableStore {
    /// Read a document from the given path
    fn read_table(&self, path: &Path) -> Result<TableDocument>;

    /// Write a document to the given path, replacing any existing file
    fn write_table(&self, path: &Path, document: &TableDocument) -> Result<()>;
}
