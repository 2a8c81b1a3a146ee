//! Error handling for timecard-sheet
//!
//! Distinguishes document-level failures, which abort a run, from row-level
//! parse failures, which only skip the offending row.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using SheetError
pub type Result<T> = std::result::Result<T, SheetError>;

/// Document-level failure; aborts the run that hit it
#[derive(Debug, Error)]
pub enum SheetError {
    /// The document is structurally unusable (e.g. required columns missing)
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// Filesystem failure while reading or writing a document
    #[error("{operation} failed for {path}: {source}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV-level failure while reading or writing a document
    #[error("csv error for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Create a malformed document error
pub fn malformed_document(reason: impl Into<String>) -> SheetError {
    SheetError::MalformedDocument {
        reason: reason.into(),
    }
}

/// Create an IO error tagged with the failing operation
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> SheetError {
    SheetError::Io {
        operation: operation.to_string(),
        path: path.to_path_buf(),
        source: err,
    }
}

/// Create a CSV error tagged with the document path
pub fn csv_error(path: &Path, err: csv::Error) -> SheetError {
    SheetError::Csv {
        path: path.to_path_buf(),
        source: err,
    }
}

/// A single-row parse failure.
///
/// Never aborts a run; the row is reported as unparsed and the rest of the
/// document proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}, column {column}: {message}")]
pub struct RowError {
    /// Source row number (1-based, counting the header row)
    pub row: usize,
    /// Header name of the offending column
    pub column: &'static str,
    /// What was wrong with the cell
    pub message: String,
}

impl RowError {
    /// Create a row error for the given row and column
    pub fn new(row: usize, column: &'static str, message: impl Into<String>) -> Self {
        Self {
            row,
            column,
            message: message.into(),
        }
    }
}
