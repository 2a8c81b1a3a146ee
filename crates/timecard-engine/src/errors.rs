//! Error handling for timecard-engine
//!
//! Run-level failures only. Per-row problems never surface here; they live
//! in the reconciliation report.

use thiserror::Error;

use timecard_core::RemoteError;
use timecard_sheet::SheetError;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// A failure that aborts a whole run
#[derive(Debug, Error)]
pub enum EngineError {
    /// Document could not be read, written, or understood
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// A run-level remote call failed (fetching items for export)
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl EngineError {
    /// True for structurally unusable documents, which callers report with
    /// a dedicated exit status
    pub fn is_malformed_document(&self) -> bool {
        matches!(
            self,
            EngineError::Sheet(SheetError::MalformedDocument { .. })
        )
    }
}
