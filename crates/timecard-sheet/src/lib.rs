//! Timecard Sheet - Snapshot documents on disk
//!
//! This crate owns everything about the editable document format:
//! - The in-memory `TableDocument` and the `TableStore` I/O seam
//! - The CSV store that implements it
//! - The v1 column layout, located by header name
//! - Export (entries to cells) and import (cells back to typed entries)
//! - Status write-back after live runs
//!
//! The reconciliation engine consumes this crate through `TableStore`,
//! `snapshot_document`, and `parse_document`; it never sees CSV.

pub mod csv_store;
pub mod errors;
pub mod export;
pub mod import;
pub mod layout;
pub mod status;
pub mod table;

// Re-export commonly used types
pub use csv_store::CsvStore;
pub use errors::{RowError, SheetError};
pub use export::snapshot_document;
pub use import::{parse_document, ParsedDocument, ParsedRow};
pub use layout::Layout;
pub use status::{apply_statuses, status_text, synced_path};
pub use table::{TableDocument, TableStore};
