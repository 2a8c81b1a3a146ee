//! Timecard Engine - Export and reconciliation runs
//!
//! Orchestrates the core pipeline over the sheet and tracker seams:
//! - `export_run`: search the tracker and write an editable snapshot
//! - `import_run`: diff an edited snapshot, validate, submit, and report
//!
//! The engine depends on the `Tracker` trait, never on the HTTP client;
//! dry runs work with no remote configured at all.

pub mod errors;
pub mod export;
pub mod reconcile;

// Re-export commonly used types
pub use errors::{EngineError, Result};
pub use export::{export_run, ExportOptions, ExportSummary, MonthWindow};
pub use reconcile::{import_run, ImportOptions, ImportOutcome, RunMode};
