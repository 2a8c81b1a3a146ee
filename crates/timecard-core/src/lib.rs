//! Timecard Core - Record model, diff engine, and validation rules
//!
//! This crate provides the foundational pieces of the reconciliation
//! engine, including:
//! - Log entry and tracked item models with original/current field pairs
//! - A pure diff engine that turns edited snapshots into change-sets
//! - Validation rules applied before any submission
//! - The `Tracker` trait the remote client and test fakes implement
//! - The per-row reconciliation report
//!
//! No I/O happens in this crate; documents and HTTP live in the sheet and
//! remote crates.

pub mod diff;
pub mod ids;
pub mod logging;
pub mod model;
pub mod report;
pub mod rules;
pub mod tracker;

// Re-export commonly used types
pub use diff::{build_change_set, diff_entry, ChangeKind, ChangeRecord, ChangeSet, FieldDelta};
pub use ids::{EntryId, ItemId};
pub use model::{EditablePair, ItemEntries, LogEntry, TrackedItem};
pub use report::{ReconciliationReport, ReportRow, ReportTotals, RowOutcome};
pub use rules::{Rules, Violation};
pub use tracker::{NewLogEntry, RemoteError, Tracker, UpdateFields};
