//! Reconciliation run
//!
//! Pipeline over one edited document:
//!
//! 1. Read the document through the table store
//! 2. Parse rows into typed entries (row errors isolate, not abort)
//! 3. Diff each entry against its frozen originals
//! 4. Validate the changed rows
//! 5. Submit valid changes one at a time, or stop at validation on dry runs
//! 6. Report every row; after live submissions, write the status copy
//!
//! Rows never affect each other: a parse error, a validation failure, or a
//! rejected submission on one row leaves every other row's fate unchanged.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use timecard_core::{
    diff_entry, ChangeKind, ChangeRecord, FieldDelta, NewLogEntry, ReconciliationReport,
    RemoteError, ReportRow, RowOutcome, Rules, Tracker, UpdateFields,
};
use timecard_sheet::{apply_statuses, parse_document, synced_path, TableStore};

use crate::errors::Result;

/// Whether a run submits changes or stops at validation
pub enum RunMode<'a> {
    /// Parse, diff, and validate only; nothing is sent and no file is
    /// written. No remote client is involved at all.
    DryRun,
    /// Submit valid changes through the given tracker
    Apply(&'a dyn Tracker),
}

impl RunMode<'_> {
    /// True when the run stops at validation
    pub fn is_dry_run(&self) -> bool {
        matches!(self, RunMode::DryRun)
    }
}

/// Knobs for one reconciliation run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Validation bounds for changed rows
    pub rules: Rules,
    /// Cooperative cancellation flag, checked before each submission
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ImportOptions {
    /// Run with the given rules and no cancellation flag
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            cancel: None,
        }
    }

    /// Attach a cancellation flag
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// What a reconciliation run produced
#[derive(Debug)]
pub struct ImportOutcome {
    /// One row per document data row
    pub report: ReconciliationReport,
    /// Where the status copy was written, after live runs with at least
    /// one submission attempt
    pub synced_path: Option<PathBuf>,
}

/// Run a reconciliation over an edited document.
///
/// Dry runs have no side effects: no submission happens and no file is
/// touched. Live runs submit valid changes sequentially, in document order,
/// and afterwards write a `<stem>_synced.<ext>` copy with the Status column
/// filled in. The input document itself is never modified.
///
/// # Errors
///
/// Fails only on run-level problems: an unreadable or malformed document,
/// or a failure writing the status copy. Per-row failures are reported,
/// not returned.
pub fn import_run(
    store: &dyn TableStore,
    path: &Path,
    mode: RunMode<'_>,
    options: &ImportOptions,
) -> Result<ImportOutcome> {
    info!(
        path = %path.display(),
        dry_run = mode.is_dry_run(),
        "reconciliation run started"
    );

    let document = store.read_table(path)?;
    let parsed = parse_document(&document)?;

    let mut report = ReconciliationReport::new();
    for error in &parsed.errors {
        warn!(row = error.row, error = %error, "row skipped as unparsed");
        report.push(ReportRow {
            row: error.row,
            item: None,
            entry: None,
            outcome: RowOutcome::SkippedUnparsed,
            detail: Some(error.to_string()),
        });
    }

    let mut cancelled = false;
    for row in &parsed.rows {
        let entry = &row.entry;
        let outcome = match diff_entry(entry) {
            None => RowOutcome::SkippedNoChange,
            Some(kind) => {
                let record = ChangeRecord {
                    row: row.row,
                    entry: entry.clone(),
                    kind,
                };
                let violations = options.rules.validate(&record);
                if !violations.is_empty() {
                    debug!(row = record.row, violations = violations.len(), "row invalid");
                    RowOutcome::SkippedInvalid { violations }
                } else {
                    match &mode {
                        RunMode::DryRun => RowOutcome::ValidatedOnly,
                        RunMode::Apply(tracker) => {
                            if !cancelled && cancel_requested(options) {
                                info!(row = record.row, "cancellation observed");
                                cancelled = true;
                            }
                            if cancelled {
                                RowOutcome::SkippedNotAttempted
                            } else {
                                match submit(*tracker, &record) {
                                    Ok(outcome) => outcome,
                                    Err(error) => {
                                        warn!(row = record.row, error = %error, "submission failed");
                                        RowOutcome::FailedRemote { error }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };
        debug!(row = row.row, outcome = ?outcome, "row reconciled");
        report.push(ReportRow {
            row: row.row,
            item: Some(entry.item.clone()),
            entry: entry.id.clone(),
            outcome,
            detail: None,
        });
    }
    report.sort_by_row();

    let totals = report.totals();
    info!(
        applied = totals.applied,
        created = totals.created,
        no_change = totals.no_change,
        invalid = totals.invalid,
        unparsed = totals.unparsed,
        failed = totals.failed,
        "reconciliation run finished"
    );

    let synced = if !mode.is_dry_run() && report.attempted() > 0 {
        let out = synced_path(path);
        store.write_table(&out, &apply_statuses(&document, &report))?;
        info!(path = %out.display(), "status copy written");
        Some(out)
    } else {
        None
    };

    Ok(ImportOutcome {
        report,
        synced_path: synced,
    })
}

fn cancel_requested(options: &ImportOptions) -> bool {
    options
        .cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn submit(tracker: &dyn Tracker, record: &ChangeRecord) -> std::result::Result<RowOutcome, RemoteError> {
    match &record.kind {
        ChangeKind::Create => {
            // validation rejects creates without a date before this point
            let Some(date) = *record.entry.date.current() else {
                return Err(RemoteError::ValidationRejected {
                    message: "cannot create an entry without a date".to_string(),
                });
            };
            let new = NewLogEntry {
                hours: *record.entry.time_spent.current(),
                date,
                note: record.entry.note.current().clone(),
            };
            let id = tracker.create_log_entry(&record.entry.item, &new)?;
            Ok(RowOutcome::Created { entry: id })
        }
        ChangeKind::Update(deltas) => {
            // the diff only emits updates for rows that carried an entry id
            let Some(entry_id) = record.entry.id.clone() else {
                return Err(RemoteError::ValidationRejected {
                    message: "cannot update an entry without an identifier".to_string(),
                });
            };
            let fields = update_fields(deltas);
            tracker.update_log_entry(&record.entry.item, &entry_id, &fields)?;
            Ok(RowOutcome::Applied)
        }
    }
}

/// Collapse field deltas into the sparse update payload; untouched fields
/// stay `None` and are never sent
fn update_fields(deltas: &[FieldDelta]) -> UpdateFields {
    let mut fields = UpdateFields::default();
    for delta in deltas {
        match delta {
            FieldDelta::TimeSpent { to, .. } => fields.hours = Some(*to),
            FieldDelta::Date { to, .. } => fields.date = *to,
            FieldDelta::Note { to, .. } => {
                // a cleared note sends an empty string to erase it remotely
                fields.note = Some(to.clone().unwrap_or_default());
            }
        }
    }
    fields
}
