//! Per-row reconciliation report
//!
//! Every data row of an imported document ends up with exactly one outcome
//! here, whether it was applied, skipped, or failed. The report is the
//! engine's only answer to "what happened to my edits".

use crate::ids::{EntryId, ItemId};
use crate::rules::Violation;
use crate::tracker::RemoteError;

/// Final outcome for one document row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Update submitted and accepted
    Applied,
    /// Create submitted and accepted; carries the new entry id
    Created { entry: EntryId },
    /// Valid change, but the run was a dry run and nothing was sent
    ValidatedOnly,
    /// Row parsed cleanly and nothing changed
    SkippedNoChange,
    /// Change failed validation and was not sent
    SkippedInvalid { violations: Vec<Violation> },
    /// Row could not be parsed; see the row detail
    SkippedUnparsed,
    /// Run was cancelled before this row was attempted
    SkippedNotAttempted,
    /// Submission reached the remote and failed
    FailedRemote { error: RemoteError },
}

/// One report line, tied back to its source row
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Source row number (1-based, counting the header row)
    pub row: usize,
    /// Item the row belongs to, when the cell held one
    pub item: Option<ItemId>,
    /// Entry id, for rows that had one
    pub entry: Option<EntryId>,
    /// What happened to the row
    pub outcome: RowOutcome,
    /// Free-text detail, e.g. the parse error for unparsed rows
    pub detail: Option<String>,
}

/// Aggregate counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    pub applied: usize,
    pub created: usize,
    pub validated_only: usize,
    pub no_change: usize,
    pub invalid: usize,
    pub unparsed: usize,
    pub not_attempted: usize,
    pub failed: usize,
}

/// Outcome of a whole reconciliation run, one row per document row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationReport {
    rows: Vec<ReportRow>,
}

impl ReconciliationReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row outcome
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// All rows, in the order they currently hold
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Restore source-document order after parse errors and outcomes were
    /// collected separately
    pub fn sort_by_row(&mut self) {
        self.rows.sort_by_key(|row| row.row);
    }

    /// Count rows per outcome
    pub fn totals(&self) -> ReportTotals {
        let mut totals = ReportTotals::default();
        for row in &self.rows {
            match &row.outcome {
                RowOutcome::Applied => totals.applied += 1,
                RowOutcome::Created { .. } => totals.created += 1,
                RowOutcome::ValidatedOnly => totals.validated_only += 1,
                RowOutcome::SkippedNoChange => totals.no_change += 1,
                RowOutcome::SkippedInvalid { .. } => totals.invalid += 1,
                RowOutcome::SkippedUnparsed => totals.unparsed += 1,
                RowOutcome::SkippedNotAttempted => totals.not_attempted += 1,
                RowOutcome::FailedRemote { .. } => totals.failed += 1,
            }
        }
        totals
    }

    /// True when at least one submission reached the remote and failed
    pub fn has_remote_failures(&self) -> bool {
        self.rows
            .iter()
            .any(|row| matches!(row.outcome, RowOutcome::FailedRemote { .. }))
    }

    /// Number of rows that were actually sent to the remote, successfully
    /// or not
    pub fn attempted(&self) -> usize {
        let totals = self.totals();
        totals.applied + totals.created + totals.failed
    }
}
