//! Status write-back
//!
//! After a live run the engine writes a copy of the document with the
//! Status column filled from the report, next to the input as
//! `<stem>_synced.<ext>`. The input file itself is never touched.

use std::path::{Path, PathBuf};

use timecard_core::{ReconciliationReport, ReportRow, RowOutcome};

use crate::layout::STATUS;
use crate::table::TableDocument;

/// Render the status cell text for one report row
pub fn status_text(row: &ReportRow) -> String {
    match &row.outcome {
        RowOutcome::Applied => "Applied".to_string(),
        RowOutcome::Created { entry } => format!("Applied: created {entry}"),
        RowOutcome::ValidatedOnly => "Pending".to_string(),
        RowOutcome::SkippedNoChange => "Skipped: no change".to_string(),
        RowOutcome::SkippedInvalid { violations } => {
            let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
            format!("Skipped: {}", reasons.join("; "))
        }
        RowOutcome::SkippedUnparsed => match &row.detail {
            Some(detail) => format!("Skipped: {detail}"),
            None => "Skipped: unparsed".to_string(),
        },
        RowOutcome::SkippedNotAttempted => "Skipped: not attempted".to_string(),
        RowOutcome::FailedRemote { error } => format!("Failed: {error}"),
    }
}

/// Produce a copy of the document with the Status column filled from the
/// report.
///
/// Documents without a Status column (legacy layout) get one appended;
/// short rows are padded so every row reaches it. Rows the report does not
/// mention keep their existing status cell.
pub fn apply_statuses(document: &TableDocument, report: &ReconciliationReport) -> TableDocument {
    let mut out = document.clone();
    let status_col = match out.column_index(STATUS) {
        Some(col) => col,
        None => {
            out.headers.push(STATUS.to_string());
            out.headers.len() - 1
        }
    };
    for row in &mut out.rows {
        if row.len() <= status_col {
            row.resize(status_col + 1, String::new());
        }
    }

    for line in report.rows() {
        // row numbers count the header, data rows start at 2
        let Some(index) = line.row.checked_sub(2) else {
            continue;
        };
        if let Some(row) = out.rows.get_mut(index) {
            row[status_col] = status_text(line);
        }
    }
    out
}

/// Path of the status copy written after a live run: `<stem>_synced.<ext>`
pub fn synced_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_synced.{ext}"),
        None => format!("{stem}_synced"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use timecard_core::{EntryId, ItemId, RemoteError, Violation};

    fn report_row(row: usize, outcome: RowOutcome) -> ReportRow {
        ReportRow {
            row,
            item: Some(ItemId::new("PROJ-1")),
            entry: None,
            outcome,
            detail: None,
        }
    }

    #[test]
    fn test_status_text_per_outcome() {
        assert_eq!(status_text(&report_row(2, RowOutcome::Applied)), "Applied");
        assert_eq!(
            status_text(&report_row(
                2,
                RowOutcome::Created {
                    entry: EntryId::new("10099"),
                },
            )),
            "Applied: created 10099"
        );
        assert_eq!(
            status_text(&report_row(2, RowOutcome::SkippedNoChange)),
            "Skipped: no change"
        );
        assert_eq!(
            status_text(&report_row(
                2,
                RowOutcome::SkippedInvalid {
                    violations: vec![Violation::MissingDate],
                },
            )),
            "Skipped: date is required"
        );
        assert_eq!(
            status_text(&report_row(
                2,
                RowOutcome::FailedRemote {
                    error: RemoteError::Transient {
                        message: "503".to_string(),
                    },
                },
            )),
            "Failed: transient remote error: 503"
        );
    }

    #[test]
    fn test_unparsed_rows_carry_their_detail() {
        let mut row = report_row(4, RowOutcome::SkippedUnparsed);
        row.detail = Some("row 4, column Date: invalid date".to_string());
        assert_eq!(
            status_text(&row),
            "Skipped: row 4, column Date: invalid date"
        );
    }

    #[test]
    fn test_apply_statuses_targets_report_rows() {
        let mut doc = TableDocument::new(vec!["ItemID".to_string(), STATUS.to_string()]);
        doc.push_row(vec!["PROJ-1".to_string(), String::new()]);
        doc.push_row(vec!["PROJ-2".to_string(), String::new()]);

        let mut report = ReconciliationReport::new();
        report.push(report_row(3, RowOutcome::Applied));

        let out = apply_statuses(&doc, &report);
        assert_eq!(out.cell(0, 1), Some(""));
        assert_eq!(out.cell(1, 1), Some("Applied"));
        // input document is untouched
        assert_eq!(doc.cell(1, 1), Some(""));
    }

    #[test]
    fn test_missing_status_column_is_appended_and_rows_padded() {
        let mut doc = TableDocument::new(vec!["ItemID".to_string()]);
        doc.push_row(vec!["PROJ-1".to_string()]);

        let mut report = ReconciliationReport::new();
        report.push(report_row(2, RowOutcome::SkippedNoChange));

        let out = apply_statuses(&doc, &report);
        assert_eq!(out.headers.last().map(String::as_str), Some(STATUS));
        assert_eq!(out.cell(0, 1), Some("Skipped: no change"));
    }

    #[test]
    fn test_synced_path_keeps_extension() {
        assert_eq!(
            synced_path(Path::new("/tmp/march.csv")),
            PathBuf::from("/tmp/march_synced.csv")
        );
        assert_eq!(
            synced_path(Path::new("timesheet")),
            PathBuf::from("timesheet_synced")
        );
    }
}
