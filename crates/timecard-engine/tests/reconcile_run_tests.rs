//! Integration tests for reconciliation runs: dry-run safety, per-row
//! isolation, submissions, cancellation, and status write-back.

mod common;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tempfile::TempDir;

use timecard_core::{EntryId, ItemId, NewLogEntry, Rules, RowOutcome, UpdateFields};
use timecard_engine::{import_run, ImportOptions, RunMode};
use timecard_sheet::CsvStore;

use common::{day, write_csv, Call, ScriptedTracker, V1_HEADER};

fn setup() -> (TempDir, CsvStore) {
    (TempDir::new().unwrap(), CsvStore::new())
}

/// Rules anchored to a fixed date so future-date cases are deterministic
fn options() -> ImportOptions {
    ImportOptions::new(Rules::new(day(2024, 3, 15)))
}

// ===== No-op and dry-run safety =====

#[test]
fn test_unchanged_document_submits_nothing() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,2.5,2.5,2024-03-11,standup,standup,Dana,\n\
             PROJ-1,Fix login,Task,10002,1,1,2024-03-12,,,Dana,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert!(tracker.recorded().is_empty());
    let totals = outcome.report.totals();
    assert_eq!(totals.no_change, 2);
    assert_eq!(outcome.report.attempted(), 0);
    // nothing attempted, so no status copy either
    assert_eq!(outcome.synced_path, None);
}

#[test]
fn test_dry_run_validates_everything_and_touches_nothing() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,standup,standup,Dana,\n\
             PROJ-2,New work,Task,,3,,2024-03-12,did things,,,\n\
             PROJ-9,Future,Task,,2,,2024-04-01,,,,\n"
        ),
    );
    let before = std::fs::read_to_string(&path).unwrap();

    let outcome = import_run(&store, &path, RunMode::DryRun, &options()).unwrap();

    let totals = outcome.report.totals();
    assert_eq!(totals.validated_only, 2);
    assert_eq!(totals.invalid, 1);
    assert_eq!(outcome.synced_path, None);
    // the input is untouched and no other file appeared
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

// ===== Submissions =====

#[test]
fn test_time_edit_updates_only_the_time_field() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,standup,standup,Dana,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert_eq!(
        tracker.writes(),
        vec![Call::Update {
            item: ItemId::new("PROJ-1"),
            entry: EntryId::new("10001"),
            fields: UpdateFields {
                hours: Some(4.0),
                date: None,
                note: None,
            },
        }]
    );
    assert_eq!(outcome.report.rows()[0].outcome, RowOutcome::Applied);

    // live run with an attempt writes the status copy next to the input
    let synced = outcome.synced_path.unwrap();
    assert_eq!(synced, dir.path().join("sheet_synced.csv"));
    let copy = std::fs::read_to_string(synced).unwrap();
    assert!(copy.ends_with(",Dana,Applied\n"));
}

#[test]
fn test_new_row_is_created_and_reports_the_new_id() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-2,New work,Task,,3,,2024-03-12,did things,,,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert_eq!(
        tracker.writes(),
        vec![Call::Create {
            item: ItemId::new("PROJ-2"),
            entry: NewLogEntry {
                hours: 3.0,
                date: day(2024, 3, 12),
                note: Some("did things".to_string()),
            },
        }]
    );
    assert_eq!(
        outcome.report.rows()[0].outcome,
        RowOutcome::Created {
            entry: EntryId::new("90001"),
        }
    );
}

#[test]
fn test_cleared_note_sends_an_empty_string() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,2.5,2.5,2024-03-11,,standup,Dana,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert_eq!(
        tracker.writes(),
        vec![Call::Update {
            item: ItemId::new("PROJ-1"),
            entry: EntryId::new("10001"),
            fields: UpdateFields {
                hours: None,
                date: None,
                note: Some(String::new()),
            },
        }]
    );
}

// ===== Per-row isolation =====

#[test]
fn test_remote_failure_on_one_row_leaves_others_alone() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,,,Dana,\n\
             PROJ-1,Fix login,Task,10002,5,2.5,2024-03-11,,,Dana,\n\
             PROJ-1,Fix login,Task,10003,6,2.5,2024-03-11,,,Dana,\n"
        ),
    );
    let mut tracker = ScriptedTracker::new();
    tracker.fail_updates_for = vec![EntryId::new("10002")];

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    // every row was attempted despite the failure in the middle
    assert_eq!(tracker.writes().len(), 3);
    let rows = outcome.report.rows();
    assert_eq!(rows[0].outcome, RowOutcome::Applied);
    assert!(matches!(rows[1].outcome, RowOutcome::FailedRemote { .. }));
    assert_eq!(rows[2].outcome, RowOutcome::Applied);
    assert!(outcome.report.has_remote_failures());

    let copy = std::fs::read_to_string(outcome.synced_path.unwrap()).unwrap();
    assert!(copy.contains("Failed: transient remote error: scripted update failure"));
}

#[test]
fn test_invalid_changes_never_reach_the_remote() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,25,2.5,2024-03-11,,,Dana,\n\
             PROJ-9,Future,Task,,2,,2024-04-01,,,,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert!(tracker.recorded().is_empty());
    assert_eq!(outcome.report.totals().invalid, 2);
    assert_eq!(outcome.synced_path, None);
}

#[test]
fn test_unparsed_rows_are_reported_and_the_rest_proceed() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,2.5,2.5,11/03/2024,,,Dana,\n\
             PROJ-1,Fix login,Task,10002,4,2.5,2024-03-11,,,Dana,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    let rows = outcome.report.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row, 2);
    assert_eq!(rows[0].outcome, RowOutcome::SkippedUnparsed);
    assert!(rows[0].detail.as_deref().unwrap().contains("Date"));
    assert_eq!(rows[1].row, 3);
    assert_eq!(rows[1].outcome, RowOutcome::Applied);
    assert_eq!(tracker.writes().len(), 1);
}

#[test]
fn test_untouched_template_rows_are_skipped_as_invalid() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-3,Spike,Task,,,,,,,,\n"
        ),
    );
    let tracker = ScriptedTracker::new();

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert!(tracker.recorded().is_empty());
    match &outcome.report.rows()[0].outcome {
        RowOutcome::SkippedInvalid { violations } => assert_eq!(violations.len(), 2),
        other => panic!("expected invalid skip, got {other:?}"),
    }
}

// ===== Cancellation =====

#[test]
fn test_preset_cancellation_attempts_nothing() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,,,Dana,\n\
             PROJ-1,Fix login,Task,10002,5,2.5,2024-03-11,,,Dana,\n"
        ),
    );
    let tracker = ScriptedTracker::new();
    let flag = Arc::new(AtomicBool::new(true));

    let outcome = import_run(
        &store,
        &path,
        RunMode::Apply(&tracker),
        &options().with_cancel(flag),
    )
    .unwrap();

    assert!(tracker.recorded().is_empty());
    assert_eq!(outcome.report.totals().not_attempted, 2);
    assert_eq!(outcome.synced_path, None);
}

#[test]
fn test_mid_run_cancellation_spares_later_rows() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,,,Dana,\n\
             PROJ-1,Fix login,Task,10002,5,2.5,2024-03-11,,,Dana,\n\
             PROJ-1,Fix login,Task,10003,6,2.5,2024-03-11,,,Dana,\n"
        ),
    );
    let flag = Arc::new(AtomicBool::new(false));
    let mut tracker = ScriptedTracker::new();
    tracker.cancel_after_write = Some(flag.clone());

    let outcome = import_run(
        &store,
        &path,
        RunMode::Apply(&tracker),
        &options().with_cancel(flag),
    )
    .unwrap();

    // the first submission lands, the flag it raised stops the rest
    assert_eq!(tracker.writes().len(), 1);
    let rows = outcome.report.rows();
    assert_eq!(rows[0].outcome, RowOutcome::Applied);
    assert_eq!(rows[1].outcome, RowOutcome::SkippedNotAttempted);
    assert_eq!(rows[2].outcome, RowOutcome::SkippedNotAttempted);
    // one attempt happened, so the status copy still gets written
    let copy = std::fs::read_to_string(outcome.synced_path.unwrap()).unwrap();
    assert!(copy.contains("Skipped: not attempted"));
}

// ===== Run-level failures and status copy =====

#[test]
fn test_missing_required_column_aborts_the_run() {
    let (dir, store) = setup();
    let path = write_csv(&dir, "sheet.csv", "ItemID,TimeSpent\nPROJ-1,2\n");

    let err = import_run(
        &store,
        &path,
        RunMode::Apply(&ScriptedTracker::new()),
        &options(),
    )
    .unwrap_err();

    assert!(err.is_malformed_document());
}

#[test]
fn test_failed_only_run_still_writes_the_status_copy() {
    let (dir, store) = setup();
    let path = write_csv(
        &dir,
        "sheet.csv",
        &format!(
            "{V1_HEADER}\n\
             PROJ-1,Fix login,Task,10001,4,2.5,2024-03-11,,,Dana,\n"
        ),
    );
    let mut tracker = ScriptedTracker::new();
    tracker.fail_updates_for = vec![EntryId::new("10001")];

    let outcome = import_run(&store, &path, RunMode::Apply(&tracker), &options()).unwrap();

    assert_eq!(outcome.report.totals().failed, 1);
    assert!(outcome.synced_path.is_some());
}
