//! Import (reconcile) command
//!
//! Usage: timecard import <FILE> [--dry-run] [--yes]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::Args;

use timecard_core::{ReconciliationReport, Rules};
use timecard_engine::{import_run, ImportOptions, ImportOutcome, RunMode};
use timecard_remote::{HttpTracker, Settings};
use timecard_sheet::{status_text, CsvStore};

use super::{EXIT_MALFORMED, EXIT_OK, EXIT_REMOTE_FAILURE};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Edited snapshot document to reconcile
    pub file: PathBuf,

    /// Parse, diff, and validate only; submit nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Upper bound for hours on a single entry
    #[arg(long, default_value_t = timecard_core::rules::DEFAULT_MAX_HOURS)]
    pub max_hours: f64,

    /// Upper bound for note length, in characters
    #[arg(long, default_value_t = timecard_core::rules::DEFAULT_MAX_NOTE_LEN)]
    pub max_note_len: usize,
}

/// Execute import command
pub fn execute(args: ImportArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let store = CsvStore::new();
    let options = ImportOptions::new(rules(&args));

    // The first pass never talks to the remote; it catches malformed
    // documents and counts submittable changes before any prompt.
    let preview = match import_run(&store, &args.file, RunMode::DryRun, &options) {
        Ok(outcome) => outcome,
        Err(e) if e.is_malformed_document() => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_MALFORMED);
        }
        Err(e) => return Err(e.into()),
    };
    let pending = preview.report.totals().validated_only;

    if args.dry_run {
        print_report(&preview.report);
        println!("Dry run; nothing was submitted.");
        return Ok(EXIT_OK);
    }
    if pending == 0 {
        print_report(&preview.report);
        println!("No changes to submit.");
        return Ok(EXIT_OK);
    }
    if !args.yes && !confirm(pending)? {
        println!("Aborted; nothing was submitted.");
        return Ok(EXIT_OK);
    }

    // Credentials are only needed once there is something to submit
    let settings = Settings::from_env()?;
    let tracker = HttpTracker::new(&settings)?;
    let outcome: ImportOutcome =
        match import_run(&store, &args.file, RunMode::Apply(&tracker), &options) {
            Ok(outcome) => outcome,
            Err(e) if e.is_malformed_document() => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_MALFORMED);
            }
            Err(e) => return Err(e.into()),
        };

    print_report(&outcome.report);
    if let Some(path) = &outcome.synced_path {
        println!("Status copy written to {}", path.display());
    }
    if outcome.report.has_remote_failures() {
        return Ok(EXIT_REMOTE_FAILURE);
    }
    Ok(EXIT_OK)
}

fn rules(args: &ImportArgs) -> Rules {
    let mut rules = Rules::new(Local::now().date_naive());
    rules.max_hours_per_entry = args.max_hours;
    rules.max_note_len = args.max_note_len;
    rules
}

fn confirm(pending: usize) -> Result<bool, Box<dyn std::error::Error>> {
    print!("Submit {} change(s) to the tracker? [y/N] ", pending);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn print_report(report: &ReconciliationReport) {
    for row in report.rows() {
        let item = row
            .item
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!("  row {:>4}  {:<12}  {}", row.row, item, status_text(row));
    }
    let totals = report.totals();
    println!(
        "{} applied, {} created, {} pending, {} unchanged, {} invalid, {} unparsed, {} not attempted, {} failed",
        totals.applied,
        totals.created,
        totals.validated_only,
        totals.no_change,
        totals.invalid,
        totals.unparsed,
        totals.not_attempted,
        totals.failed
    );
}
