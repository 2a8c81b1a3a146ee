//! Export command
//!
//! Usage: timecard export --out <FILE> (--query <TEXT> | --saved <ID>)

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, ValueEnum};

use timecard_engine::{export_run, ExportOptions, MonthWindow};
use timecard_remote::{HttpTracker, Settings};
use timecard_sheet::CsvStore;

use super::EXIT_OK;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output document path
    #[arg(long)]
    pub out: PathBuf,

    /// Search query text
    #[arg(long, conflicts_with = "saved")]
    pub query: Option<String>,

    /// Saved query id (see `timecard queries`)
    #[arg(long, conflicts_with = "query")]
    pub saved: Option<String>,

    /// Keep only entries dated inside this calendar month
    #[arg(long, value_enum)]
    pub month: Option<MonthArg>,

    /// Keep only entries authored by the authenticated account
    #[arg(long)]
    pub mine: bool,

    /// Drop items with no matching entries instead of template rows
    #[arg(long)]
    pub entries_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MonthArg {
    /// The month today falls in
    Current,
    /// The month before that
    Previous,
}

/// Execute export command
pub fn execute(args: ExportArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.query.is_none() && args.saved.is_none() {
        return Err("must specify either --query or --saved".into());
    }

    let settings = Settings::from_env()?;
    let tracker = HttpTracker::new(&settings)?;

    let query = match (&args.query, &args.saved) {
        (Some(text), _) => text.clone(),
        (None, Some(id)) => {
            let saved = tracker.saved_queries()?;
            saved
                .iter()
                .find(|q| q.id == *id)
                .map(|q| q.query.clone())
                .ok_or_else(|| format!("saved query {} not found", id))?
        }
        (None, None) => unreachable!(),
    };

    let mut options = ExportOptions::new(Local::now().date_naive());
    options.month = args.month.map(|m| match m {
        MonthArg::Current => MonthWindow::Current,
        MonthArg::Previous => MonthWindow::Previous,
    });
    if args.mine {
        options.author = Some(tracker.current_user()?.display_name);
    }
    options.entries_only = args.entries_only;

    let store = CsvStore::new();
    let summary = export_run(&tracker, &store, &query, &args.out, &options)?;

    println!("Snapshot written to {}", args.out.display());
    println!("  items: {}", summary.items);
    println!("  entries: {}", summary.entries);
    println!("  template rows: {}", summary.template_rows);
    println!("  total hours: {}", summary.total_hours);

    Ok(EXIT_OK)
}
