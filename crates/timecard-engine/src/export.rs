//! Export run
//!
//! Fetches items and their log entries from the tracker, applies the
//! requested filters, and writes a v1 snapshot document for editing.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use timecard_core::{ItemEntries, LogEntry, Tracker};
use timecard_sheet::{snapshot_document, TableStore};

use crate::errors::Result;

/// Calendar month to restrict an export to, relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthWindow {
    /// The month today falls in
    Current,
    /// The month before that
    Previous,
}

/// Filters and context for one export run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Keep only entries dated inside this month, when set
    pub month: Option<MonthWindow>,
    /// Keep only entries by this author display name, when set
    pub author: Option<String>,
    /// Drop items left with no entries instead of writing template rows
    pub entries_only: bool,
    /// Reference date for month windows
    pub today: NaiveDate,
}

impl ExportOptions {
    /// No filters; items without entries export as template rows
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: None,
            author: None,
            entries_only: false,
            today,
        }
    }
}

/// What an export run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Items written to the snapshot
    pub items: usize,
    /// Log entries written
    pub entries: usize,
    /// Items written as empty template rows
    pub template_rows: usize,
    /// Sum of hours across written entries
    pub total_hours: f64,
}

/// Run an export: search, fetch entries, filter, write the snapshot.
///
/// # Errors
///
/// Fails when the search or any entry fetch fails, or when the snapshot
/// cannot be written. Export has no per-row degraded mode; the snapshot is
/// either complete or absent.
pub fn export_run(
    tracker: &dyn Tracker,
    store: &dyn TableStore,
    query: &str,
    out: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    info!(query, path = %out.display(), "export run started");

    let items = tracker.list_items(query)?;
    debug!(items = items.len(), "search finished");

    let mut groups = Vec::new();
    for item in items {
        let entries: Vec<LogEntry> = tracker
            .list_log_entries(&item.id)?
            .into_iter()
            .filter(|entry| keep_entry(entry, options))
            .collect();
        if entries.is_empty() && options.entries_only {
            debug!(item = %item.id, "dropped item with no matching entries");
            continue;
        }
        groups.push(ItemEntries::new(item, entries));
    }

    let document = snapshot_document(&groups);
    store.write_table(out, &document)?;

    let summary = summarize(&groups);
    info!(
        items = summary.items,
        entries = summary.entries,
        templates = summary.template_rows,
        "export run finished"
    );
    Ok(summary)
}

fn summarize(groups: &[ItemEntries]) -> ExportSummary {
    ExportSummary {
        items: groups.len(),
        entries: groups.iter().map(|g| g.entries.len()).sum(),
        template_rows: groups.iter().filter(|g| g.is_template()).count(),
        total_hours: groups.iter().map(ItemEntries::total_hours).sum(),
    }
}

fn keep_entry(entry: &LogEntry, options: &ExportOptions) -> bool {
    if let Some(window) = options.month {
        let (start, end) = month_bounds(options.today, window);
        match entry.date.current() {
            Some(date) if *date >= start && *date < end => {}
            _ => return false,
        }
    }
    if let Some(author) = &options.author {
        if entry.author.as_deref() != Some(author.as_str()) {
            return false;
        }
    }
    true
}

/// Half-open `[start, end)` bounds of the requested month
fn month_bounds(today: NaiveDate, window: MonthWindow) -> (NaiveDate, NaiveDate) {
    let this_month = month_start(today);
    match window {
        MonthWindow::Current => (this_month, next_month_start(this_month)),
        MonthWindow::Previous => (previous_month_start(this_month), this_month),
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
