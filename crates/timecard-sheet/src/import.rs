//! Snapshot import
//!
//! Re-reads an edited document into typed log entries, reconstructing
//! original/current pairs from the shadow columns. One bad row never aborts
//! the batch; it becomes a `RowError` and parsing moves on. Only a missing
//! required column kills the whole run.

use chrono::NaiveDate;
use tracing::debug;

use timecard_core::{EditablePair, EntryId, ItemId, LogEntry};

use crate::errors::{Result, RowError};
use crate::layout::{Layout, DATE, ITEM_ID, TIME_SPENT, TIME_SPENT_ORIGINAL};
use crate::table::TableDocument;

/// One successfully parsed data row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Source row number (1-based, counting the header row)
    pub row: usize,
    /// The typed entry the row held
    pub entry: LogEntry,
}

/// Everything import produced from one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Rows that parsed cleanly, in document order
    pub rows: Vec<ParsedRow>,
    /// Rows that did not, with the reason
    pub errors: Vec<RowError>,
}

/// Parse an edited snapshot document into typed rows.
///
/// # Errors
///
/// Returns `MalformedDocument` when a required column is missing. Row-level
/// problems are collected in the result instead.
pub fn parse_document(document: &TableDocument) -> Result<ParsedDocument> {
    let layout = Layout::detect(document)?;

    let mut parsed = ParsedDocument::default();
    for index in 0..document.row_count() {
        match parse_row(document, &layout, index) {
            Ok(row) => parsed.rows.push(row),
            Err(err) => parsed.errors.push(err),
        }
    }

    debug!(
        rows = parsed.rows.len(),
        errors = parsed.errors.len(),
        "parsed snapshot document"
    );
    Ok(parsed)
}

fn parse_row(
    document: &TableDocument,
    layout: &Layout,
    index: usize,
) -> std::result::Result<ParsedRow, RowError> {
    let number = TableDocument::row_number(index);

    let item_cell = cell(document, index, layout.item_id);
    if item_cell.is_empty() {
        return Err(RowError::new(number, ITEM_ID, "item identifier is required"));
    }
    let item = ItemId::new(item_cell);

    let entry_id = nonempty(opt_cell(document, index, layout.entry_id)).map(EntryId::new);

    let time_cell = cell(document, index, layout.time_spent);
    let current_hours = if time_cell.is_empty() {
        if entry_id.is_some() {
            // exported rows always carried a value; emptiness is corruption
            return Err(RowError::new(
                number,
                TIME_SPENT,
                "time value is required on exported rows",
            ));
        }
        0.0
    } else {
        parse_hours(time_cell)
            .ok_or_else(|| RowError::new(number, TIME_SPENT, bad_hours(time_cell)))?
    };

    let time_spent = match layout.time_spent_original {
        Some(col) if entry_id.is_some() => {
            let shadow_cell = cell(document, index, col);
            if shadow_cell.is_empty() {
                EditablePair::frozen(current_hours)
            } else {
                let original = parse_hours(shadow_cell).ok_or_else(|| {
                    RowError::new(number, TIME_SPENT_ORIGINAL, bad_hours(shadow_cell))
                })?;
                EditablePair::reconstructed(original, current_hours)
            }
        }
        _ => EditablePair::frozen(current_hours),
    };

    let date_cell = cell(document, index, layout.date);
    let current_date = if date_cell.is_empty() {
        if entry_id.is_some() {
            return Err(RowError::new(
                number,
                DATE,
                "date is required on exported rows",
            ));
        }
        None
    } else {
        Some(parse_date(date_cell).ok_or_else(|| {
            RowError::new(
                number,
                DATE,
                format!("invalid date: {date_cell} (expected YYYY-MM-DD)"),
            )
        })?)
    };
    // the v1 layout has no date shadow column; no date change is detectable
    let date = EditablePair::frozen(current_date);

    let current_note = nonempty(opt_cell(document, index, layout.note)).map(str::to_string);
    let note = match layout.note_original {
        Some(col) if entry_id.is_some() => {
            // an empty shadow cell means the original note was empty
            let original = nonempty(cell(document, index, col)).map(str::to_string);
            EditablePair::reconstructed(original, current_note)
        }
        _ => EditablePair::frozen(current_note),
    };

    let author = nonempty(opt_cell(document, index, layout.author)).map(str::to_string);

    Ok(ParsedRow {
        row: number,
        entry: LogEntry {
            item,
            id: entry_id,
            time_spent,
            date,
            note,
            author,
        },
    })
}

fn cell<'a>(document: &'a TableDocument, index: usize, col: usize) -> &'a str {
    document.cell(index, col).map(str::trim).unwrap_or("")
}

fn opt_cell<'a>(document: &'a TableDocument, index: usize, col: Option<usize>) -> &'a str {
    col.map(|col| cell(document, index, col)).unwrap_or("")
}

fn nonempty(cell: &str) -> Option<&str> {
    (!cell.is_empty()).then_some(cell)
}

fn parse_hours(cell: &str) -> Option<f64> {
    cell.parse().ok()
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%Y-%m-%d").ok()
}

fn bad_hours(cell: &str) -> String {
    format!("invalid time value: {cell}")
}
