//! v1 snapshot column layout
//!
//! Columns are located by header name, never by position, so users may
//! reorder or drop optional columns in their editor. Only three columns are
//! required to import a document: `ItemID`, `TimeSpent`, and `Date`.

use crate::errors::{malformed_document, Result};
use crate::table::TableDocument;

pub const ITEM_ID: &str = "ItemID";
pub const TITLE: &str = "Title";
pub const CATEGORY: &str = "Category";
pub const ENTRY_ID: &str = "EntryID";
pub const TIME_SPENT: &str = "TimeSpent";
pub const TIME_SPENT_ORIGINAL: &str = "TimeSpent_Original";
pub const DATE: &str = "Date";
pub const NOTE: &str = "Note";
pub const NOTE_ORIGINAL: &str = "Note_Original";
pub const AUTHOR: &str = "Author";
pub const STATUS: &str = "Status";

/// Column order written by the exporter
pub const V1_COLUMNS: [&str; 11] = [
    ITEM_ID,
    TITLE,
    CATEGORY,
    ENTRY_ID,
    TIME_SPENT,
    TIME_SPENT_ORIGINAL,
    DATE,
    NOTE,
    NOTE_ORIGINAL,
    AUTHOR,
    STATUS,
];

/// Resolved column positions for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub item_id: usize,
    pub time_spent: usize,
    pub date: usize,
    pub title: Option<usize>,
    pub category: Option<usize>,
    pub entry_id: Option<usize>,
    pub time_spent_original: Option<usize>,
    pub note: Option<usize>,
    pub note_original: Option<usize>,
    pub author: Option<usize>,
    pub status: Option<usize>,
}

impl Layout {
    /// Locate columns by header name.
    ///
    /// # Errors
    ///
    /// Returns `MalformedDocument` naming every missing required column.
    pub fn detect(document: &TableDocument) -> Result<Self> {
        let item_id = document.column_index(ITEM_ID);
        let time_spent = document.column_index(TIME_SPENT);
        let date = document.column_index(DATE);

        let missing: Vec<&str> = [
            (ITEM_ID, item_id),
            (TIME_SPENT, time_spent),
            (DATE, date),
        ]
        .into_iter()
        .filter_map(|(header, index)| index.is_none().then_some(header))
        .collect();
        let (Some(item_id), Some(time_spent), Some(date)) = (item_id, time_spent, date) else {
            return Err(malformed_document(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        };

        Ok(Self {
            item_id,
            time_spent,
            date,
            title: document.column_index(TITLE),
            category: document.column_index(CATEGORY),
            entry_id: document.column_index(ENTRY_ID),
            time_spent_original: document.column_index(TIME_SPENT_ORIGINAL),
            note: document.column_index(NOTE),
            note_original: document.column_index(NOTE_ORIGINAL),
            author: document.column_index(AUTHOR),
            status: document.column_index(STATUS),
        })
    }
}
