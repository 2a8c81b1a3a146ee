//! Log entry model
//!
//! A `LogEntry` is one row of work booked against a tracked item. The three
//! user-editable fields (time spent, date, note) are carried as
//! original/current pairs so the diff engine can tell edits from noise.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::{EntryId, ItemId};
use crate::model::pair::EditablePair;

/// One unit of logged work against a tracked item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Item the entry belongs to
    pub item: ItemId,
    /// Entry identifier; `None` for rows the tracker has not seen yet
    pub id: Option<EntryId>,
    /// Hours of work, as a fractional amount
    pub time_spent: EditablePair<f64>,
    /// Calendar date the work happened on
    pub date: EditablePair<Option<NaiveDate>>,
    /// Free-text note attached to the entry
    pub note: EditablePair<Option<String>>,
    /// Display name of the entry author, when the tracker reports one
    pub author: Option<String>,
}

impl LogEntry {
    /// Build an entry from values fetched off the remote tracker.
    ///
    /// All editable fields start frozen: original and current are equal
    /// until the user edits the exported document.
    pub fn fetched(
        item: ItemId,
        id: EntryId,
        hours: f64,
        date: Option<NaiveDate>,
        note: Option<String>,
        author: Option<String>,
    ) -> Self {
        Self {
            item,
            id: Some(id),
            time_spent: EditablePair::frozen(hours),
            date: EditablePair::frozen(date),
            note: EditablePair::frozen(note),
            author,
        }
    }

    /// True when the entry has no identifier yet and must be created
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}
