//! Remote tracker seam
//!
//! The reconciliation engine talks to the remote system through the
//! [`Tracker`] trait and nothing else. The HTTP client implements it for
//! real runs; tests implement it with scripted fakes.

use chrono::NaiveDate;
use thiserror::Error;

use crate::ids::{EntryId, ItemId};
use crate::model::{LogEntry, TrackedItem};

/// Payload for creating a log entry that does not exist remotely yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    /// Hours of work
    pub hours: f64,
    /// Date the work happened on
    pub date: NaiveDate,
    /// Optional note text
    pub note: Option<String>,
}

/// Field set for an update submission.
///
/// `None` means "leave the remote value alone"; only changed fields are
/// ever sent. For the note, `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFields {
    /// New hours, when the time changed
    pub hours: Option<f64>,
    /// New date, when the date changed
    pub date: Option<NaiveDate>,
    /// New note text, when the note changed
    pub note: Option<String>,
}

impl UpdateFields {
    /// True when the update would send nothing
    pub fn is_empty(&self) -> bool {
        self.hours.is_none() && self.date.is_none() && self.note.is_none()
    }
}

/// Failure of a single remote call.
///
/// Remote errors never abort a run; they are recorded against the row that
/// triggered them and the run moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RemoteError {
    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        /// Seconds to wait, when the remote said so
        retry_after: Option<u64>,
    },

    #[error("rejected by remote validation: {message}")]
    ValidationRejected { message: String },

    #[error("transient remote error: {message}")]
    Transient { message: String },

    #[error("remote call timed out: {message}")]
    Timeout { message: String },
}

/// The four remote operations the engine needs.
///
/// Implementations perform blocking calls; the engine drives them one at a
/// time from a single thread.
pub trait Tracker {
    /// Find tracked items matching a search query
    fn list_items(&self, query: &str) -> Result<Vec<TrackedItem>, RemoteError>;

    /// Fetch all log entries recorded under an item
    fn list_log_entries(&self, item: &ItemId) -> Result<Vec<LogEntry>, RemoteError>;

    /// Create a new log entry and return its tracker-assigned id
    fn create_log_entry(&self, item: &ItemId, entry: &NewLogEntry)
        -> Result<EntryId, RemoteError>;

    /// Update an existing log entry, sending only the given fields
    fn update_log_entry(
        &self,
        item: &ItemId,
        entry: &EntryId,
        fields: &UpdateFields,
    ) -> Result<(), RemoteError>;
}
