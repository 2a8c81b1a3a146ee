use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use timecard_core::{
    EntryId, ItemId, LogEntry, NewLogEntry, RemoteError, TrackedItem, Tracker, UpdateFields,
};

/// v1 header row, as the exporter writes it
#[allow(dead_code)]
pub const V1_HEADER: &str =
    "ItemID,Title,Category,EntryID,TimeSpent,TimeSpent_Original,Date,Note,Note_Original,Author,Status";

/// One remote call observed by the scripted tracker
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum Call {
    ListItems {
        query: String,
    },
    ListEntries {
        item: ItemId,
    },
    Create {
        item: ItemId,
        entry: NewLogEntry,
    },
    Update {
        item: ItemId,
        entry: EntryId,
        fields: UpdateFields,
    },
}

/// In-memory tracker fake: serves scripted data, records every call, and
/// fails the calls it was told to fail
pub struct ScriptedTracker {
    pub items: Vec<TrackedItem>,
    pub entries: HashMap<ItemId, Vec<LogEntry>>,
    /// Items whose create calls fail with a transient error
    pub fail_creates_for: Vec<ItemId>,
    /// Entries whose update calls fail with a transient error
    pub fail_updates_for: Vec<EntryId>,
    /// Flag raised after every write call, for cancellation tests
    pub cancel_after_write: Option<Arc<AtomicBool>>,
    pub calls: RefCell<Vec<Call>>,
    next_id: Cell<u64>,
}

impl ScriptedTracker {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            entries: HashMap::new(),
            fail_creates_for: Vec::new(),
            fail_updates_for: Vec::new(),
            cancel_after_write: None,
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(90001),
        }
    }

    fn after_write(&self) {
        if let Some(flag) = &self.cancel_after_write {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Calls recorded so far
    #[allow(dead_code)]
    pub fn recorded(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Only the create/update calls, ignoring reads
    #[allow(dead_code)]
    pub fn writes(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. } | Call::Update { .. }))
            .cloned()
            .collect()
    }
}

impl Tracker for ScriptedTracker {
    fn list_items(&self, query: &str) -> Result<Vec<TrackedItem>, RemoteError> {
        self.calls.borrow_mut().push(Call::ListItems {
            query: query.to_string(),
        });
        Ok(self.items.clone())
    }

    fn list_log_entries(&self, item: &ItemId) -> Result<Vec<LogEntry>, RemoteError> {
        self.calls.borrow_mut().push(Call::ListEntries { item: item.clone() });
        Ok(self.entries.get(item).cloned().unwrap_or_default())
    }

    fn create_log_entry(
        &self,
        item: &ItemId,
        entry: &NewLogEntry,
    ) -> Result<EntryId, RemoteError> {
        self.calls.borrow_mut().push(Call::Create {
            item: item.clone(),
            entry: entry.clone(),
        });
        self.after_write();
        if self.fail_creates_for.contains(item) {
            return Err(RemoteError::Transient {
                message: "scripted create failure".to_string(),
            });
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(EntryId::new(id.to_string()))
    }

    fn update_log_entry(
        &self,
        item: &ItemId,
        entry: &EntryId,
        fields: &UpdateFields,
    ) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(Call::Update {
            item: item.clone(),
            entry: entry.clone(),
            fields: fields.clone(),
        });
        self.after_write();
        if self.fail_updates_for.contains(entry) {
            return Err(RemoteError::Transient {
                message: "scripted update failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Write a CSV document into the temp dir and return its path
#[allow(dead_code)]
pub fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[allow(dead_code)]
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn item(id: &str, title: &str) -> TrackedItem {
    TrackedItem::new(ItemId::new(id), title, "Task")
}

#[allow(dead_code)]
pub fn fetched_entry(
    item: &str,
    id: &str,
    hours: f64,
    date: NaiveDate,
    note: Option<&str>,
    author: &str,
) -> LogEntry {
    LogEntry::fetched(
        ItemId::new(item),
        EntryId::new(id),
        hours,
        Some(date),
        note.map(str::to_string),
        Some(author.to_string()),
    )
}
