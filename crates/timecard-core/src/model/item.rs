//! Tracked item model

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::model::entry::LogEntry;

/// A work item on the remote tracker that log entries attach to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Tracker-assigned identifier (e.g. "PROJ-123")
    pub id: ItemId,
    /// Human-readable title
    pub title: String,
    /// Item category as reported by the tracker (e.g. "Task", "Bug")
    pub category: String,
}

impl TrackedItem {
    /// Create a new tracked item
    pub fn new(id: ItemId, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
        }
    }
}

/// An item together with the log entries selected for a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntries {
    /// The item the entries belong to
    pub item: TrackedItem,
    /// Entries in tracker order; may be empty
    pub entries: Vec<LogEntry>,
}

impl ItemEntries {
    /// Group an item with its entries
    pub fn new(item: TrackedItem, entries: Vec<LogEntry>) -> Self {
        Self { item, entries }
    }

    /// True when the item has no entries and exports as a template row
    pub fn is_template(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of current hours across all entries
    pub fn total_hours(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| *entry.time_spent.current())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EntryId;

    fn sample_item() -> TrackedItem {
        TrackedItem::new(ItemId::new("PROJ-1"), "Fix login flow", "Bug")
    }

    #[test]
    fn test_item_without_entries_is_template() {
        let group = ItemEntries::new(sample_item(), vec![]);
        assert!(group.is_template());
        assert_eq!(group.total_hours(), 0.0);
    }

    #[test]
    fn test_total_hours_sums_current_values() {
        let entries = vec![
            LogEntry::fetched(
                ItemId::new("PROJ-1"),
                EntryId::new("1"),
                1.5,
                None,
                None,
                None,
            ),
            LogEntry::fetched(
                ItemId::new("PROJ-1"),
                EntryId::new("2"),
                2.0,
                None,
                None,
                None,
            ),
        ];
        let group = ItemEntries::new(sample_item(), entries);
        assert!(!group.is_template());
        assert_eq!(group.total_hours(), 3.5);
    }
}
