//! Snapshot serialization
//!
//! Turns fetched items and entries into a v1 table document. Live columns
//! carry the editable values; the `_Original` shadow columns freeze the
//! same values so a later import can reconstruct what was edited.

use chrono::NaiveDate;

use timecard_core::{ItemEntries, LogEntry, TrackedItem};

use crate::layout::V1_COLUMNS;
use crate::table::TableDocument;

/// Serialize item groups into a v1 snapshot document.
///
/// Items with no entries export as a single template row: identifier and
/// title filled in, every entry-level cell left empty for the user to fill.
/// Output is deterministic; the same groups always produce the same cells.
pub fn snapshot_document(groups: &[ItemEntries]) -> TableDocument {
    let mut document = TableDocument::new(V1_COLUMNS.iter().map(|h| h.to_string()).collect());
    for group in groups {
        if group.is_template() {
            document.push_row(template_row(&group.item));
        }
        for entry in &group.entries {
            document.push_row(entry_row(&group.item, entry));
        }
    }
    document
}

/// Format hours for a cell.
///
/// Uses the shortest representation that parses back to the same value, so
/// export and re-import never disagree about the number.
pub fn format_hours(hours: f64) -> String {
    hours.to_string()
}

/// Format a date for a cell as `YYYY-MM-DD`; missing dates write empty
pub fn format_date(date: Option<&NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn entry_row(item: &TrackedItem, entry: &LogEntry) -> Vec<String> {
    vec![
        item.id.to_string(),
        item.title.clone(),
        item.category.clone(),
        entry.id.as_ref().map(ToString::to_string).unwrap_or_default(),
        format_hours(*entry.time_spent.current()),
        format_hours(*entry.time_spent.original()),
        format_date(entry.date.current().as_ref()),
        entry.note.current().clone().unwrap_or_default(),
        entry.note.original().clone().unwrap_or_default(),
        entry.author.clone().unwrap_or_default(),
        String::new(),
    ]
}

fn template_row(item: &TrackedItem) -> Vec<String> {
    let mut row = vec![String::new(); V1_COLUMNS.len()];
    row[0] = item.id.to_string();
    row[1] = item.title.clone();
    row[2] = item.category.clone();
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use timecard_core::{EntryId, ItemId};

    fn item(id: &str, title: &str) -> TrackedItem {
        TrackedItem::new(ItemId::new(id), title, "Task")
    }

    fn entry(id: &str, hours: f64, date: Option<NaiveDate>, note: Option<&str>) -> LogEntry {
        LogEntry::fetched(
            ItemId::new("PROJ-1"),
            EntryId::new(id),
            hours,
            date,
            note.map(str::to_string),
            Some("Dana".to_string()),
        )
    }

    #[test]
    fn test_snapshot_writes_live_and_shadow_cells() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11);
        let groups = vec![ItemEntries::new(
            item("PROJ-1", "Fix login"),
            vec![entry("10001", 2.5, date, Some("standup"))],
        )];

        let doc = snapshot_document(&groups);
        assert_eq!(doc.headers, V1_COLUMNS.to_vec());
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.cell(0, 0), Some("PROJ-1"));
        assert_eq!(doc.cell(0, 3), Some("10001"));
        assert_eq!(doc.cell(0, 4), Some("2.5"));
        assert_eq!(doc.cell(0, 5), Some("2.5"));
        assert_eq!(doc.cell(0, 6), Some("2024-03-11"));
        assert_eq!(doc.cell(0, 7), Some("standup"));
        assert_eq!(doc.cell(0, 8), Some("standup"));
        assert_eq!(doc.cell(0, 9), Some("Dana"));
        assert_eq!(doc.cell(0, 10), Some(""));
    }

    #[test]
    fn test_item_without_entries_exports_template_row() {
        let groups = vec![ItemEntries::new(item("PROJ-9", "Spike"), vec![])];
        let doc = snapshot_document(&groups);
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.cell(0, 0), Some("PROJ-9"));
        assert_eq!(doc.cell(0, 1), Some("Spike"));
        assert_eq!(doc.cell(0, 3), Some(""));
        assert_eq!(doc.cell(0, 4), Some(""));
        assert_eq!(doc.cell(0, 6), Some(""));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11);
        let groups = vec![ItemEntries::new(
            item("PROJ-1", "Fix login"),
            vec![entry("10001", 1.0 / 3.0, date, None)],
        )];
        let first = snapshot_document(&groups);
        let second = snapshot_document(&groups);
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_hours_round_trips_through_parse() {
        for hours in [0.1, 2.5, 1.0 / 3.0, 7.75, 1081.0 / 3600.0] {
            let cell = format_hours(hours);
            let parsed: f64 = cell.parse().unwrap();
            assert_eq!(parsed, hours);
        }
    }
}
