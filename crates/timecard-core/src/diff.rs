//! Diff engine
//!
//! Pure comparison of edited log entries against their frozen originals.
//! Produces a change-set of create/update records; rows whose editable
//! fields are untouched are left out entirely. No I/O happens here.

use chrono::NaiveDate;

use crate::model::LogEntry;

/// Tolerance for comparing edited hours against the original value.
///
/// Hours travel through text cells and back; float formatting noise below
/// this bound must not count as an edit.
pub const TIME_EPSILON: f64 = 1e-9;

/// A single field-level difference between original and current values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDelta {
    /// Hours changed
    TimeSpent { from: f64, to: f64 },
    /// Work date changed
    Date {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Note text changed
    Note {
        from: Option<String>,
        to: Option<String>,
    },
}

/// What kind of submission a changed row requires
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// Row has no entry id; the whole entry must be created
    Create,
    /// Row has an entry id; only the listed fields changed
    Update(Vec<FieldDelta>),
}

/// One changed row, ready for validation and submission
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// Source row number (1-based, counting the header row)
    pub row: usize,
    /// The parsed entry the change came from
    pub entry: LogEntry,
    /// Create or update, with the field deltas for updates
    pub kind: ChangeKind,
}

/// All changed rows of a document, in source-row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Changed rows; untouched rows are not represented
    pub records: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// True when no row in the document changed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of changed rows
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Classify a single entry against its frozen originals.
///
/// Returns `None` when nothing changed. Entries without an id are always
/// classified as `Create`, whatever their field values; validation decides
/// later whether they are submittable.
pub fn diff_entry(entry: &LogEntry) -> Option<ChangeKind> {
    if entry.is_new() {
        return Some(ChangeKind::Create);
    }

    let mut deltas = Vec::new();

    let from_hours = *entry.time_spent.original();
    let to_hours = *entry.time_spent.current();
    if !hours_equal(from_hours, to_hours) {
        deltas.push(FieldDelta::TimeSpent {
            from: from_hours,
            to: to_hours,
        });
    }

    if entry.date.original() != entry.date.current() {
        deltas.push(FieldDelta::Date {
            from: *entry.date.original(),
            to: *entry.date.current(),
        });
    }

    if !notes_equal(entry.note.original(), entry.note.current()) {
        deltas.push(FieldDelta::Note {
            from: entry.note.original().clone(),
            to: entry.note.current().clone(),
        });
    }

    if deltas.is_empty() {
        None
    } else {
        Some(ChangeKind::Update(deltas))
    }
}

/// Diff every parsed row of a document into a change-set.
///
/// Takes `(row number, entry)` pairs and keeps only the rows that changed,
/// preserving their source order.
pub fn build_change_set<'a, I>(rows: I) -> ChangeSet
where
    I: IntoIterator<Item = (usize, &'a LogEntry)>,
{
    let records = rows
        .into_iter()
        .filter_map(|(row, entry)| {
            diff_entry(entry).map(|kind| ChangeRecord {
                row,
                entry: entry.clone(),
                kind,
            })
        })
        .collect();
    ChangeSet { records }
}

fn hours_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}

/// Notes compare with trailing whitespace trimmed, and a missing note equal
/// to an empty one.
fn notes_equal(a: &Option<String>, b: &Option<String>) -> bool {
    normalized(a) == normalized(b)
}

fn normalized(note: &Option<String>) -> &str {
    note.as_deref().map(str::trim_end).unwrap_or("")
}
