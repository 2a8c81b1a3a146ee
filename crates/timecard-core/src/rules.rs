//! Validation rules for change records
//!
//! Checks run after the diff and before any submission. A record with one
//! or more violations is skipped; the run itself keeps going.

use chrono::NaiveDate;
use thiserror::Error;

use crate::diff::{ChangeKind, ChangeRecord, FieldDelta};

/// Default upper bound for hours on a single entry
pub const DEFAULT_MAX_HOURS: f64 = 24.0;

/// Default upper bound for note length, in characters
pub const DEFAULT_MAX_NOTE_LEN: usize = 2000;

/// A single rule violation on a change record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("time spent must be greater than zero (got {hours})")]
    NotPositive { hours: f64 },

    #[error("time spent is not a finite number")]
    NotFinite,

    #[error("time spent {hours} exceeds the {max} hour bound for a single entry")]
    ExceedsDailyBound { hours: f64, max: f64 },

    #[error("date is required")]
    MissingDate,

    #[error("date {date} is in the future")]
    FutureDate { date: NaiveDate },

    #[error("note is {len} characters, the limit is {max}")]
    NoteTooLong { len: usize, max: usize },
}

/// Bounds a change record must satisfy before submission
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    /// Upper bound for hours on a single entry
    pub max_hours_per_entry: f64,
    /// Upper bound for note length, in characters
    pub max_note_len: usize,
    /// Reference date; entry dates must not be after it
    pub today: NaiveDate,
}

impl Rules {
    /// Default bounds relative to the given reference date
    pub fn new(today: NaiveDate) -> Self {
        Self {
            max_hours_per_entry: DEFAULT_MAX_HOURS,
            max_note_len: DEFAULT_MAX_NOTE_LEN,
            today,
        }
    }

    /// Check a change record against the rules.
    ///
    /// Creates validate every field the submission would carry; updates
    /// validate only the fields that changed. An empty result means the
    /// record may be submitted.
    pub fn validate(&self, record: &ChangeRecord) -> Vec<Violation> {
        let mut violations = Vec::new();
        match &record.kind {
            ChangeKind::Create => {
                self.check_hours(*record.entry.time_spent.current(), &mut violations);
                self.check_date(*record.entry.date.current(), &mut violations);
                self.check_note(record.entry.note.current().as_deref(), &mut violations);
            }
            ChangeKind::Update(deltas) => {
                for delta in deltas {
                    match delta {
                        FieldDelta::TimeSpent { to, .. } => self.check_hours(*to, &mut violations),
                        FieldDelta::Date { to, .. } => self.check_date(*to, &mut violations),
                        FieldDelta::Note { to, .. } => {
                            self.check_note(to.as_deref(), &mut violations)
                        }
                    }
                }
            }
        }
        violations
    }

    fn check_hours(&self, hours: f64, violations: &mut Vec<Violation>) {
        if !hours.is_finite() {
            violations.push(Violation::NotFinite);
            return;
        }
        if hours <= 0.0 {
            violations.push(Violation::NotPositive { hours });
            return;
        }
        if hours > self.max_hours_per_entry {
            violations.push(Violation::ExceedsDailyBound {
                hours,
                max: self.max_hours_per_entry,
            });
        }
    }

    fn check_date(&self, date: Option<NaiveDate>, violations: &mut Vec<Violation>) {
        match date {
            None => violations.push(Violation::MissingDate),
            Some(date) if date > self.today => violations.push(Violation::FutureDate { date }),
            Some(_) => {}
        }
    }

    fn check_note(&self, note: Option<&str>, violations: &mut Vec<Violation>) {
        if let Some(note) = note {
            let len = note.chars().count();
            if len > self.max_note_len {
                violations.push(Violation::NoteTooLong {
                    len,
                    max: self.max_note_len,
                });
            }
        }
    }
}
