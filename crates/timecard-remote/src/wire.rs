//! Wire format of the remote tracker API
//!
//! Serde DTOs for the REST payloads plus the conversions between wire
//! units and the domain model: seconds to fractional hours, timestamps to
//! calendar dates, rich-text comments to plain notes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use timecard_core::{EntryId, ItemId, LogEntry, TrackedItem};

/// One page of a search response
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "startAt", default)]
    pub start_at: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<IssueDto>,
}

/// A searched item
#[derive(Debug, Deserialize)]
pub struct IssueDto {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// The item fields the engine asks for
#[derive(Debug, Default, Deserialize)]
pub struct IssueFields {
    pub summary: Option<String>,
    pub issuetype: Option<IssueType>,
}

/// Item category descriptor
#[derive(Debug, Deserialize)]
pub struct IssueType {
    pub name: Option<String>,
}

impl IssueDto {
    /// Convert to the domain model; a missing summary falls back to the key
    pub fn into_tracked_item(self) -> TrackedItem {
        let title = match self.fields.summary {
            Some(summary) if !summary.is_empty() => summary,
            _ => self.key.clone(),
        };
        let category = self
            .fields
            .issuetype
            .and_then(|t| t.name)
            .unwrap_or_default();
        TrackedItem::new(ItemId::new(self.key), title, category)
    }
}

/// The worklog list under an item
#[derive(Debug, Deserialize)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<WorklogDto>,
}

/// One worklog as the tracker reports it
#[derive(Debug, Deserialize)]
pub struct WorklogDto {
    pub id: String,
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: Option<i64>,
    pub started: Option<String>,
    /// Plain string on older servers, rich-text document on newer ones
    pub comment: Option<Value>,
    pub author: Option<AuthorDto>,
}

/// Worklog author descriptor
#[derive(Debug, Deserialize)]
pub struct AuthorDto {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

impl WorklogDto {
    /// Convert to a frozen domain entry under the given item
    pub fn into_log_entry(self, item: &ItemId) -> LogEntry {
        LogEntry::fetched(
            item.clone(),
            EntryId::new(self.id),
            seconds_to_hours(self.time_spent_seconds.unwrap_or(0)),
            self.started.as_deref().and_then(started_date),
            self.comment.as_ref().and_then(comment_text),
            self.author.and_then(|a| a.display_name),
        )
    }
}

/// Response to creating a worklog
#[derive(Debug, Deserialize)]
pub struct CreatedWorklog {
    pub id: String,
}

/// The authenticated account, from the connectivity check
#[derive(Debug, Deserialize)]
pub struct MyselfDto {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
}

/// A saved search the user marked as favourite
#[derive(Debug, Deserialize)]
pub struct FilterDto {
    pub id: String,
    pub name: String,
    pub jql: String,
}

/// Worklog create/update payload; absent fields are left alone remotely
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct WorklogWrite {
    #[serde(rename = "timeSpentSeconds", skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Error body the tracker sends with 4xx/5xx responses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl ErrorBody {
    /// Flatten messages and field errors into one line, if any
    pub fn flatten(&self) -> Option<String> {
        let mut parts: Vec<String> = self.error_messages.clone();
        parts.extend(
            self.errors
                .iter()
                .map(|(field, message)| format!("{field}: {message}")),
        );
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// Convert fractional hours to the seconds the wire wants
pub fn hours_to_seconds(hours: f64) -> i64 {
    (hours * 3600.0).round() as i64
}

/// Convert wire seconds back to fractional hours
pub fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}

/// Render a work date as the wire timestamp, anchored to noon so timezone
/// shifts cannot move it across midnight
pub fn started_timestamp(date: NaiveDate) -> String {
    format!("{}T12:00:00.000+0000", date.format("%Y-%m-%d"))
}

/// Extract the calendar date from a wire timestamp
pub fn started_date(started: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(started.get(..10)?, "%Y-%m-%d").ok()
}

/// Extract plain note text from a comment value.
///
/// Older servers send a plain string; newer ones send a rich-text document
/// whose text nodes are concatenated. Empty text maps to `None`.
pub fn comment_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            let mut out = String::new();
            collect_text(value, &mut out);
            out
        }
        _ => String::new(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn collect_text(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                out.push_str(text);
            }
            if let Some(Value::Array(children)) = map.get("content") {
                for child in children {
                    collect_text(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        _ => {}
    }
}
