//! Blocking HTTP client for the remote tracker
//!
//! Implements the [`Tracker`] trait over the tracker's REST API with basic
//! authentication. Every response status maps onto a [`RemoteError`]
//! variant so the engine can report per-row failures without knowing HTTP.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use tracing::{debug, warn};

use timecard_core::{
    EntryId, ItemId, LogEntry, NewLogEntry, RemoteError, TrackedItem, Tracker, UpdateFields,
};

use crate::settings::{Secret, Settings};
use crate::wire::{
    hours_to_seconds, started_timestamp, CreatedWorklog, ErrorBody, FilterDto, MyselfDto,
    SearchPage, WorklogPage, WorklogWrite,
};

/// Search page size; pages are fetched until the reported total is reached
const PAGE_SIZE: u64 = 50;

/// The authenticated account, from the connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Display name, used for author filtering on exports
    pub display_name: String,
    /// Account email, when the tracker reports it
    pub email: Option<String>,
    /// Opaque account identifier
    pub account_id: Option<String>,
}

/// A saved search the user can export from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuery {
    /// Tracker-assigned filter id
    pub id: String,
    /// Display name
    pub name: String,
    /// The query text the filter stands for
    pub query: String,
}

/// HTTP implementation of the [`Tracker`] trait
pub struct HttpTracker {
    client: Client,
    base_url: String,
    email: String,
    api_token: Secret,
}

impl HttpTracker {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed.
    pub fn new(settings: &Settings) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Transient {
                message: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            email: settings.email.clone(),
            api_token: settings.api_token.clone(),
        })
    }

    /// Verify connectivity and credentials
    pub fn current_user(&self) -> Result<CurrentUser, RemoteError> {
        let response = self.send(self.client.get(self.url("/myself")), "GET", "/myself")?;
        let myself: MyselfDto = response.json().map_err(from_transport)?;
        Ok(CurrentUser {
            display_name: myself.display_name.unwrap_or_default(),
            email: myself.email_address,
            account_id: myself.account_id,
        })
    }

    /// List the user's favourite saved searches
    pub fn saved_queries(&self) -> Result<Vec<SavedQuery>, RemoteError> {
        let response = self.send(
            self.client.get(self.url("/filter/favourite")),
            "GET",
            "/filter/favourite",
        )?;
        let filters: Vec<FilterDto> = response.json().map_err(from_transport)?;
        Ok(filters
            .into_iter()
            .map(|f| SavedQuery {
                id: f.id,
                name: f.name,
                query: f.jql,
            })
            .collect())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2{path}", self.base_url)
    }

    fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<Response, RemoteError> {
        debug!(method, path, "remote call");
        let response = request
            .basic_auth(&self.email, Some(self.api_token.expose()))
            .send()
            .map_err(from_transport)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            let err = error_from_response(response);
            warn!(method, path, error = %err, "remote call failed");
            Err(err)
        }
    }
}

impl Tracker for HttpTracker {
    fn list_items(&self, query: &str) -> Result<Vec<TrackedItem>, RemoteError> {
        let mut items = Vec::new();
        let mut start_at = 0u64;
        loop {
            let start = start_at.to_string();
            let max = PAGE_SIZE.to_string();
            let params = [
                ("jql", query),
                ("startAt", start.as_str()),
                ("maxResults", max.as_str()),
                ("fields", "summary,issuetype"),
            ];
            let request = self.client.get(self.url("/search")).query(&params);
            let response = self.send(request, "GET", "/search")?;
            let page: SearchPage = response.json().map_err(from_transport)?;

            let fetched = page.issues.len() as u64;
            debug!(
                total = page.total,
                start_at = page.start_at,
                fetched,
                "search page"
            );
            for issue in page.issues {
                items.push(issue.into_tracked_item());
            }
            if fetched == 0 || items.len() as u64 >= page.total {
                break;
            }
            start_at += fetched;
        }
        Ok(items)
    }

    fn list_log_entries(&self, item: &ItemId) -> Result<Vec<LogEntry>, RemoteError> {
        let path = format!("/issue/{item}/worklog");
        let response = self.send(self.client.get(self.url(&path)), "GET", &path)?;
        let page: WorklogPage = response.json().map_err(from_transport)?;
        Ok(page
            .worklogs
            .into_iter()
            .map(|worklog| worklog.into_log_entry(item))
            .collect())
    }

    fn create_log_entry(
        &self,
        item: &ItemId,
        entry: &NewLogEntry,
    ) -> Result<EntryId, RemoteError> {
        let path = format!("/issue/{item}/worklog");
        let body = WorklogWrite {
            time_spent_seconds: Some(hours_to_seconds(entry.hours)),
            started: Some(started_timestamp(entry.date)),
            comment: entry.note.clone(),
        };
        let request = self.client.post(self.url(&path)).json(&body);
        let response = self.send(request, "POST", &path)?;
        let created: CreatedWorklog = response.json().map_err(from_transport)?;
        Ok(EntryId::new(created.id))
    }

    fn update_log_entry(
        &self,
        item: &ItemId,
        entry: &EntryId,
        fields: &UpdateFields,
    ) -> Result<(), RemoteError> {
        let path = format!("/issue/{item}/worklog/{entry}");
        let body = WorklogWrite {
            time_spent_seconds: fields.hours.map(hours_to_seconds),
            started: fields.date.map(started_timestamp),
            comment: fields.note.clone(),
        };
        let request = self.client.put(self.url(&path)).json(&body);
        self.send(request, "PUT", &path)?;
        Ok(())
    }
}

/// Map a non-success response onto a remote error
fn error_from_response(response: Response) -> RemoteError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let fallback = status.to_string();
    let message = response
        .text()
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.flatten())
        .unwrap_or(fallback);
    classify_status(status, retry_after, message)
}

fn classify_status(status: StatusCode, retry_after: Option<u64>, message: String) -> RemoteError {
    match status.as_u16() {
        401 | 403 => RemoteError::Auth { message },
        404 => RemoteError::NotFound { message },
        429 => RemoteError::RateLimited {
            message,
            retry_after,
        },
        400 | 422 => RemoteError::ValidationRejected { message },
        _ => RemoteError::Transient { message },
    }
}

/// Map a transport-level failure onto a remote error
fn from_transport(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout {
            message: err.to_string(),
        }
    } else {
        RemoteError::Transient {
            message: err.to_string(),
        }
    }
}
