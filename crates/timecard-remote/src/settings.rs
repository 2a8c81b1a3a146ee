//! Connection settings from the environment
//!
//! Credentials are read from environment variables (a `.env` file is
//! honored when present) and the API token travels inside a wrapper that
//! redacts itself in Debug and Display output.

use std::fmt;

use thiserror::Error;

/// Result type alias using SettingsError
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Environment variable holding the tracker base URL
pub const BASE_URL_VAR: &str = "TRACKER_BASE_URL";
/// Environment variable holding the account email
pub const EMAIL_VAR: &str = "TRACKER_EMAIL";
/// Environment variable holding the API token
pub const API_TOKEN_VAR: &str = "TRACKER_API_TOKEN";
/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_VAR: &str = "TRACKER_TIMEOUT_SECS";

/// Default request timeout when the variable is unset
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failure to assemble settings from the environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("missing required environment variable {name}")]
    MissingVar { name: &'static str },

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Wrapper for the API token that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use timecard_remote::settings::Secret;
///
/// let token = Secret::new("atlassian-api-token");
/// assert_eq!(format!("{token:?}"), "***REDACTED***");
/// assert_eq!(token.expose(), "atlassian-api-token");
/// ```
pub struct Secret(String);

impl Secret {
    /// Wrap a sensitive value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the underlying sensitive value
    ///
    /// Use sparingly; only the authentication header needs it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Everything needed to reach the remote tracker
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the tracker, without trailing slash
    pub base_url: String,
    /// Account email for basic authentication
    pub email: String,
    /// API token for basic authentication
    pub api_token: Secret,
    /// Per-request timeout, in seconds
    pub timeout_secs: u64,
}

impl Settings {
    /// Assemble settings from the environment.
    ///
    /// Loads a `.env` file from the working directory first when one
    /// exists; real environment variables win over file entries.
    ///
    /// # Errors
    ///
    /// Fails when a required variable is missing or the timeout does not
    /// parse as a positive integer.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = require(BASE_URL_VAR)?.trim_end_matches('/').to_string();
        let email = require(EMAIL_VAR)?;
        let api_token = Secret::new(require(API_TOKEN_VAR)?);
        let timeout_secs = match std::env::var(TIMEOUT_VAR) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidVar {
                    name: TIMEOUT_VAR,
                    value,
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            email,
            api_token,
            timeout_secs,
        })
    }
}

fn require(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SettingsError::MissingVar { name }),
    }
}
