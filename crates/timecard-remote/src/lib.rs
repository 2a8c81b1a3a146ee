//! Timecard Remote - HTTP client for the tracker API
//!
//! This crate implements the `Tracker` trait from timecard-core over the
//! tracker's REST API:
//! - Connection settings from the environment, with a redacted API token
//! - Wire DTOs and unit conversions (seconds/hours, timestamps/dates)
//! - A blocking client with paged search and per-status error mapping
//!
//! Nothing else in the workspace speaks HTTP. Dry runs never construct
//! this crate's client at all.

pub mod client;
pub mod settings;
pub mod wire;

// Re-export commonly used types
pub use client::{CurrentUser, HttpTracker, SavedQuery};
pub use settings::{Secret, Settings, SettingsError};
