//! CLI command implementations

pub mod check;
pub mod export;
pub mod import;
pub mod queries;

/// Everything applied, or there was nothing to do
pub const EXIT_OK: i32 = 0;
/// At least one submission failed remotely
pub const EXIT_REMOTE_FAILURE: i32 = 1;
/// The document was structurally unusable
pub const EXIT_MALFORMED: i32 = 2;
