//! Domain models for the reconciliation engine

pub mod entry;
pub mod item;
pub mod pair;

pub use entry::LogEntry;
pub use item::{ItemEntries, TrackedItem};
pub use pair::EditablePair;
