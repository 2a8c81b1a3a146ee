//! Queries command
//!
//! Usage: timecard queries

use clap::Args;

use timecard_remote::{HttpTracker, Settings};

use super::EXIT_OK;

#[derive(Debug, Args)]
pub struct QueriesArgs {}

/// Execute queries command
pub fn execute(_args: QueriesArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let tracker = HttpTracker::new(&settings)?;
    let queries = tracker.saved_queries()?;

    if queries.is_empty() {
        println!("No saved queries.");
        return Ok(EXIT_OK);
    }
    for query in queries {
        println!("{}  {}", query.id, query.name);
        println!("  {}", query.query);
    }
    Ok(EXIT_OK)
}
