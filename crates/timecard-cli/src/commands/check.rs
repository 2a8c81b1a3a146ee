//! Check command
//!
//! Usage: timecard check

use clap::Args;

use timecard_remote::{HttpTracker, Settings};

use super::EXIT_OK;

#[derive(Debug, Args)]
pub struct CheckArgs {}

/// Execute check command
pub fn execute(_args: CheckArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let tracker = HttpTracker::new(&settings)?;
    let user = tracker.current_user()?;

    println!("Connected to {}", settings.base_url);
    println!("  account: {}", user.display_name);
    if let Some(email) = &user.email {
        println!("  email: {}", email);
    }
    Ok(EXIT_OK)
}
