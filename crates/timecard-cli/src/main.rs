//! Timecard CLI
//!
//! Command-line interface for exporting timesheet snapshots and
//! reconciling edited ones against the remote tracker.

use clap::{Parser, Subcommand};

use timecard_core::logging::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "timecard")]
#[command(about = "Timecard - Timesheet export and reconciliation", long_about = None)]
struct Cli {
    /// Verbose logging (debug level, human-readable)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Export a snapshot document for editing
    Export(commands::export::ExportArgs),
    /// Reconcile an edited snapshot against the tracker
    Import(commands::import::ImportArgs),
    /// Verify connectivity and credentials
    Check(commands::check::CheckArgs),
    /// List saved queries usable with export --saved
    Queries(commands::queries::QueriesArgs),
}

fn main() {
    let cli = Cli::parse();

    let profile = if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    };
    logging::init(profile);

    let result = match cli.command {
        Commands::Export(args) => commands::export::execute(args),
        Commands::Import(args) => commands::import::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Queries(args) => commands::queries::execute(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
