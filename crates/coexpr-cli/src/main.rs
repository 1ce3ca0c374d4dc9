//! coexpr CLI
//!
//! Command-line interface for building gene databases and finding
//! co-expression neighbours

use clap::{Parser, Subcommand};
use coexpr_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "coexpr")]
#[command(about = "Co-expression neighbours grouped by ortholog family", long_about = None)]
struct Cli {
    /// Emit JSON log lines instead of human-readable ones
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database operations (create, add, verify, dump)
    Database(commands::database::DatabaseArgs),
    /// Find the neighbours of a job's baits
    Run(commands::run::RunArgs),
}

fn main() {
    let cli = Cli::parse();
    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Database(args) => commands::database::execute(args),
        Commands::Run(args) => commands::run::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
