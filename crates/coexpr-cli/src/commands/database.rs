//! Database commands

use std::path::PathBuf;

use clap::{Args, Subcommand};
use coexpr_engine::commands::database::{
    database_add, database_create, database_dump, database_verify,
};

#[derive(Debug, Args)]
pub struct DatabaseArgs {
    #[command(subcommand)]
    pub command: DatabaseCommand,
}

#[derive(Debug, Subcommand)]
pub enum DatabaseCommand {
    /// Create a new database, optionally filled from an update description
    Create {
        database: PathBuf,
        #[arg(long)]
        update: Option<PathBuf>,
    },
    /// Apply an update description to an existing database
    Add { database: PathBuf, update: PathBuf },
    /// Check the database's consistency
    Verify { database: PathBuf },
    /// Write a YAML view of the database
    Dump {
        database: PathBuf,
        #[arg(long, default_value = "database.yaml")]
        out: PathBuf,
    },
}

pub fn execute(args: DatabaseArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        DatabaseCommand::Create { database, update } => {
            let summary = database_create(&database, update.as_deref())?;
            println!(
                "Created {} ({} collections, {} matrices, {} clusterings)",
                database.display(),
                summary.gene_collections,
                summary.expression_matrices,
                summary.clusterings
            );
        }
        DatabaseCommand::Add { database, update } => {
            let summary = database_add(&database, &update)?;
            println!(
                "Updated {} ({} ortholog files, {} matrices, {} new singleton groups)",
                database.display(),
                summary.ortholog_files,
                summary.expression_matrices,
                summary.singleton_groups
            );
        }
        DatabaseCommand::Verify { database } => {
            let stats = database_verify(&database)?;
            println!(
                "OK: {} genes, {} ortholog groups, {} matrices, {} clusterings",
                stats.genes, stats.ortholog_groups, stats.expression_matrices, stats.clusterings
            );
        }
        DatabaseCommand::Dump { database, out } => {
            database_dump(&database, &out)?;
            println!("Wrote {}", out.display());
        }
    }
    Ok(())
}
