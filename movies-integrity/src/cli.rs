//! Command-line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Seed the movie catalogue and check its referential integrity
#[derive(Debug, Parser)]
#[command(name = "movies-integrity", version, about)]
pub struct Cli {
    /// Snapshot directory (overrides MOVIES_ROOT and the config file)
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the schema and seed fixture snapshot
    Seed {
        /// Snapshot name (default: fixture_snapshot from config)
        #[arg(long)]
        name: Option<String>,
    },
    /// Copy the fixture snapshot and run every integrity check against the copy
    Check {
        /// Fixture snapshot to copy from
        #[arg(long)]
        from: Option<String>,

        /// Working snapshot to create
        #[arg(long)]
        snapshot: Option<String>,

        /// Leave PRAGMA foreign_keys off, so only guard clauses protect rows
        #[arg(long)]
        no_foreign_keys: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
