//! movies-integrity - seed the movie catalogue and verify that parent rows
//! cannot be deleted while junction rows reference them.

use anyhow::{Context, Result};
use clap::Parser;
use movies_common::config::{resolve_root_folder, IntegrityConfig, ROOT_FOLDER_ENV};
use movies_common::db::SnapshotStore;
use movies_integrity::cli::{Cli, Command};
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting movies-integrity v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => IntegrityConfig::load(path),
        None => IntegrityConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    let root = resolve_root_folder(
        cli.root.as_deref(),
        ROOT_FOLDER_ENV,
        config.root_folder.as_deref(),
    );
    info!("Snapshot directory: {}", root.display());
    let store = SnapshotStore::new(root);

    match cli.command {
        Command::Seed { name } => {
            let name = name.unwrap_or_else(|| config.fixture_snapshot.clone());
            let summary = movies_integrity::seed(&store, &name)
                .await
                .with_context(|| format!("Failed to seed snapshot '{}'", name))?;
            info!(
                "Seeded '{}': {} movies, {} junction rows",
                name, summary.movies, summary.junction_rows
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Check {
            from,
            snapshot,
            no_foreign_keys,
            json,
        } => {
            if let Some(from) = from {
                config.fixture_snapshot = from;
            }
            if let Some(snapshot) = snapshot {
                config.working_snapshot = snapshot;
            }
            if no_foreign_keys {
                config.enforce_foreign_keys = false;
            }

            let report = movies_integrity::run_standard_checks(store, &config)
                .await
                .context("Integrity run could not start")?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.render_text());
            }

            if report.all_passed() {
                info!("All {} checks passed", report.results.len());
                Ok(ExitCode::SUCCESS)
            } else {
                warn!("{} of {} checks failed", report.failed(), report.results.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
