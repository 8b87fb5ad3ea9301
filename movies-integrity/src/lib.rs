//! movies-integrity library
//!
//! Seeds the catalogue fixture and runs the integrity checks against a
//! working copy of it, collecting an [`IntegrityReport`].

use movies_common::config::IntegrityConfig;
use movies_common::db::{SeedSummary, SnapshotStore};
use movies_common::fixture::{build_fixture_snapshot, IntegrityFixture};
use movies_common::integrity::{run_check, standard_checks, IntegrityCheck};
use movies_common::time::within_budget;
use movies_common::Result;
use tracing::info;

pub mod cli;
pub mod report;

pub use report::{CheckResult, IntegrityReport};

/// Build (or rebuild) the fixture snapshot
pub async fn seed(store: &SnapshotStore, name: &str) -> Result<SeedSummary> {
    info!("Seeding fixture snapshot '{}' in {}", name, store.root().display());
    build_fixture_snapshot(store, name).await
}

/// Run `checks` in order against one working copy.
///
/// A check that errors is recorded as failed and the run continues; setup
/// errors abort the run.
pub async fn run_checks(
    store: SnapshotStore,
    config: &IntegrityConfig,
    checks: &[IntegrityCheck],
) -> Result<IntegrityReport> {
    let fixture = IntegrityFixture::setup(store, config).await?;
    let mut report = IntegrityReport::new(fixture.db().name(), config.enforce_foreign_keys);

    for check in checks {
        let result = within_budget(
            check.name,
            config.case_timeout(),
            run_check(fixture.db(), check),
        )
        .await;
        let line = match result {
            Ok(outcome) => CheckResult::from_outcome(&outcome),
            Err(e) => {
                tracing::error!(check = check.name, "Check errored: {}", e);
                CheckResult::from_error(check, &e)
            }
        };
        report.push(line);
    }

    // The working copy stays on disk for inspection and later suites
    fixture.close().await;
    Ok(report)
}

/// Run the standard checks
pub async fn run_standard_checks(
    store: SnapshotStore,
    config: &IntegrityConfig,
) -> Result<IntegrityReport> {
    run_checks(store, config, &standard_checks()).await
}
