//! Integrity fixture
//!
//! Explicit setup/teardown object for a suite or a single case: builds the
//! seeded snapshot when missing, opens a working copy of it and applies the
//! foreign-key setting. Every case that wants isolation gets its own copy.

use crate::config::IntegrityConfig;
use crate::db::database::Database;
use crate::db::schema::initialize_schema;
use crate::db::seed::{seed_fixture, SeedSummary};
use crate::db::snapshot::SnapshotStore;
use crate::time::within_budget;
use crate::{Error, Result};
use tracing::{info, warn};
use uuid::Uuid;

/// Create snapshot `name` with the schema and seed data, then close it.
///
/// The snapshot is built under a staging name and renamed into place once
/// seeding has committed, so `name` never holds a partial build. A failed
/// build removes its staging file; an interrupted one leaves only the
/// staging file behind.
pub async fn build_fixture_snapshot(store: &SnapshotStore, name: &str) -> Result<SeedSummary> {
    let staging = format!("{}-staging-{}", name, Uuid::new_v4().simple());

    match seed_snapshot(store, &staging).await {
        Ok(summary) => {
            store.rename(&staging, name).await?;
            info!("Fixture snapshot '{}' ready", name);
            Ok(summary)
        }
        Err(e) => {
            if let Err(cleanup) = store.remove(&staging).await {
                warn!("Failed to remove staging snapshot '{}': {}", staging, cleanup);
            }
            Err(e)
        }
    }
}

async fn seed_snapshot(store: &SnapshotStore, name: &str) -> Result<SeedSummary> {
    let db = Database::create(store, name).await?;
    initialize_schema(db.pool()).await?;

    // Enforcement on while seeding rejects any dangling link in the seed itself
    db.set_foreign_keys(true).await?;
    let summary = seed_fixture(db.pool()).await?;
    db.close().await;
    Ok(summary)
}

/// Working copy of the fixture snapshot
#[derive(Debug)]
pub struct IntegrityFixture {
    store: SnapshotStore,
    db: Database,
}

impl IntegrityFixture {
    /// Open `config.working_snapshot` as a copy of `config.fixture_snapshot`
    pub async fn setup(store: SnapshotStore, config: &IntegrityConfig) -> Result<Self> {
        let working = config.working_snapshot.clone();
        Self::setup_named(store, config, &working).await
    }

    /// Like [`IntegrityFixture::setup`], with a unique working snapshot name.
    ///
    /// Cases sharing one store never see each other's deletes.
    pub async fn setup_isolated(store: SnapshotStore, config: &IntegrityConfig) -> Result<Self> {
        let working = format!("{}-{}", config.working_snapshot, Uuid::new_v4().simple());
        Self::setup_named(store, config, &working).await
    }

    async fn setup_named(store: SnapshotStore, config: &IntegrityConfig, working: &str) -> Result<Self> {
        let fixture = config.fixture_snapshot.as_str();

        let db = within_budget("fixture setup", config.setup_timeout(), async {
            if !store.exists(fixture) {
                build_fixture_snapshot(&store, fixture).await?;
            }
            let db = Database::from_existing(&store, fixture, working).await?;
            db.set_foreign_keys(config.enforce_foreign_keys).await?;
            Ok::<_, Error>(db)
        })
        .await?;

        Ok(Self { store, db })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Close the working copy, keeping its file
    pub async fn close(self) {
        self.db.close().await;
    }

    /// Close the working copy and delete its file
    pub async fn teardown(self) -> Result<()> {
        let name = self.db.name().to_string();
        self.db.close().await;
        self.store.remove(&name).await
    }
}
