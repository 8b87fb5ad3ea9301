//! Test fixture utilities
//!
//! Each case gets its own scratch directory, fixture snapshot and working
//! copy, so cases never observe each other's deletes.

#![allow(dead_code)]

use movies_common::config::IntegrityConfig;
use movies_common::db::{Database, SnapshotStore};
use movies_common::fixture::IntegrityFixture;
use movies_common::time::{minutes, within_budget};
use movies_common::Result;
use std::future::Future;
use tempfile::TempDir;

/// Working copy plus the scratch directory that holds it.
///
/// Field order matters: the fixture is dropped before the directory.
pub struct TestFixture {
    fixture: IntegrityFixture,
    _dir: TempDir,
}

impl TestFixture {
    pub fn db(&self) -> &Database {
        self.fixture.db()
    }

    pub async fn teardown(self) {
        self.fixture.teardown().await.unwrap();
    }
}

pub fn test_config(enforce_foreign_keys: bool) -> IntegrityConfig {
    IntegrityConfig {
        enforce_foreign_keys,
        ..IntegrityConfig::default()
    }
}

/// Seeded working copy with foreign keys on or off
pub async fn setup(enforce_foreign_keys: bool) -> TestFixture {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path());
    let fixture = IntegrityFixture::setup(store, &test_config(enforce_foreign_keys))
        .await
        .expect("Fixture setup failed");

    TestFixture { fixture, _dir: dir }
}

/// Run one case body under the per-case wall-clock budget
pub async fn within_case_budget<F, T>(name: &str, fut: F) -> T
where
    F: Future<Output = Result<T>>,
{
    within_budget(name, minutes(10), fut)
        .await
        .unwrap_or_else(|e| panic!("{} failed: {}", name, e))
}

/// Scratch store for tests that drive the library entry points directly
pub fn scratch_store() -> (TempDir, SnapshotStore) {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path());
    (dir, store)
}
