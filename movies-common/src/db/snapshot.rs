//! Named database snapshots
//!
//! A snapshot is a single SQLite file `<root>/<name>.db`. Suites start from a
//! seeded snapshot and mutate a copy of it, never the original.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory of named snapshot files
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it doesn't exist
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// File path for a snapshot name
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{}.db", name)))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove a snapshot file (no-op when missing)
    pub async fn remove(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed snapshot {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy snapshot `previous` to `new`, replacing any existing `new`.
    ///
    /// The source must not be open for writing while it is copied.
    pub async fn copy(&self, previous: &str, new: &str) -> Result<PathBuf> {
        let source = self.path_for(previous)?;
        let target = self.path_for(new)?;

        if source == target {
            return Err(Error::InvalidInput(format!(
                "Snapshot '{}' cannot be copied onto itself",
                previous
            )));
        }
        if !source.exists() {
            return Err(Error::NotFound(format!(
                "Snapshot '{}' ({})",
                previous,
                source.display()
            )));
        }

        self.ensure_root()?;
        self.remove(new).await?;
        let bytes = tokio::fs::copy(&source, &target).await?;

        info!(
            "Copied snapshot {} -> {} ({} bytes)",
            previous, new, bytes
        );
        Ok(target)
    }

    /// Move snapshot `from` to `to`, replacing any existing `to`
    pub async fn rename(&self, from: &str, to: &str) -> Result<PathBuf> {
        let source = self.path_for(from)?;
        let target = self.path_for(to)?;
        if !source.exists() {
            return Err(Error::NotFound(format!(
                "Snapshot '{}' ({})",
                from,
                source.display()
            )));
        }

        tokio::fs::rename(&source, &target).await?;
        debug!("Renamed snapshot {} -> {}", from, to);
        Ok(target)
    }
}

/// Snapshot names become file names, so path separators are rejected.
fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid snapshot name: '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for() {
        let store = SnapshotStore::new("/data/movies");
        assert_eq!(store.path_for("07").unwrap(), PathBuf::from("/data/movies/07.db"));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let store = SnapshotStore::new("/data/movies");
        for name in ["", "../07", "a/b", "07.db", "x y"] {
            assert!(
                matches!(store.path_for(name), Err(Error::InvalidInput(_))),
                "'{}' should be rejected",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_rename_replaces_target() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        std::fs::write(store.path_for("07-staging").unwrap(), b"fresh").unwrap();
        std::fs::write(store.path_for("07").unwrap(), b"stale").unwrap();

        store.rename("07-staging", "07").await.unwrap();
        assert!(!store.exists("07-staging"));
        assert_eq!(std::fs::read(store.path_for("07").unwrap()).unwrap(), b"fresh");

        let err = store.rename("07-staging", "07").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_copy_missing_source_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        let err = store.copy("07", "08").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_copy_replaces_existing_target() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());

        std::fs::write(store.path_for("07").unwrap(), b"source").unwrap();
        std::fs::write(store.path_for("08").unwrap(), b"stale target").unwrap();

        store.copy("07", "08").await.unwrap();

        let copied = std::fs::read(store.path_for("08").unwrap()).unwrap();
        assert_eq!(copied, b"source");
        assert!(store.exists("07"), "Source snapshot must be left in place");
    }

    #[tokio::test]
    async fn test_copy_onto_itself_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        std::fs::write(store.path_for("07").unwrap(), b"source").unwrap();

        assert!(matches!(
            store.copy("07", "07").await,
            Err(Error::InvalidInput(_))
        ));
    }
}
