//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable naming the snapshot root folder
pub const ROOT_FOLDER_ENV: &str = "MOVIES_ROOT";

/// Directory name used under the platform config and data directories
const APP_DIR: &str = "sql-movies";

/// Integrity harness configuration
///
/// Every key is optional in the TOML file; missing keys take the defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Directory holding `<name>.db` snapshots
    pub root_folder: Option<PathBuf>,
    /// Seeded snapshot that working copies are taken from
    pub fixture_snapshot: String,
    /// Name of the working copy mutated by the checks
    pub working_snapshot: String,
    /// Whether `PRAGMA foreign_keys` is switched on for the working copy
    pub enforce_foreign_keys: bool,
    /// Per-check wall-clock budget
    pub case_timeout_secs: u64,
    /// Budget for seeding and opening snapshots
    pub setup_timeout_secs: u64,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            fixture_snapshot: "07".to_string(),
            working_snapshot: "08".to_string(),
            enforce_foreign_keys: true,
            case_timeout_secs: 600,
            setup_timeout_secs: 180,
        }
    }
}

impl IntegrityConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields defaults with a warning; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded config file {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load from the platform config file, falling back to defaults
    pub fn load_default() -> Result<Self> {
        match config_file_path() {
            Ok(path) => Self::load(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn case_timeout(&self) -> Duration {
        Duration::from_secs(self.case_timeout_secs)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_secs(self.setup_timeout_secs)
    }
}

/// Root folder resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. `root_folder` from the loaded config file
/// 4. OS-dependent default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config_root: Option<&Path>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = config_root {
        return path.to_path_buf();
    }

    default_root_folder()
}

/// Platform config file location (`<config_dir>/sql-movies/config.toml`)
pub fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./sql_movies_data"))
}
