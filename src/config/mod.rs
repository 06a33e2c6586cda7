use crate::utils::{get_manifest_path, get_script_root, DEFAULT_SQLITE_BIN, UPGRADE_FOLDER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// What a run does after a script fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next script.
    #[default]
    Continue,
    /// Stop at the first failed script and report the run as unsuccessful.
    Strict,
}

fn default_manifest_path() -> PathBuf {
    get_manifest_path(Path::new(UPGRADE_FOLDER))
}

fn default_script_root() -> PathBuf {
    get_script_root(Path::new(UPGRADE_FOLDER))
}

fn default_sqlite_bin() -> String {
    DEFAULT_SQLITE_BIN.to_string()
}

/// Upgrade engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeConfig {
    /// Location of the version manifest (`version.json`).
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,
    /// Directory the manifest's script file names are resolved against.
    #[serde(default = "default_script_root")]
    pub script_root: PathBuf,
    /// Database client invoked for `sql` scripts.
    #[serde(default = "default_sqlite_bin")]
    pub sqlite_bin: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl UpgradeConfig {
    /// Config for the conventional layout: `<dir>/version.json` and `<dir>/script/`.
    pub fn from_upgrade_dir(upgrade_dir: &Path) -> Self {
        Self {
            manifest_path: get_manifest_path(upgrade_dir),
            script_root: get_script_root(upgrade_dir),
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            script_root: default_script_root(),
            sqlite_bin: default_sqlite_bin(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Read a configuration file, returning `None` when it does not exist
pub async fn read_config(config_path: &Path) -> Result<Option<UpgradeConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: UpgradeConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}
