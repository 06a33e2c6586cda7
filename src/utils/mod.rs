use std::path::{Path, PathBuf};

/// The default upgrade folder, relative to the working directory
pub const UPGRADE_FOLDER: &str = "upgrade";

/// The name of the version manifest inside the upgrade folder
pub const MANIFEST_FILE: &str = "version.json";

/// The name of the script folder inside the upgrade folder
pub const SCRIPT_FOLDER: &str = "script";

/// Default database command-line client used for `sql` scripts
pub const DEFAULT_SQLITE_BIN: &str = "sqlite3";

/// Get the path to the manifest file
pub fn get_manifest_path(upgrade_dir: &Path) -> PathBuf {
    upgrade_dir.join(MANIFEST_FILE)
}

/// Get the path to the script folder
pub fn get_script_root(upgrade_dir: &Path) -> PathBuf {
    upgrade_dir.join(SCRIPT_FOLDER)
}

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}
