#![allow(dead_code)]

use incre_upgrade::UpgradeConfig;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// An upgrade folder (`version.json` + `script/`) in a temp dir, with a fake
/// sqlite client and shell scripts that append to a shared log.
pub struct UpgradeFixture {
    dir: TempDir,
}

impl UpgradeFixture {
    pub fn new(manifest: &str) -> Self {
        let dir = create_test_dir();
        let fixture = Self { dir };
        std::fs::create_dir_all(fixture.script_root()).expect("Failed to create script dir");
        std::fs::write(fixture.upgrade_dir().join("version.json"), manifest)
            .expect("Failed to write manifest");
        fixture.write_executable(
            &fixture.sqlite_bin(),
            &format!(
                "#!/bin/sh\necho \"sql $1 $2\" >> '{}'\n",
                fixture.log_path().display()
            ),
        );
        fixture
    }

    /// A fixture whose upgrade folder has no manifest.
    pub fn without_manifest() -> Self {
        let fixture = Self::new("{}");
        std::fs::remove_file(fixture.upgrade_dir().join("version.json"))
            .expect("Failed to remove manifest");
        fixture
    }

    pub fn upgrade_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn script_root(&self) -> PathBuf {
        self.dir.path().join("script")
    }

    pub fn sqlite_bin(&self) -> PathBuf {
        self.dir.path().join("fake-sqlite3")
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("run.log")
    }

    pub fn target(&self) -> PathBuf {
        self.dir.path().join("app.db")
    }

    pub fn config(&self) -> UpgradeConfig {
        let mut config = UpgradeConfig::from_upgrade_dir(self.upgrade_dir());
        config.sqlite_bin = self.sqlite_bin().display().to_string();
        config
    }

    /// Shell script that logs `sh <name>` and exits with `exit_code`.
    pub fn add_shell_script(&self, name: &str, exit_code: i32) {
        self.write_executable(
            &self.script_root().join(name),
            &format!(
                "#!/bin/sh\necho \"sh {name}\" >> '{}'\necho '{name} exited {exit_code}' >&2\nexit {exit_code}\n",
                self.log_path().display()
            ),
        );
    }

    pub fn add_sql_script(&self, name: &str, sql: &str) {
        std::fs::write(self.script_root().join(name), sql).expect("Failed to write sql script");
    }

    pub fn write_executable(&self, path: &Path, body: &str) {
        std::fs::write(path, body).expect("Failed to write script");
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod script");
    }

    pub fn log(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
