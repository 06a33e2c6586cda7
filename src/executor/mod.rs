//! Script execution for upgrade runs.
//!
//! `sql` scripts are run through the sqlite command-line client as
//! `<sqlite_bin> <target> '.read "<script>"'`; `sh` scripts are executed
//! directly. Output is captured, never streamed.

mod types;

pub use types::{ExecutionOutcome, ScriptKind, ScriptKindError, ScriptRunner};

use crate::config::UpgradeConfig;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs scripts as child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    script_root: PathBuf,
    sqlite_bin: String,
}

impl ProcessRunner {
    pub fn new(script_root: impl Into<PathBuf>, sqlite_bin: impl Into<String>) -> Self {
        Self {
            script_root: script_root.into(),
            sqlite_bin: sqlite_bin.into(),
        }
    }

    pub fn from_config(config: &UpgradeConfig) -> Self {
        Self::new(config.script_root.clone(), config.sqlite_bin.clone())
    }

    /// Resolve a manifest file name against the script root.
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.script_root.join(file_name)
    }

    fn build_command(&self, kind: ScriptKind, script_path: &Path, target: &Path) -> Command {
        let mut cmd = match kind {
            ScriptKind::Sql => {
                let mut cmd = Command::new(&self.sqlite_bin);
                cmd.arg(target).arg(read_command(script_path));
                cmd
            }
            ScriptKind::Sh => Command::new(script_path),
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// sqlite dot-command reading `script_path`.
///
/// Double-quoted dot-command arguments take backslash escapes; single-quoted
/// ones take none, so a `'` in the path could not be expressed there.
fn read_command(script_path: &Path) -> String {
    let mut quoted = String::new();
    for c in script_path.display().to_string().chars() {
        if c == '\\' || c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!(".read \"{quoted}\"")
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn execute(&self, script_kind: &str, file_name: &str, target: &Path) -> ExecutionOutcome {
        let script_path = self.resolve(file_name);

        let kind: ScriptKind = match script_kind.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(kind = %script_kind, script = %script_path.display(), "Unsupported script kind");
                return ExecutionOutcome::not_started(script_kind, script_path, e.to_string());
            }
        };

        debug!(kind = %kind, script = %script_path.display(), target = %target.display(), "Running script");

        let output = match self.build_command(kind, &script_path, target).output().await {
            Ok(output) => output,
            Err(e) => {
                let program = match kind {
                    ScriptKind::Sql => self.sqlite_bin.clone(),
                    ScriptKind::Sh => script_path.display().to_string(),
                };
                warn!(script = %script_path.display(), error = %e, "Failed to launch script");
                return ExecutionOutcome::not_started(
                    script_kind,
                    script_path,
                    format!("failed to spawn '{program}': {e}"),
                );
            }
        };

        let outcome = ExecutionOutcome::from_output(script_kind, script_path, &output);
        if !outcome.succeeded {
            warn!(
                script = %outcome.script_path.display(),
                exit_code = ?outcome.exit_code,
                stderr = %outcome.captured_stderr.trim_end(),
                "Script failed"
            );
        }
        outcome
    }
}
