//! Types for script execution.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptKindError {
    #[error("Unsupported script kind: {0}")]
    Unsupported(String),
}

/// Supported script kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// SQL batch file, fed to the database client.
    Sql,
    /// Standalone executable, run without arguments.
    Sh,
}

impl ScriptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptKind::Sql => "sql",
            ScriptKind::Sh => "sh",
        }
    }
}

impl FromStr for ScriptKind {
    type Err = ScriptKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(ScriptKind::Sql),
            "sh" => Ok(ScriptKind::Sh),
            other => Err(ScriptKindError::Unsupported(other.to_string())),
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a single script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    /// Kind as written in the manifest.
    pub script_kind: String,
    /// Script path after resolution against the script root.
    pub script_path: PathBuf,
    pub succeeded: bool,
    /// Exit status, `None` when the process never ran or was killed by a signal.
    pub exit_code: Option<i32>,
    pub captured_stdout: String,
    pub captured_stderr: String,
}

impl ExecutionOutcome {
    /// Outcome of a finished process.
    pub fn from_output(script_kind: &str, script_path: PathBuf, output: &Output) -> Self {
        Self {
            script_kind: script_kind.to_string(),
            script_path,
            succeeded: output.status.success(),
            exit_code: output.status.code(),
            captured_stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            captured_stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Outcome of a script that could not be started.
    pub fn not_started(script_kind: &str, script_path: PathBuf, reason: String) -> Self {
        Self {
            script_kind: script_kind.to_string(),
            script_path,
            succeeded: false,
            exit_code: None,
            captured_stdout: String::new(),
            captured_stderr: reason,
        }
    }
}

/// Runs one manifest script against the target resource.
///
/// Implementations never fail: every problem is reported through the
/// returned outcome.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn execute(&self, script_kind: &str, file_name: &str, target: &Path) -> ExecutionOutcome;
}
