//! Types for upgrade runs.

use crate::config::FailurePolicy;
use crate::executor::ExecutionOutcome;
use crate::manifest::ManifestError;
use crate::selector::RangeCheck;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Error types for upgrade runs. Script failures are not errors; see `UpgradeReport`.
#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error("Manifest error: {0}")]
    ManifestError(#[from] ManifestError),
}

/// Input to one upgrade run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    /// Branch whose scripts are honored; all other branches are skipped.
    pub branch: String,
    pub src_version: String,
    pub dst_version: String,
    /// Resource the scripts act on, typically a sqlite database file.
    pub target: PathBuf,
}

impl UpgradeRequest {
    pub fn new(
        branch: impl Into<String>,
        src_version: impl Into<String>,
        dst_version: impl Into<String>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            branch: branch.into(),
            src_version: src_version.into(),
            dst_version: dst_version.into(),
            target: target.into(),
        }
    }
}

/// A script outcome tagged with the version that scheduled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOutcome {
    pub version: String,
    #[serde(flatten)]
    pub outcome: ExecutionOutcome,
}

/// A manifest version that was not executed because of the range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedVersion {
    pub version: String,
    pub reason: RangeCheck,
}

/// Everything that happened during a run that got past manifest loading.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeReport {
    pub run_id: Uuid,
    pub branch: String,
    pub src_version: String,
    pub dst_version: String,
    pub policy: FailurePolicy,
    pub started_at: String,
    pub finished_at: String,
    /// Every manifest version, in the order they were considered.
    pub candidates: Vec<String>,
    pub skipped_out_of_range: Vec<SkippedVersion>,
    /// Outcomes in execution order.
    pub outcomes: Vec<ScriptOutcome>,
    /// True when a strict run stopped at a failed script.
    pub halted: bool,
}

impl UpgradeReport {
    /// Run-level result.
    ///
    /// Under `FailurePolicy::Continue` a run that loaded its manifest always
    /// succeeds, whatever its scripts did. Under `Strict` every script must
    /// have succeeded.
    pub fn success(&self) -> bool {
        match self.policy {
            FailurePolicy::Continue => true,
            FailurePolicy::Strict => !self.halted && self.outcomes.iter().all(|o| o.outcome.succeeded),
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &ScriptOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.succeeded)
    }

    /// Versions that had at least one script attempted.
    pub fn executed_versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.outcomes.iter().map(|o| o.version.as_str()).collect();
        versions.dedup();
        versions
    }
}
