//! Incremental upgrade orchestration.
//!
//! A run loads the manifest, walks every version key in ascending
//! (lexicographic) order, skips versions outside `[src, dst]`, and executes
//! the configured branch's scripts for the rest.
//!
//! # Usage
//!
//! ```ignore
//! let engine = UpgradeEngine::new(UpgradeConfig::from_upgrade_dir(Path::new("./upgrade")));
//! let ok = engine.incre_upgrade("standard", "V1.0.0", "V1.2.0", "/var/lib/app/app.db").await;
//! ```

mod types;

pub use types::{ScriptOutcome, SkippedVersion, UpgradeError, UpgradeReport, UpgradeRequest};

use crate::config::{FailurePolicy, UpgradeConfig};
use crate::executor::{ProcessRunner, ScriptRunner};
use crate::manifest::load_manifest;
use crate::selector::{check_range, resolve_scripts_for_version, select_versions, RangeCheck};
use crate::utils::now_iso;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs incremental upgrades against a target resource.
pub struct UpgradeEngine {
    config: UpgradeConfig,
    runner: Arc<dyn ScriptRunner>,
}

impl UpgradeEngine {
    /// Create an engine that runs scripts as child processes.
    pub fn new(config: UpgradeConfig) -> Self {
        let runner = Arc::new(ProcessRunner::from_config(&config));
        Self { config, runner }
    }

    /// Create an engine with a custom script runner.
    pub fn with_runner(config: UpgradeConfig, runner: Arc<dyn ScriptRunner>) -> Self {
        Self { config, runner }
    }

    /// Upgrade `target` from `src_version` to `dst_version` on `branch`.
    ///
    /// Returns false only if the manifest could not be loaded, or, under the
    /// strict policy, if a script failed. Use [`UpgradeEngine::run`] for the
    /// per-script outcomes.
    pub async fn incre_upgrade(
        &self,
        branch: &str,
        src_version: &str,
        dst_version: &str,
        target: impl AsRef<Path>,
    ) -> bool {
        let request = UpgradeRequest::new(branch, src_version, dst_version, target.as_ref());
        match self.run(&request).await {
            Ok(report) => report.success(),
            Err(_) => false,
        }
    }

    /// Execute one upgrade run and report every outcome.
    pub async fn run(&self, request: &UpgradeRequest) -> Result<UpgradeReport, UpgradeError> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "upgrade",
            run_id = %run_id,
            branch = %request.branch,
            from = %request.src_version,
            to = %request.dst_version
        );
        self.run_inner(run_id, request).instrument(span).await
    }

    async fn run_inner(
        &self,
        run_id: Uuid,
        request: &UpgradeRequest,
    ) -> Result<UpgradeReport, UpgradeError> {
        let started_at = now_iso();
        let mut phase = RunPhase::Idle;

        transition(&mut phase, RunPhase::ManifestLoading);
        let manifest = match load_manifest(&self.config.manifest_path).await {
            Ok(manifest) => manifest,
            Err(e) => {
                transition(&mut phase, RunPhase::LoadFailed);
                error!(
                    path = %self.config.manifest_path.display(),
                    error = %e,
                    "Failed to load upgrade manifest"
                );
                return Err(e.into());
            }
        };

        transition(&mut phase, RunPhase::Selecting);
        let candidates = select_versions(&manifest);
        if request.src_version > request.dst_version {
            warn!("Source version is newer than destination version, nothing will run");
        }

        transition(&mut phase, RunPhase::Executing);
        let mut skipped_out_of_range = Vec::new();
        let mut outcomes = Vec::new();
        let mut halted = false;

        'versions: for version in &candidates {
            let range = check_range(version, &request.src_version, &request.dst_version);
            if range != RangeCheck::InRange {
                debug!(version = %version, reason = ?range, "Version out of range, skipping");
                skipped_out_of_range.push(SkippedVersion {
                    version: version.clone(),
                    reason: range,
                });
                continue;
            }

            let scripts = resolve_scripts_for_version(&manifest, version, &request.branch);
            if scripts.is_empty() {
                debug!(version = %version, "No scripts for branch");
                continue;
            }

            for script in scripts {
                info!(version = %version, kind = %script.kind, script = %script.file_name, "Executing upgrade script");

                let outcome = self
                    .runner
                    .execute(&script.kind, &script.file_name, &request.target)
                    .await;
                let succeeded = outcome.succeeded;
                if !succeeded {
                    error!(
                        version = %version,
                        script = %script.file_name,
                        stderr = %outcome.captured_stderr.trim_end(),
                        "Upgrade script failed"
                    );
                }

                outcomes.push(ScriptOutcome {
                    version: version.clone(),
                    outcome,
                });

                if !succeeded && self.config.failure_policy == FailurePolicy::Strict {
                    warn!("Strict failure policy, halting upgrade");
                    halted = true;
                    break 'versions;
                }
            }
        }

        transition(&mut phase, RunPhase::Done);

        let report = UpgradeReport {
            run_id,
            branch: request.branch.clone(),
            src_version: request.src_version.clone(),
            dst_version: request.dst_version.clone(),
            policy: self.config.failure_policy,
            started_at,
            finished_at: now_iso(),
            candidates,
            skipped_out_of_range,
            outcomes,
            halted,
        };

        info!(
            executed = report.outcomes.len(),
            failed = report.failed().count(),
            skipped = report.skipped_out_of_range.len(),
            success = report.success(),
            "Upgrade finished"
        );

        Ok(report)
    }
}

/// Lifecycle of a run, logged at debug level. A `LoadFailed` run ends with
/// `Err`; every other run ends in `Done` with a report.
#[derive(Debug, Clone, Copy)]
enum RunPhase {
    Idle,
    ManifestLoading,
    LoadFailed,
    Selecting,
    Executing,
    Done,
}

fn transition(phase: &mut RunPhase, next: RunPhase) {
    debug!(from = ?*phase, to = ?next, "Upgrade phase");
    *phase = next;
}
