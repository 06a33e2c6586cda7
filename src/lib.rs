pub mod config;
pub mod executor;
pub mod manifest;
pub mod selector;
pub mod upgrade;
pub mod utils;

// Re-export commonly used types
pub use config::{read_config, ConfigError, FailurePolicy, UpgradeConfig};
pub use executor::{ExecutionOutcome, ProcessRunner, ScriptKind, ScriptKindError, ScriptRunner};
pub use manifest::{load_manifest, parse_manifest, Manifest, ManifestError, ScriptSet, VersionEntry};
pub use selector::{check_range, resolve_scripts_for_version, select_versions, RangeCheck, ScriptEntry};
pub use upgrade::{
    ScriptOutcome, SkippedVersion, UpgradeEngine, UpgradeError, UpgradeReport, UpgradeRequest,
};
