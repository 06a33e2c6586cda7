//! Types for version range selection.

use serde::Serialize;

/// One script scheduled for a version on the configured branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    /// Raw script kind from the manifest (`sql`, `sh`, or anything else).
    pub kind: String,
    /// File name relative to the script root.
    pub file_name: String,
}

impl ScriptEntry {
    pub fn new(kind: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            file_name: file_name.into(),
        }
    }
}

/// Where a version falls relative to the `[src, dst]` upgrade range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeCheck {
    /// Older than the source version; already applied.
    BelowSource,
    InRange,
    /// Newer than the destination version.
    AboveDestination,
}
