//! Version range selection over a loaded manifest.
//!
//! All comparisons are plain byte-wise string ordering, not semantic
//! versioning: `"10.0.0" < "2.0.0"`. Manifests must use fixed-width version
//! components (e.g. `V1.0.0_20211111`, zero-padded numbers) for the order to
//! match release order.

mod types;

pub use types::{RangeCheck, ScriptEntry};

use crate::manifest::Manifest;

/// All version keys of the manifest, sorted ascending.
pub fn select_versions(manifest: &Manifest) -> Vec<String> {
    let mut versions: Vec<String> = manifest.versions.keys().cloned().collect();
    versions.sort();
    versions
}

/// Scripts defined for `version` on `branch`.
///
/// A missing version or branch yields an empty list; branches commonly do
/// not define every version.
pub fn resolve_scripts_for_version(
    manifest: &Manifest,
    version: &str,
    branch: &str,
) -> Vec<ScriptEntry> {
    manifest
        .get(version)
        .and_then(|entry| entry.branch(branch))
        .map(|set| {
            set.iter()
                .map(|(kind, file_name)| ScriptEntry::new(kind, file_name))
                .collect()
        })
        .unwrap_or_default()
}

/// Check `version` against the inclusive range `[src_version, dst_version]`.
pub fn check_range(version: &str, src_version: &str, dst_version: &str) -> RangeCheck {
    if version < src_version {
        RangeCheck::BelowSource
    } else if version > dst_version {
        RangeCheck::AboveDestination
    } else {
        RangeCheck::InRange
    }
}
