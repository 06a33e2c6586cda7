mod types;

pub use types::{Manifest, ScriptSet, VersionEntry};

use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest not found at {0}")]
    NotFound(String),

    #[error("Failed to read manifest: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl ManifestError {
    /// True when the manifest could not be reached at all (as opposed to malformed).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ManifestError::NotFound(_) | ManifestError::ReadError(_))
    }
}

/// Parse manifest content. Invalid UTF-8 is a parse error.
pub fn parse_manifest(content: impl AsRef<[u8]>) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_slice(content.as_ref())?)
}

/// Read and decode the manifest at `manifest_path`.
///
/// A missing file is an error here, unlike an empty `{}` document which
/// decodes to a manifest with no versions.
pub async fn load_manifest(manifest_path: &Path) -> Result<Manifest, ManifestError> {
    if !manifest_path.exists() {
        return Err(ManifestError::NotFound(manifest_path.display().to_string()));
    }

    let content = fs::read(manifest_path).await?;
    let manifest = parse_manifest(&content)?;
    debug!(path = %manifest_path.display(), versions = manifest.len(), "Loaded manifest");
    Ok(manifest)
}
