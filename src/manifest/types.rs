use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Version manifest: release version -> per-branch script sets.
///
/// Decodes from `{ version: { branch: { kind: file_name } } }`. Any other
/// shape is rejected at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub versions: HashMap<String, VersionEntry>,
}

impl Manifest {
    pub fn get(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.get(version)
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }
}

/// All upgrade actions defined for one release version, keyed by branch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionEntry {
    pub branches: HashMap<String, ScriptSet>,
}

impl VersionEntry {
    pub fn branch(&self, branch: &str) -> Option<&ScriptSet> {
        self.branches.get(branch)
    }
}

/// Script kind -> script file name, relative to the script root.
///
/// Kinds are kept as raw strings here; unsupported kinds surface as failed
/// outcomes when executed. Iteration is ordered by kind name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptSet {
    pub scripts: BTreeMap<String, String>,
}

impl ScriptSet {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scripts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
