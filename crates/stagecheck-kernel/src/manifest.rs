//! The artifact tree's dependency manifest (`package.json`).
//!
//! Built once per run, before any rule, and handed to the resolver and the
//! manifest rules explicitly.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::RuleError;
use crate::scanner::SourceTree;

/// Manifest location relative to the artifact root.
pub const MANIFEST_PATH: &str = "package.json";

/// The fields of `package.json` the validator reads.
///
/// Version values are kept as raw JSON; only the keys matter here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, Value>,
    #[serde(default)]
    pub scripts: BTreeMap<String, Value>,
}

impl PackageManifest {
    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        serde_json::from_str(text).map_err(|e| RuleError::Manifest {
            path: MANIFEST_PATH.to_string(),
            reason: e.to_string(),
        })
    }

    /// Load the manifest from a scanned tree.
    ///
    /// `Ok(None)` when the tree has no manifest.
    pub fn from_tree(tree: &SourceTree) -> Result<Option<Self>, RuleError> {
        let Some(file) = tree.get(MANIFEST_PATH) else {
            return Ok(None);
        };
        Self::parse(file.text()?).map(Some)
    }

    /// Whether `package` is installed as any kind of dependency.
    pub fn has_package(&self, package: &str) -> bool {
        self.dependencies.contains_key(package)
            || self.dev_dependencies.contains_key(package)
            || self.peer_dependencies.contains_key(package)
    }

    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.contains_key(script)
    }
}
