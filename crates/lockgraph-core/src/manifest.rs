//! Workspace project manifests (`package.json`).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` lockgraph needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Path to the manifest of the importer `importer_id` under `workspace_root`.
pub fn manifest_path(workspace_root: &Path, importer_id: &str) -> PathBuf {
    workspace_root.join(importer_id).join(MANIFEST_FILE)
}

impl Manifest {
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ManifestRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read the manifest for the importer `importer_id`.
    pub fn load(workspace_root: &Path, importer_id: &str) -> Result<Self> {
        let path = manifest_path(workspace_root, importer_id);
        let json = fs::read_to_string(&path).map_err(|e| Error::ManifestRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_with_version() {
        let m = Manifest::from_json(
            r#"{"name": "@acme/web", "version": "2.1.0", "private": true}"#,
            Path::new("package.json"),
        )
        .unwrap();
        assert_eq!(m.name, "@acme/web");
        assert_eq!(m.version.as_deref(), Some("2.1.0"));
    }

    #[test]
    fn test_manifest_without_version() {
        let m = Manifest::from_json(r#"{"name": "tools"}"#, Path::new("package.json")).unwrap();
        assert!(m.version.is_none());
    }

    #[test]
    fn test_manifest_without_name_rejected() {
        let err = Manifest::from_json(r#"{"version": "1.0.0"}"#, Path::new("package.json"))
            .unwrap_err();
        assert!(matches!(err, Error::ManifestRead { .. }));
    }

    #[test]
    fn test_load_missing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Manifest::load(tmp.path(), "packages/missing").unwrap_err();
        match err {
            Error::ManifestRead { path, .. } => {
                assert!(path.ends_with("packages/missing/package.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_root_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("package.json"),
            r#"{"name": "root", "version": "1.0.0"}"#,
        )
        .unwrap();
        let m = Manifest::load(tmp.path(), ".").unwrap();
        assert_eq!(m.name, "root");
    }
}
