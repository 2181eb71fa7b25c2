//! Package dependency graph model.

use serde::{Deserialize, Serialize};

/// A package node: either a workspace project or an externally resolved package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Unique key. Workspace-relative path for in-repo packages, the raw snapshot
    /// key (`name@version(peers)`) for external ones.
    pub id: String,
    pub name: String,
    /// Absent only for workspace projects whose manifest declares no version.
    pub version: Option<String>,
    pub is_in_repo: bool,
}

impl Package {
    pub fn in_repo(id: impl Into<String>, name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version,
            is_in_repo: true,
        }
    }

    pub fn external(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: Some(version.into()),
            is_in_repo: false,
        }
    }
}

/// A directed "depends on" edge between two package ids.
///
/// Parallel edges are allowed; prod/dev distinctions are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: String,
    pub to: String,
}

impl Dependency {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// The full set of packages and dependency edges produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGraph {
    pub packages: Vec<Package>,
    pub dependencies: Vec<Dependency>,
}

/// Aggregate counts for a [`PackageGraph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub in_repo_packages: usize,
    pub external_packages: usize,
    pub dependencies: usize,
}

impl PackageGraph {
    pub fn summary(&self) -> GraphSummary {
        let in_repo_packages = self.packages.iter().filter(|p| p.is_in_repo).count();
        GraphSummary {
            in_repo_packages,
            external_packages: self.packages.len() - in_repo_packages,
            dependencies: self.dependencies.len(),
        }
    }

    /// Look up a package by id.
    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.id == id)
    }
}
