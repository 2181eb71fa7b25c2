//! Build the package graph from a validated lockfile and its workspace manifests.

use crate::error::Result;
use crate::graph::{Dependency, Package, PackageGraph};
use crate::lockfile::Lockfile;
use crate::manifest::Manifest;
use crate::resolve::{SnapshotId, resolve};
use std::path::Path;
use tracing::{debug, info};

/// Produce every package and dependency edge described by `lockfile`.
///
/// Importers come first (in key order), then snapshots. Each importer's manifest
/// is read from `<workspace_root>/<importer id>/package.json`.
pub fn build(lockfile: &Lockfile, workspace_root: &Path) -> Result<PackageGraph> {
    let mut graph = PackageGraph::default();

    for (id, importer) in &lockfile.importers {
        let manifest = Manifest::load(workspace_root, id)?;
        debug!(importer = %id, name = %manifest.name, "adding workspace package");
        graph
            .packages
            .push(Package::in_repo(id, manifest.name, manifest.version));

        for (name, dep) in importer.all_dependencies() {
            let to = resolve(id, name, &dep.version)?;
            graph.dependencies.push(Dependency::new(id, to));
        }
    }

    for (id, snapshot) in &lockfile.snapshots {
        let parsed = SnapshotId::parse(id)?;
        graph
            .packages
            .push(Package::external(id, parsed.name, parsed.version));

        for (name, version) in &snapshot.dependencies {
            let to = resolve(id, name, version)?;
            graph.dependencies.push(Dependency::new(id, to));
        }
    }

    let summary = graph.summary();
    info!(
        in_repo = summary.in_repo_packages,
        external = summary.external_packages,
        dependencies = summary.dependencies,
        "package graph built"
    );
    Ok(graph)
}

/// Load the lockfile at `path` and build its graph; manifests are resolved
/// relative to the lockfile's directory.
pub fn build_from_path(path: &Path) -> Result<PackageGraph> {
    let lockfile = Lockfile::load(path)?;
    let workspace_root = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    build(&lockfile, workspace_root)
}
