//! In-memory [`GraphStore`] with the same all-or-nothing write contract as the
//! database backend.

use crate::error::StoreError;
use crate::store::{GraphStore, LoadSummary, PACKAGE_INDEXES};
use lockgraph_core::graph::{Dependency, Package, PackageGraph};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
pub struct MemoryStore {
    nodes: BTreeMap<String, Package>,
    edges: Vec<Dependency>,
    indexes: BTreeSet<String>,
    close_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `graph`, as left behind by an earlier run.
    pub fn with_graph(graph: &PackageGraph) -> Self {
        Self {
            nodes: graph
                .packages
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            edges: graph.dependencies.clone(),
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Package> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&Package> {
        self.nodes.get(id)
    }

    pub fn edges(&self) -> &[Dependency] {
        &self.edges
    }

    pub fn indexes(&self) -> &BTreeSet<String> {
        &self.indexes
    }

    pub fn is_closed(&self) -> bool {
        self.close_calls > 0
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }
}

impl GraphStore for MemoryStore {
    async fn replace_graph(&mut self, graph: &PackageGraph) -> Result<LoadSummary, StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }

        // Stage everything; only swap in once every edge has both endpoints.
        let nodes: BTreeMap<String, Package> = graph
            .packages
            .iter()
            .map(|p| (p.id.clone(), p.clone()))
            .collect();
        let missing = graph
            .dependencies
            .iter()
            .filter(|d| !nodes.contains_key(&d.from) || !nodes.contains_key(&d.to))
            .count();
        if missing > 0 {
            return Err(StoreError::DanglingEdges {
                requested: graph.dependencies.len(),
                missing,
            });
        }

        self.nodes = nodes;
        self.edges = graph.dependencies.clone();
        Ok(LoadSummary {
            packages: graph.packages.len(),
            dependencies: graph.dependencies.len(),
        })
    }

    async fn ensure_indexes(&mut self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        for (name, _) in PACKAGE_INDEXES {
            self.indexes.insert(name.to_string());
        }
        Ok(())
    }

    async fn close(&mut self) {
        self.close_calls += 1;
    }
}
