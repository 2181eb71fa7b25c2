//! Backend-independent contract for writing a package graph.

use crate::error::StoreError;
use lockgraph_core::graph::PackageGraph;
use std::future::Future;

/// Node label for packages.
pub const PACKAGE_LABEL: &str = "Package";
/// Relationship type for dependency edges.
pub const DEPENDS_ON: &str = "DEPENDS_ON";
/// Lookup indexes ensured on the package label, as (index name, property).
pub const PACKAGE_INDEXES: [(&str, &str); 2] = [
    ("package_is_in_repo", "isInRepo"),
    ("package_name", "name"),
];

/// What a successful write put into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub packages: usize,
    pub dependencies: usize,
}

/// A graph database session owned by a single run.
pub trait GraphStore {
    /// In one write transaction: delete every package node and its
    /// relationships, upsert one node per package keyed by id, then create one
    /// `DEPENDS_ON` relationship per dependency. Nothing is committed unless
    /// every step succeeds, including every edge finding both endpoints.
    fn replace_graph(
        &mut self,
        graph: &PackageGraph,
    ) -> impl Future<Output = Result<LoadSummary, StoreError>> + Send;

    /// Create the package lookup indexes if they do not exist yet.
    fn ensure_indexes(&mut self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Release the session and underlying connection. Idempotent.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

impl<S: GraphStore> GraphStore for &mut S {
    fn replace_graph(
        &mut self,
        graph: &PackageGraph,
    ) -> impl Future<Output = Result<LoadSummary, StoreError>> + Send {
        (**self).replace_graph(graph)
    }

    fn ensure_indexes(&mut self) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).ensure_indexes()
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        (**self).close()
    }
}
