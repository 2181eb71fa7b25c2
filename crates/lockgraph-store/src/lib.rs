//! Persist a [`lockgraph_core::graph::PackageGraph`] into a graph database.
//!
//! [`store::GraphStore`] is the seam between the load sequence in [`loader`] and a
//! concrete backend: [`neo4j::Neo4jStore`] for a live database, or
//! [`memory::MemoryStore`] for tests and dry runs.

pub mod config;
pub mod error;
pub mod loader;
pub mod memory;
pub mod neo4j;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use loader::{LogReporter, Phase, PhaseReporter, load};
pub use store::{GraphStore, LoadSummary};
