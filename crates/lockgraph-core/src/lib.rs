//! Core types for lockgraph: turn a pnpm lockfile into a package dependency graph.
//!
//! Provides the lockfile schema ([`lockfile::Lockfile`]), workspace manifest reading,
//! the package/dependency model ([`graph::PackageGraph`]), dependency-reference
//! resolution, and the builder that ties them together.

pub mod builder;
pub mod error;
pub mod graph;
pub mod lockfile;
pub mod manifest;
pub mod resolve;

pub use error::{Error, Result};
