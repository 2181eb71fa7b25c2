//! Errors raised while loading a lockfile and building the package graph.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run before any database interaction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read lockfile {}: {source}", path.display())]
    LockfileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lockfile {} does not match the expected schema: {source}", path.display())]
    SchemaValidation {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to read manifest {}: {reason}", path.display())]
    ManifestRead { path: PathBuf, reason: String },
    #[error("malformed snapshot id: {0:?} (expected name@version)")]
    MalformedSnapshotId(String),
    #[error("unsupported specifier {specifier:?} for dependency {name:?} of {from:?}")]
    UnsupportedSpecifier {
        from: String,
        name: String,
        specifier: String,
    },
}
