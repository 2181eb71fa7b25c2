//! Errors from the database phase of a run.

/// Failures while connecting to, writing to, or indexing the graph database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    Config(String),
    #[error("failed to connect to {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: neo4rs::Error,
    },
    #[error("{statement} failed: {source}")]
    Statement {
        statement: &'static str,
        #[source]
        source: neo4rs::Error,
    },
    #[error("could not read result of {statement}: {reason}")]
    Decode {
        statement: &'static str,
        reason: String,
    },
    #[error(
        "{missing} of {requested} dependency edges reference packages that do not exist; transaction rolled back"
    )]
    DanglingEdges { requested: usize, missing: usize },
    #[error("store connection is already closed")]
    Closed,
}
