//! Connection settings for the target graph database.

use crate::error::StoreError;
use std::fmt;

pub const DEFAULT_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_USERNAME: &str = "neo4j";
pub const DEFAULT_PASSWORD: &str = "neo4j";
pub const DEFAULT_DATABASE: &str = "neo4j";
/// Rows sent per `UNWIND` statement.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Where and how to connect, plus write batching.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub batch_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.uri.trim().is_empty() {
            return Err(StoreError::Config("uri must not be empty".to_string()));
        }
        if !self.uri.contains("://") {
            return Err(StoreError::Config(format!(
                "uri {:?} has no scheme (expected e.g. bolt://host:7687)",
                self.uri
            )));
        }
        if self.database.trim().is_empty() {
            return Err(StoreError::Config(
                "database name must not be empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(StoreError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
