//! Neo4j backend over the Bolt protocol.
//!
//! Writes use `UNWIND` batches inside a single explicit transaction; index
//! creation runs afterwards in auto-commit mode.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::{DEPENDS_ON, GraphStore, LoadSummary, PACKAGE_INDEXES, PACKAGE_LABEL};
use lockgraph_core::graph::{Dependency, Package, PackageGraph};
use neo4rs::{BoltNull, BoltType, ConfigBuilder, Graph, Txn, query};
use std::collections::HashMap;
use tracing::{debug, info, warn};

const PING: &str = "RETURN 1";

fn clear_packages() -> String {
    format!("MATCH (p:{PACKAGE_LABEL}) DETACH DELETE p")
}

fn upsert_packages() -> String {
    format!(
        "UNWIND $packages AS pkg
     MERGE (p:{PACKAGE_LABEL} {{id: pkg.id}})
     SET p.name = pkg.name,
         p.version = pkg.version,
         p.isInRepo = pkg.isInRepo"
    )
}

fn create_dependencies() -> String {
    format!(
        "UNWIND $dependencies AS dep
     MATCH (from:{PACKAGE_LABEL} {{id: dep.from}})
     MATCH (to:{PACKAGE_LABEL} {{id: dep.to}})
     CREATE (from)-[:{DEPENDS_ON}]->(to)
     RETURN count(*) AS created"
    )
}

fn create_indexes() -> impl Iterator<Item = String> {
    PACKAGE_INDEXES.into_iter().map(|(name, property)| {
        format!("CREATE INDEX {name} IF NOT EXISTS FOR (p:{PACKAGE_LABEL}) ON (p.{property})")
    })
}

type BoltRow = HashMap<String, BoltType>;

fn package_row(pkg: &Package) -> BoltRow {
    let mut row: BoltRow = HashMap::new();
    row.insert("id".to_string(), pkg.id.clone().into());
    row.insert("name".to_string(), pkg.name.clone().into());
    row.insert(
        "version".to_string(),
        match &pkg.version {
            Some(v) => v.clone().into(),
            None => BoltType::Null(BoltNull),
        },
    );
    row.insert("isInRepo".to_string(), pkg.is_in_repo.into());
    row
}

fn dependency_row(dep: &Dependency) -> BoltRow {
    let mut row: BoltRow = HashMap::new();
    row.insert("from".to_string(), dep.from.clone().into());
    row.insert("to".to_string(), dep.to.clone().into());
    row
}

fn statement_error(statement: &'static str) -> impl Fn(neo4rs::Error) -> StoreError {
    move |source| StoreError::Statement { statement, source }
}

/// A live session against one Neo4j database.
pub struct Neo4jStore {
    graph: Option<Graph>,
    uri: String,
    batch_size: usize,
}

impl Neo4jStore {
    /// Open a connection and verify it with a trivial query, so bad endpoints or
    /// credentials fail here rather than mid-write.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let connection_error = |source: neo4rs::Error| StoreError::Connection {
            uri: config.uri.clone(),
            source,
        };

        let neo_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()
            .map_err(connection_error)?;
        let graph = Graph::connect(neo_config)
            .await
            .map_err(connection_error)?;
        graph.run(query(PING)).await.map_err(connection_error)?;

        info!(uri = %config.uri, database = %config.database, "connected to graph database");
        Ok(Self {
            graph: Some(graph),
            uri: config.uri.clone(),
            batch_size: config.batch_size,
        })
    }

    fn session(&self) -> Result<&Graph, StoreError> {
        self.graph.as_ref().ok_or(StoreError::Closed)
    }
}

async fn write_graph(
    txn: &mut Txn,
    graph: &PackageGraph,
    batch_size: usize,
) -> Result<LoadSummary, StoreError> {
    txn.run(query(&clear_packages()))
        .await
        .map_err(statement_error("clear packages"))?;
    debug!("cleared existing package nodes");

    let packages: Vec<BoltRow> = graph.packages.iter().map(package_row).collect();
    let upsert = upsert_packages();
    for chunk in packages.chunks(batch_size) {
        txn.run(query(&upsert).param("packages", chunk.to_vec()))
            .await
            .map_err(statement_error("upsert packages"))?;
    }
    debug!(count = packages.len(), "upserted package nodes");

    let dependencies: Vec<BoltRow> = graph.dependencies.iter().map(dependency_row).collect();
    let create = create_dependencies();
    let mut created = 0usize;
    for chunk in dependencies.chunks(batch_size) {
        let mut rows = txn
            .execute(query(&create).param("dependencies", chunk.to_vec()))
            .await
            .map_err(statement_error("create dependencies"))?;
        while let Some(row) = rows
            .next(txn.handle())
            .await
            .map_err(statement_error("create dependencies"))?
        {
            let count: i64 = row.get("created").map_err(|e| StoreError::Decode {
                statement: "create dependencies",
                reason: e.to_string(),
            })?;
            created += usize::try_from(count).unwrap_or(0);
        }
    }
    if created < dependencies.len() {
        return Err(StoreError::DanglingEdges {
            requested: dependencies.len(),
            missing: dependencies.len() - created,
        });
    }
    debug!(count = created, "created dependency relationships");

    Ok(LoadSummary {
        packages: packages.len(),
        dependencies: created,
    })
}

impl GraphStore for Neo4jStore {
    async fn replace_graph(&mut self, graph: &PackageGraph) -> Result<LoadSummary, StoreError> {
        let session = self.session()?;
        let mut txn = session
            .start_txn()
            .await
            .map_err(statement_error("start transaction"))?;

        match write_graph(&mut txn, graph, self.batch_size).await {
            Ok(summary) => {
                txn.commit()
                    .await
                    .map_err(statement_error("commit transaction"))?;
                info!(
                    packages = summary.packages,
                    dependencies = summary.dependencies,
                    "transaction committed"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "write failed, rolling back");
                if let Err(rollback) = txn.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn ensure_indexes(&mut self) -> Result<(), StoreError> {
        let session = self.session()?;
        for statement in create_indexes() {
            session
                .run(query(&statement))
                .await
                .map_err(statement_error("create index"))?;
        }
        debug!("package indexes ensured");
        Ok(())
    }

    async fn close(&mut self) {
        if self.graph.take().is_some() {
            info!(uri = %self.uri, "connection closed");
        }
    }
}
