//! CLI binary for lockgraph: load a pnpm lockfile into a Neo4j package graph.

mod progress;

use anyhow::{Context, Result};
use clap::Parser;
use lockgraph_core::builder;
use lockgraph_store::config::{DEFAULT_DATABASE, DEFAULT_PASSWORD, DEFAULT_URI, DEFAULT_USERNAME};
use lockgraph_store::neo4j::Neo4jStore;
use lockgraph_store::{StoreConfig, load};
use progress::SpinnerReporter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "lockgraph",
    about = "Load a pnpm lockfile into a graph database as packages and dependency edges"
)]
struct Cli {
    /// Database endpoint
    #[arg(long, default_value = DEFAULT_URI)]
    uri: String,

    /// Database user
    #[arg(long, default_value = DEFAULT_USERNAME)]
    username: String,

    /// Database password
    #[arg(long, default_value = DEFAULT_PASSWORD)]
    password: String,

    /// Target database name
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Path to pnpm-lock.yaml (relative paths resolve against the current directory)
    #[arg(long)]
    lockfile: PathBuf,
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        StoreConfig {
            uri: self.uri.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            ..StoreConfig::default()
        }
    }
}

fn resolve_lockfile_path(lockfile: &Path, cwd: &Path) -> PathBuf {
    if lockfile.is_absolute() {
        lockfile.to_path_buf()
    } else {
        cwd.join(lockfile)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let lockfile = resolve_lockfile_path(&cli.lockfile, &cwd);

    let mut reporter = SpinnerReporter::default();

    reporter.begin("loading");
    let graph = match builder::build_from_path(&lockfile) {
        Ok(graph) => {
            reporter.ok("loading");
            graph
        }
        Err(e) => {
            reporter.fail("loading", &e);
            return Err(e).with_context(|| format!("failed to load {}", lockfile.display()));
        }
    };
    let summary = graph.summary();
    eprintln!(
        "  Packages: {} in-repo, {} external",
        summary.in_repo_packages, summary.external_packages
    );
    eprintln!("  Dependencies: {}", summary.dependencies);

    let config = cli.store_config();
    match load(Neo4jStore::connect(&config), &graph, &mut reporter).await {
        Ok(written) => {
            info!(
                packages = written.packages,
                dependencies = written.dependencies,
                database = %config.database,
                "package graph loaded"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // The connection has already been closed by `load`.
            error!(error = %e, "database load failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
