//! The database phase of a run: connect, write, index, close.

use crate::error::StoreError;
use crate::store::{GraphStore, LoadSummary};
use lockgraph_core::graph::PackageGraph;
use std::fmt;
use std::future::Future;
use tracing::{error, info};

/// Steps of the database phase, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    Writing,
    Indexing,
    Closing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Connecting => "connecting",
            Phase::Writing => "writing",
            Phase::Indexing => "indexing",
            Phase::Closing => "closing",
        };
        f.write_str(label)
    }
}

/// Receives phase boundaries so callers can show progress to the operator.
pub trait PhaseReporter {
    fn started(&mut self, phase: Phase);
    fn succeeded(&mut self, phase: Phase);
    fn failed(&mut self, phase: Phase, error: &StoreError);
}

/// Reporter that only emits tracing events.
#[derive(Debug, Default)]
pub struct LogReporter;

impl PhaseReporter for LogReporter {
    fn started(&mut self, phase: Phase) {
        info!(%phase, "phase started");
    }

    fn succeeded(&mut self, phase: Phase) {
        info!(%phase, "phase succeeded");
    }

    fn failed(&mut self, phase: Phase, error: &StoreError) {
        error!(%phase, %error, "phase failed");
    }
}

async fn step<T, R: PhaseReporter>(
    reporter: &mut R,
    phase: Phase,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    reporter.started(phase);
    match fut.await {
        Ok(value) => {
            reporter.succeeded(phase);
            Ok(value)
        }
        Err(e) => {
            reporter.failed(phase, &e);
            Err(e)
        }
    }
}

/// Replace the stored package graph with `graph`.
///
/// `connect` opens the store. Once it has succeeded, the store is closed exactly
/// once whatever happens in the write or index steps. Indexes are only ensured
/// after the write transaction committed.
pub async fn load<S, C, R>(
    connect: C,
    graph: &PackageGraph,
    reporter: &mut R,
) -> Result<LoadSummary, StoreError>
where
    S: GraphStore,
    C: Future<Output = Result<S, StoreError>>,
    R: PhaseReporter,
{
    let mut store = step(reporter, Phase::Connecting, connect).await?;

    let result = write_and_index(&mut store, graph, reporter).await;

    reporter.started(Phase::Closing);
    store.close().await;
    reporter.succeeded(Phase::Closing);

    result
}

async fn write_and_index<S: GraphStore, R: PhaseReporter>(
    store: &mut S,
    graph: &PackageGraph,
    reporter: &mut R,
) -> Result<LoadSummary, StoreError> {
    let summary = step(reporter, Phase::Writing, store.replace_graph(graph)).await?;
    step(reporter, Phase::Indexing, store.ensure_indexes()).await?;
    Ok(summary)
}
