use lockgraph_core::graph::{Dependency, Package, PackageGraph};
use lockgraph_store::memory::MemoryStore;
use lockgraph_store::{GraphStore, LoadSummary, Phase, PhaseReporter, StoreError, load};

#[derive(Debug, Default)]
struct Recorder {
    events: Vec<String>,
}

impl PhaseReporter for Recorder {
    fn started(&mut self, phase: Phase) {
        self.events.push(format!("start {phase}"));
    }

    fn succeeded(&mut self, phase: Phase) {
        self.events.push(format!("ok {phase}"));
    }

    fn failed(&mut self, phase: Phase, _error: &StoreError) {
        self.events.push(format!("fail {phase}"));
    }
}

fn sample_graph() -> PackageGraph {
    PackageGraph {
        packages: vec![
            Package::in_repo(".", "root", Some("1.0.0".to_string())),
            Package::external("foo@1.0.0", "foo", "1.0.0"),
        ],
        dependencies: vec![Dependency::new(".", "foo@1.0.0")],
    }
}

/// Store whose index creation always fails, to observe cleanup.
#[derive(Default)]
struct IndexFailingStore {
    inner: MemoryStore,
}

impl GraphStore for IndexFailingStore {
    async fn replace_graph(&mut self, graph: &PackageGraph) -> Result<LoadSummary, StoreError> {
        self.inner.replace_graph(graph).await
    }

    async fn ensure_indexes(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Closed)
    }

    async fn close(&mut self) {
        self.inner.close().await;
    }
}

#[tokio::test]
async fn test_load_writes_graph_and_indexes() {
    let mut store = MemoryStore::new();
    let mut reporter = Recorder::default();

    let summary = load(async { Ok(&mut store) }, &sample_graph(), &mut reporter)
        .await
        .unwrap();

    assert_eq!(
        summary,
        LoadSummary {
            packages: 2,
            dependencies: 1
        }
    );
    assert_eq!(store.nodes().count(), 2);
    assert!(store.node(".").unwrap().is_in_repo);
    assert!(!store.node("foo@1.0.0").unwrap().is_in_repo);
    assert_eq!(store.edges().len(), 1);
    assert!(store.indexes().contains("package_is_in_repo"));
    assert!(store.indexes().contains("package_name"));
    assert_eq!(store.close_calls(), 1);
    assert_eq!(
        reporter.events,
        vec![
            "start connecting",
            "ok connecting",
            "start writing",
            "ok writing",
            "start indexing",
            "ok indexing",
            "start closing",
            "ok closing",
        ]
    );
}

#[tokio::test]
async fn test_empty_graph_clears_prior_state_and_creates_indexes() {
    let mut store = MemoryStore::with_graph(&sample_graph());
    let mut reporter = Recorder::default();

    let summary = load(
        async { Ok(&mut store) },
        &PackageGraph::default(),
        &mut reporter,
    )
    .await
    .unwrap();

    assert_eq!(summary, LoadSummary::default());
    assert_eq!(store.nodes().count(), 0);
    assert!(store.edges().is_empty());
    assert_eq!(store.indexes().len(), 2);
    assert!(store.is_closed());
}

#[tokio::test]
async fn test_dangling_edge_rolls_back_and_skips_indexes() {
    let prior = sample_graph();
    let mut store = MemoryStore::with_graph(&prior);
    let mut reporter = Recorder::default();
    let broken = PackageGraph {
        packages: vec![Package::in_repo(".", "root", None)],
        dependencies: vec![Dependency::new(".", "bar@2.0.0")],
    };

    let err = load(async { Ok(&mut store) }, &broken, &mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::DanglingEdges { missing: 1, .. }));
    assert_eq!(store.node(".").unwrap().version.as_deref(), Some("1.0.0"));
    assert!(store.node("foo@1.0.0").is_some());
    assert!(store.indexes().is_empty());
    assert_eq!(store.close_calls(), 1);
    assert_eq!(
        reporter.events,
        vec![
            "start connecting",
            "ok connecting",
            "start writing",
            "fail writing",
            "start closing",
            "ok closing",
        ]
    );
}

#[tokio::test]
async fn test_index_failure_still_closes() {
    let mut store = IndexFailingStore::default();
    let mut reporter = Recorder::default();

    let result = load(async { Ok(&mut store) }, &sample_graph(), &mut reporter).await;

    assert!(result.is_err());
    assert_eq!(store.inner.nodes().count(), 2);
    assert_eq!(store.inner.close_calls(), 1);
    assert!(reporter.events.contains(&"fail indexing".to_string()));
    assert_eq!(reporter.events.last().unwrap(), "ok closing");
}

#[tokio::test]
async fn test_connect_failure_skips_everything_else() {
    let mut reporter = Recorder::default();

    let result = load(
        async { Err::<MemoryStore, _>(StoreError::Config("no scheme".to_string())) },
        &sample_graph(),
        &mut reporter,
    )
    .await;

    assert!(matches!(result, Err(StoreError::Config(_))));
    assert_eq!(reporter.events, vec!["start connecting", "fail connecting"]);
}
