mod common;

use common::*;
use serde_json::json;
use std::time::Duration;

use plait::events::Event;
use plait::graph::{Graph, GraphBuilder};
use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
use plait::scheduler::{NodeStatus, RunReport, Scheduler};
use plait::state::{PipelineState, StateSnapshot};
use plait::store::StateStore;
use plait::types::NodeName;

async fn run(
    graph: &Graph,
    store: &StateStore,
) -> Result<RunReport, plait::scheduler::SchedulerError> {
    let (tx, _rx) = flume::unbounded::<Event>();
    Scheduler::default().run(graph, store, "run-test", tx).await
}

/// Reads `faq.x` from the snapshot and writes `comparison.y = x + 1`.
struct AddOne;

#[async_trait::async_trait]
impl Node for AddOne {
    async fn run(&self, snapshot: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        let x = snapshot
            .faq
            .as_ref()
            .and_then(|faq| faq["x"].as_i64())
            .ok_or(NodeError::MissingInput { what: "faq" })?;
        Ok(NodeUpdate::new().with_comparison(json!({ "y": x + 1 })))
    }
}

#[tokio::test]
async fn chain_passes_values_downstream() {
    let graph = GraphBuilder::new()
        .add_node("a", &[], Produce(NodeUpdate::new().with_faq(json!({"x": 1}))))
        .add_node("b", &["a"], AddOne)
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.passes, 2);
    assert_eq!(report.status(&"a".into()), Some(NodeStatus::Done));
    assert_eq!(report.status(&"b".into()), Some(NodeStatus::Done));

    let (state, fatal) = store.finish();
    assert!(fatal.is_none());
    assert_eq!(state.faq, Some(json!({"x": 1})));
    assert_eq!(state.comparison, Some(json!({"y": 2})));
}

#[tokio::test]
async fn failed_predecessor_skips_dependent_but_not_sibling() {
    let (spy, spy_runs) = Spy::new(NodeUpdate::new().with_faq(json!({"from": "b"})));
    let graph = GraphBuilder::new()
        .add_node("a", &[], Fail("boom"))
        .add_node("b", &["a"], spy)
        .add_node("c", &[], Produce(NodeUpdate::new().with_comparison(json!({"from": "c"}))))
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.status(&"a".into()), Some(NodeStatus::Failed));
    assert_eq!(report.status(&"b".into()), Some(NodeStatus::Failed));
    assert_eq!(report.status(&"c".into()), Some(NodeStatus::Done));
    assert_eq!(report.skipped, vec![NodeName::from("b")]);
    assert_eq!(spy_runs.load(std::sync::atomic::Ordering::SeqCst), 0);

    let (state, fatal) = store.finish();
    let fatal = fatal.unwrap();
    assert_eq!(fatal.node, "a");
    assert!(fatal.message.contains("boom"));
    // The sibling's output survives at store level; the skipped node never wrote.
    assert_eq!(state.comparison, Some(json!({"from": "c"})));
    assert!(state.faq.is_none());
}

#[tokio::test]
async fn failure_propagates_transitively() {
    let graph = GraphBuilder::new()
        .add_node("a", &[], Fail("root failure"))
        .add_node("b", &["a"], Noop)
        .add_node("c", &["b"], Noop)
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.status(&"b".into()), Some(NodeStatus::Failed));
    assert_eq!(report.status(&"c".into()), Some(NodeStatus::Failed));
    assert_eq!(report.skipped, vec![NodeName::from("b"), NodeName::from("c")]);
    assert_eq!(report.passes, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn diamond_middle_nodes_overlap_and_gate_the_join() {
    let log = span_log();
    let delay = Duration::from_millis(80);
    let graph = GraphBuilder::new()
        .add_node("a", &[], Produce(NodeUpdate::new().with_faq(json!({"x": 0}))))
        .add_node(
            "b",
            &["a"],
            Delayed {
                delay,
                update: NodeUpdate::new().with_comparison(json!({"from": "b"})),
                log: log.clone(),
            },
        )
        .add_node(
            "c",
            &["a"],
            Delayed {
                delay,
                update: NodeUpdate::new().with_page(json!({"from": "c"})),
                log: log.clone(),
            },
        )
        .add_node(
            "d",
            &["b", "c"],
            Delayed {
                delay: Duration::from_millis(1),
                update: NodeUpdate::default(),
                log: log.clone(),
            },
        )
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.passes, 3);

    let b = span_of(&log, "b");
    let c = span_of(&log, "c");
    let d = span_of(&log, "d");
    assert!(b.overlaps(&c), "same-pass siblings should run concurrently");
    assert!(d.start >= b.end && d.start >= c.end, "join waits for both");

    let (state, fatal) = store.finish();
    assert!(fatal.is_none());
    assert!(state.comparison.is_some() && state.page.is_some());
}

#[tokio::test]
async fn concurrency_limit_one_serializes_a_pass() {
    let log = span_log();
    let delay = Duration::from_millis(40);
    let graph = GraphBuilder::new()
        .add_node(
            "a",
            &[],
            Delayed {
                delay,
                update: NodeUpdate::default(),
                log: log.clone(),
            },
        )
        .add_node(
            "b",
            &[],
            Delayed {
                delay,
                update: NodeUpdate::default(),
                log: log.clone(),
            },
        )
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());
    let (tx, _rx) = flume::unbounded::<Event>();

    Scheduler::new(1)
        .run(&graph, &store, "run-test", tx)
        .await
        .unwrap();

    let a = span_of(&log, "a");
    let b = span_of(&log, "b");
    assert!(!a.overlaps(&b), "limit 1 must serialize the pass");
}

#[tokio::test]
async fn first_error_wins_across_passes() {
    let log = span_log();
    let graph = GraphBuilder::new()
        .add_node("a", &[], Fail("first failure"))
        .add_node(
            "d",
            &[],
            Delayed {
                delay: Duration::from_millis(40),
                update: NodeUpdate::new().with_faq(json!({})),
                log,
            },
        )
        .add_node("e", &["d"], Fail("second failure"))
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.status(&"a".into()), Some(NodeStatus::Failed));
    assert_eq!(report.status(&"e".into()), Some(NodeStatus::Failed));

    let (_, fatal) = store.finish();
    let fatal = fatal.unwrap();
    assert_eq!(fatal.node, "a");
    assert!(fatal.message.contains("first failure"));
}

#[tokio::test]
async fn panic_is_recorded_like_an_error() {
    let (spy, spy_runs) = Spy::new(NodeUpdate::default());
    let graph = GraphBuilder::new()
        .add_node("p", &[], Panics("kaboom"))
        .add_node("q", &["p"], spy)
        .build()
        .unwrap();
    let store = StateStore::new(PipelineState::default());

    let report = run(&graph, &store).await.unwrap();
    assert_eq!(report.status(&"p".into()), Some(NodeStatus::Failed));
    assert_eq!(report.status(&"q".into()), Some(NodeStatus::Failed));
    assert_eq!(spy_runs.load(std::sync::atomic::Ordering::SeqCst), 0);

    let (_, fatal) = store.finish();
    let fatal = fatal.unwrap();
    assert_eq!(fatal.node, "p");
    assert!(fatal.message.contains("panicked"));
    assert!(fatal.message.contains("kaboom"));
}

#[tokio::test]
async fn independent_branches_are_order_insensitive() {
    let x_update = NodeUpdate::new().with_faq(json!({"branch": "x"}));
    let y_update = NodeUpdate::new().with_comparison(json!({"branch": "y"}));

    let forward = GraphBuilder::new()
        .add_node("x", &[], Produce(x_update.clone()))
        .add_node("y", &[], Produce(y_update.clone()))
        .build()
        .unwrap();
    let reversed = GraphBuilder::new()
        .add_node("y", &[], Produce(y_update))
        .add_node("x", &[], Produce(x_update))
        .build()
        .unwrap();

    let store_forward = StateStore::new(PipelineState::default());
    let store_reversed = StateStore::new(PipelineState::default());
    run(&forward, &store_forward).await.unwrap();
    run(&reversed, &store_reversed).await.unwrap();

    assert_eq!(store_forward.finish().0, store_reversed.finish().0);
}

#[tokio::test]
async fn node_events_reach_the_channel() {
    struct Chatty;

    #[async_trait::async_trait]
    impl Node for Chatty {
        async fn run(
            &self,
            _: StateSnapshot,
            ctx: NodeContext,
        ) -> Result<NodeUpdate, NodeError> {
            ctx.emit("work", "halfway there")?;
            Ok(NodeUpdate::default())
        }
    }

    let graph = GraphBuilder::new().add_node("chatty", &[], Chatty).build().unwrap();
    let store = StateStore::new(PipelineState::default());
    let (tx, rx) = flume::unbounded::<Event>();
    Scheduler::default()
        .run(&graph, &store, "run-test", tx)
        .await
        .unwrap();

    let events: Vec<Event> = rx.try_iter().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].node, Some(NodeName::from("chatty")));
    assert_eq!(events[0].scope, "work");
}
