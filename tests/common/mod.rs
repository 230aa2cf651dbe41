#![allow(dead_code)]

//! Shared test nodes for integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
use plait::state::StateSnapshot;

/// Does nothing, writes nothing.
pub struct Noop;

#[async_trait]
impl Node for Noop {
    async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        Ok(NodeUpdate::default())
    }
}

/// Returns a fixed update.
pub struct Produce(pub NodeUpdate);

#[async_trait]
impl Node for Produce {
    async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        Ok(self.0.clone())
    }
}

/// Fails with a validation error carrying the given message.
pub struct Fail(pub &'static str);

#[async_trait]
impl Node for Fail {
    async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        Err(NodeError::ValidationFailed(self.0.to_string()))
    }
}

/// Panics when executed.
pub struct Panics(pub &'static str);

#[async_trait]
impl Node for Panics {
    async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        panic!("{}", self.0);
    }
}

/// Counts executions, then returns a fixed update.
pub struct Spy {
    runs: Arc<AtomicUsize>,
    update: NodeUpdate,
}

impl Spy {
    pub fn new(update: NodeUpdate) -> (Self, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        (
            Self {
                runs: Arc::clone(&runs),
                update,
            },
            runs,
        )
    }
}

#[async_trait]
impl Node for Spy {
    async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(self.update.clone())
    }
}

/// Execution interval of one node, keyed by node name.
#[derive(Clone, Debug)]
pub struct Span {
    pub node: String,
    pub start: Instant,
    pub end: Instant,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub type SpanLog = Arc<Mutex<Vec<Span>>>;

pub fn span_log() -> SpanLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn span_of(log: &SpanLog, node: &str) -> Span {
    log.lock()
        .iter()
        .find(|span| span.node == node)
        .unwrap_or_else(|| panic!("no span recorded for {node}"))
        .clone()
}

/// Sleeps, records its execution interval, then returns a fixed update.
pub struct Delayed {
    pub delay: Duration,
    pub update: NodeUpdate,
    pub log: SpanLog,
}

#[async_trait]
impl Node for Delayed {
    async fn run(&self, _: StateSnapshot, ctx: NodeContext) -> Result<NodeUpdate, NodeError> {
        let start = Instant::now();
        tokio::time::sleep(self.delay).await;
        let end = Instant::now();
        self.log.lock().push(Span {
            node: ctx.node.to_string(),
            start,
            end,
        });
        Ok(self.update.clone())
    }
}
