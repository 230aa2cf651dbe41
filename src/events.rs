//! Run-scoped progress events.
//!
//! Nodes and the runner report progress through an explicit event channel
//! rather than a process-wide logger: the sender travels inside each
//! [`NodeContext`](crate::node::NodeContext). The runner attaches a listener
//! that forwards events to `tracing`; tests drain the channel directly.

use std::fmt;

use crate::types::NodeName;

/// A single progress event emitted during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Emitting node, if any (`None` for runner-scoped events).
    pub node: Option<NodeName>,
    /// Short label grouping related events, e.g. `"parse"` or `"faq"`.
    pub scope: String,
    pub message: String,
}

impl Event {
    /// A node-scoped event.
    #[must_use]
    pub fn node_message(
        node: NodeName,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            node: Some(node),
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// A runner-scoped event with no originating node.
    #[must_use]
    pub fn runner(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node: None,
            scope: scope.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Some(node) => write!(f, "[{}] {}: {}", self.scope, node, self.message),
            None => write!(f, "[{}] {}", self.scope, self.message),
        }
    }
}

/// Unbounded event channel with an optional tracing forwarder.
///
/// Either call [`listen`](Self::listen) once to forward events to `tracing`
/// as they arrive, or keep the bus silent and [`drain`](Self::drain) it after
/// the run; the two modes compete for the same messages, so pick one.
pub struct EventBus {
    tx: flume::Sender<Event>,
    rx: flume::Receiver<Event>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// A sender handle for node contexts.
    #[must_use]
    pub fn sender(&self) -> flume::Sender<Event> {
        self.tx.clone()
    }

    /// Spawns a task that forwards every event to `tracing` until all senders
    /// (including this bus) are dropped.
    pub fn listen(&self) {
        let rx = self.rx.clone();
        tokio::spawn(async move {
            while let Ok(event) = rx.recv_async().await {
                tracing::info!(target: "plait::events", %event, "run event");
            }
        });
    }

    /// Collects every event currently queued, without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
