//! Level-synchronous concurrent execution of a pipeline graph.
//!
//! Each scheduling pass computes the set of ready nodes (every predecessor
//! done), dispatches all of them concurrently, waits for the whole pass to
//! finish, merges results into the store, and repeats until every node is
//! terminal. Nodes downstream of a failure are marked failed without ever
//! executing.
//!
//! All nodes dispatched in the same pass see the identical pass-start
//! snapshot; their writes become visible only to later passes. A failure
//! never aborts siblings already running in the same pass.

use futures_util::FutureExt;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::errors::ErrorEvent;
use crate::events::Event;
use crate::graph::Graph;
use crate::node::{NodeContext, NodeError, NodeUpdate};
use crate::store::StateStore;
use crate::types::NodeName;

/// Per-node execution status.
///
/// `Pending -> Ready -> Running -> {Done, Failed}`; a node whose predecessor
/// failed moves straight from `Pending` to `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    Pending,
    Ready,
    Running,
    Done,
    Failed,
}

impl NodeStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Outcome of one full scheduler run.
///
/// Final state and the fatal-error slot live in the [`StateStore`]; the
/// report carries the per-node bookkeeping.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Number of scheduling passes executed.
    pub passes: u64,
    /// Terminal status of every node.
    pub statuses: FxHashMap<NodeName, NodeStatus>,
    /// Nodes failed by propagation, i.e. skipped without executing.
    pub skipped: Vec<NodeName>,
}

impl RunReport {
    #[must_use]
    pub fn status(&self, name: &NodeName) -> Option<NodeStatus> {
        self.statuses.get(name).copied()
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SchedulerError {
    /// No runnable nodes although some are unfinished.
    #[error("scheduler stalled at pass {pass}: {remaining} nodes unfinished but none runnable")]
    #[diagnostic(
        code(plait::scheduler::stall),
        help("This indicates a dependency-tracking bug; graphs that pass build() cannot stall.")
    )]
    Stall { pass: u64, remaining: usize },
}

/// Dispatches ready nodes concurrently, pass by pass.
#[derive(Clone, Debug)]
pub struct Scheduler {
    limit: usize,
}

impl Scheduler {
    /// A scheduler capping each pass at `limit` concurrently running nodes.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    /// A scheduler whose parallelism is bounded only by the ready-set size.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            limit: Semaphore::MAX_PERMITS,
        }
    }

    /// Runs the graph to completion against `store`.
    ///
    /// Returns the per-node [`RunReport`]; the final state and any recorded
    /// fatal error are read from the store by the caller.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Stall`] if no node is runnable while some are
    /// unfinished; unreachable for graphs validated by
    /// [`GraphBuilder::build`](crate::graph::GraphBuilder::build).
    pub async fn run(
        &self,
        graph: &Graph,
        store: &StateStore,
        run_id: &str,
        events: flume::Sender<Event>,
    ) -> Result<RunReport, SchedulerError> {
        let mut statuses: FxHashMap<NodeName, NodeStatus> = graph
            .topological_order()
            .iter()
            .cloned()
            .map(|name| (name, NodeStatus::Pending))
            .collect();
        let mut skipped: Vec<NodeName> = Vec::new();
        let mut pass: u64 = 0;
        let semaphore = Arc::new(Semaphore::new(self.limit));

        loop {
            // One sweep in topological order fully propagates failures:
            // predecessors are visited before their dependents.
            for name in graph.topological_order() {
                if statuses[name] != NodeStatus::Pending {
                    continue;
                }
                let failed_pred = graph
                    .predecessors(name)
                    .iter()
                    .any(|pred| statuses[pred] == NodeStatus::Failed);
                if failed_pred {
                    statuses.insert(name.clone(), NodeStatus::Failed);
                    skipped.push(name.clone());
                    tracing::info!(node = %name, "skipping node: failed predecessor");
                }
            }

            let ready: Vec<NodeName> = graph
                .topological_order()
                .iter()
                .filter(|name| {
                    statuses[*name] == NodeStatus::Pending
                        && graph
                            .predecessors(name)
                            .iter()
                            .all(|pred| statuses[pred] == NodeStatus::Done)
                })
                .cloned()
                .collect();

            if ready.is_empty() {
                let remaining = statuses
                    .values()
                    .filter(|status| !status.is_terminal())
                    .count();
                if remaining == 0 {
                    break;
                }
                return Err(SchedulerError::Stall { pass, remaining });
            }

            pass += 1;
            for name in &ready {
                statuses.insert(name.clone(), NodeStatus::Ready);
            }
            tracing::debug!(pass, ready = ready.len(), "dispatching ready nodes");

            let snapshot = store.snapshot();
            let mut tasks: JoinSet<(NodeName, Result<NodeUpdate, NodeError>)> = JoinSet::new();
            for name in ready {
                let node = Arc::clone(graph.node(&name).expect("ready nodes are registered"));
                let ctx = NodeContext {
                    node: name.clone(),
                    run_id: run_id.to_string(),
                    pass,
                    events: events.clone(),
                };
                let snap = snapshot.clone();
                let permits = Arc::clone(&semaphore);
                statuses.insert(name.clone(), NodeStatus::Running);
                tasks.spawn(async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .expect("semaphore is never closed");
                    let outcome = AssertUnwindSafe(node.run(snap, ctx)).catch_unwind().await;
                    let outcome = outcome.unwrap_or_else(|payload| {
                        Err(NodeError::Panicked {
                            detail: panic_detail(&payload),
                        })
                    });
                    (name, outcome)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((name, Ok(update))) => {
                        store.apply(&name, update);
                        tracing::debug!(node = %name, "node completed");
                        statuses.insert(name, NodeStatus::Done);
                    }
                    Ok((name, Err(error))) => {
                        tracing::error!(node = %name, %error, "node failed");
                        store.record_error(ErrorEvent::node_failure(&name, &error));
                        statuses.insert(name, NodeStatus::Failed);
                    }
                    Err(join_error) => {
                        // catch_unwind leaves only cancellation here; the node
                        // stays Running and surfaces as a stall next pass.
                        tracing::error!(%join_error, "node task aborted");
                    }
                }
            }
        }

        Ok(RunReport {
            passes: pass,
            statuses,
            skipped,
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::unbounded()
    }
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
