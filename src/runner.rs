//! The public pipeline entry point.
//!
//! [`PipelineRunner`] owns a validated [`Graph`] and a [`Scheduler`]. Each
//! [`run`](PipelineRunner::run) seeds a fresh [`StateStore`], generates a run
//! id, wires the event channel to tracing, drives the scheduler to
//! completion, and returns either the complete final state or the single
//! recorded fatal error. Partial outputs are discarded on fatal failure.
//!
//! # Examples
//!
//! ```rust,no_run
//! use plait::graph::GraphBuilder;
//! use plait::runner::PipelineRunner;
//! use plait::state::PipelineState;
//! # use async_trait::async_trait;
//! # use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
//! # use plait::state::StateSnapshot;
//! # struct Noop;
//! # #[async_trait]
//! # impl Node for Noop {
//! #     async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
//! #         Ok(NodeUpdate::default())
//! #     }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = GraphBuilder::new().add_node("work", &[], Noop).build()?;
//! let runner = PipelineRunner::new(graph);
//! let final_state = runner.run(PipelineState::default()).await?;
//! # Ok(())
//! # }
//! ```

use miette::Diagnostic;
use thiserror::Error;

use crate::errors::ErrorEvent;
use crate::events::EventBus;
use crate::graph::Graph;
use crate::ids::IdGenerator;
use crate::scheduler::{Scheduler, SchedulerError};
use crate::state::PipelineState;
use crate::store::StateStore;

/// Errors a pipeline run can end with.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// A node failed fatally; this carries the first recorded failure.
    #[error("pipeline failed: {0}")]
    #[diagnostic(
        code(plait::runner::fatal),
        help("Dependents of the failing node were skipped; partial outputs were discarded.")
    )]
    Fatal(ErrorEvent),

    #[error(transparent)]
    #[diagnostic(code(plait::runner::scheduler))]
    Scheduler(#[from] SchedulerError),
}

/// Drives a validated graph over a seeded state to completion.
pub struct PipelineRunner {
    graph: Graph,
    scheduler: Scheduler,
}

impl PipelineRunner {
    /// A runner with unbounded per-pass parallelism.
    ///
    /// Construction takes a built [`Graph`], so structural errors have
    /// already failed fast at [`build`](crate::graph::GraphBuilder::build).
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            scheduler: Scheduler::default(),
        }
    }

    /// A runner with a custom scheduler configuration.
    #[must_use]
    pub fn with_scheduler(graph: Graph, scheduler: Scheduler) -> Self {
        Self { graph, scheduler }
    }

    /// Runs the pipeline once over `initial` seeded state.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Fatal`] with the first recorded node failure, or
    /// [`PipelineError::Scheduler`] on an internal stall.
    pub async fn run(&self, initial: PipelineState) -> Result<PipelineState, PipelineError> {
        let run_id = IdGenerator::new().generate_run_id();
        let bus = EventBus::new();
        bus.listen();

        tracing::info!(run_id = %run_id, nodes = self.graph.len(), "pipeline run starting");
        let store = StateStore::new(initial);
        let report = self
            .scheduler
            .run(&self.graph, &store, &run_id, bus.sender())
            .await?;

        let (state, fatal) = store.finish();
        match fatal {
            Some(event) => {
                tracing::error!(run_id = %run_id, passes = report.passes, error = %event, "pipeline run failed");
                Err(PipelineError::Fatal(event))
            }
            None => {
                tracing::info!(run_id = %run_id, passes = report.passes, "pipeline run complete");
                Ok(state)
            }
        }
    }
}
