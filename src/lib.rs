//! # Plait: a concurrent DAG pipeline runner
//!
//! Plait runs named units of work ("nodes") over one shared, typed state
//! record, honoring declared dependency edges, overlapping independent
//! branches in wall-clock time, merging writes through explicit per-field
//! reducers, and short-circuiting everything downstream of the first failure.
//!
//! ## Core concepts
//!
//! - **Nodes**: async units of work receiving a state snapshot and returning
//!   a partial update ([`node`])
//! - **Graph**: a build-time declaration of `(name, predecessors, node)`
//!   tuples, validated once and immutable afterwards ([`graph`])
//! - **Store**: the sole mutation point, where every write funnels through a
//!   first-write-wins reducer, and the first fatal error wins the error slot
//!   ([`store`], [`reducers`])
//! - **Scheduler**: level-synchronous passes dispatching every ready node
//!   concurrently ([`scheduler`])
//! - **Runner**: the public entry point returning the complete final state or
//!   the single explanatory error ([`runner`])
//!
//! ## Quick start
//!
//! ```rust
//! use async_trait::async_trait;
//! use plait::graph::GraphBuilder;
//! use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
//! use plait::pipeline::product::Product;
//! use plait::runner::PipelineRunner;
//! use plait::state::{PipelineState, StateSnapshot};
//!
//! struct SeedProduct;
//!
//! #[async_trait]
//! impl Node for SeedProduct {
//!     async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
//!         Ok(NodeUpdate::new().with_product_a(Product {
//!             name: "Demo".into(),
//!             ..Default::default()
//!         }))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = GraphBuilder::new().add_node("seed", &[], SeedProduct).build()?;
//! let final_state = PipelineRunner::new(graph)
//!     .run(PipelineState::default())
//!     .await?;
//! assert_eq!(final_state.product_a.unwrap().name, "Demo");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module guide
//!
//! - [`types`] - node identity
//! - [`state`] - the shared state record, snapshots, seeding
//! - [`node`] - the node contract and partial updates
//! - [`reducers`] - per-field merge policies
//! - [`store`] - the state store and fatal-error slot
//! - [`graph`] - graph declaration and validation
//! - [`scheduler`] - concurrent level-synchronous execution
//! - [`runner`] - the pipeline entry point
//! - [`pipeline`] - the product-content node implementations
//! - [`events`], [`telemetry`], [`artifacts`], [`errors`], [`ids`] - run
//!   events, tracing setup, artifact output, error records, run ids

pub mod artifacts;
pub mod errors;
pub mod events;
pub mod graph;
pub mod ids;
pub mod node;
pub mod pipeline;
pub mod reducers;
pub mod runner;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod types;
