//! Graph definition and validation.
//!
//! [`GraphBuilder`] is the single configuration surface the core exposes:
//! a build-time declaration of `(name, predecessors, node)` tuples. `build()`
//! validates the whole declaration (duplicate names, unknown predecessors,
//! cycles) and returns an immutable [`Graph`] with derived successor edges
//! and a deterministic topological order.
//!
//! Registration order never matters: all structural validation is deferred to
//! [`GraphBuilder::build`].
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use plait::graph::GraphBuilder;
//! use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
//! use plait::state::StateSnapshot;
//!
//! struct Noop;
//!
//! #[async_trait]
//! impl Node for Noop {
//!     async fn run(&self, _: StateSnapshot, _: NodeContext) -> Result<NodeUpdate, NodeError> {
//!         Ok(NodeUpdate::default())
//!     }
//! }
//!
//! let graph = GraphBuilder::new()
//!     .add_node("parse", &[], Noop)
//!     .add_node("enrich", &["parse"], Noop)
//!     .build()
//!     .expect("acyclic graph builds");
//!
//! assert_eq!(graph.len(), 2);
//! assert_eq!(graph.topological_order()[0].to_string(), "parse");
//! ```

mod builder;
mod compile;

pub use builder::GraphBuilder;
pub use compile::{Graph, GraphError};
