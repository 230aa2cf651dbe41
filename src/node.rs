//! The node execution contract.
//!
//! A [`Node`] is one named unit of work in the dependency graph. It receives a
//! read-only [`StateSnapshot`] plus a [`NodeContext`], and returns a
//! [`NodeUpdate`] (the fields it proposes to write) or a [`NodeError`].
//! Nodes never mutate shared state directly; every write funnels through the
//! store's reducers.
//!
//! # Failure policy
//!
//! Whether a failure is fatal is a property of the node, not the scheduler:
//!
//! 1. **Fatal**: return `Err(NodeError)`. The error is recorded (first one
//!    wins), the node is marked failed, and every dependent is skipped.
//! 2. **Degraded continuation**: catch the failure inside the node, emit a
//!    warning event, and return an empty [`NodeUpdate`] so downstream nodes
//!    see the field's empty sentinel and keep running.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use plait::node::{Node, NodeContext, NodeError, NodeUpdate};
//! use plait::pipeline::product::Product;
//! use plait::state::StateSnapshot;
//!
//! struct EchoParse;
//!
//! #[async_trait]
//! impl Node for EchoParse {
//!     async fn run(
//!         &self,
//!         snapshot: StateSnapshot,
//!         ctx: NodeContext,
//!     ) -> Result<NodeUpdate, NodeError> {
//!         let template = snapshot
//!             .template_a
//!             .ok_or(NodeError::MissingInput { what: "template_a" })?;
//!         ctx.emit("parse", "template found")?;
//!         Ok(NodeUpdate::new().with_product_a(Product::from_template(template)))
//!     }
//! }
//! ```

use async_trait::async_trait;
use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use crate::events::Event;
use crate::pipeline::content::ContentBlocks;
use crate::pipeline::product::Product;
use crate::state::StateSnapshot;
use crate::types::NodeName;

/// One executable unit of work in the pipeline graph.
#[async_trait]
pub trait Node: Send + Sync {
    /// Executes this node against a snapshot, returning its proposed writes.
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError>;
}

/// Execution context handed to a node at dispatch.
///
/// Carries the node's identity, the run id, the scheduling pass number, and
/// the run's event channel: the explicit telemetry handle that replaces any
/// ambient global logger.
#[derive(Clone, Debug)]
pub struct NodeContext {
    pub node: NodeName,
    pub run_id: String,
    /// 1-based scheduling pass in which this node was dispatched.
    pub pass: u64,
    pub events: flume::Sender<Event>,
}

impl NodeContext {
    /// Emits a node-scoped progress event on the run's event channel.
    pub fn emit(
        &self,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), NodeContextError> {
        self.events
            .send(Event::node_message(self.node.clone(), scope, message))
            .map_err(|_| NodeContextError::ChannelClosed)
    }
}

/// Partial state update returned by a node.
///
/// Every field is optional; a node sets only what it produced. An all-`None`
/// update is the degraded-continuation outcome: nothing is written and
/// downstream readers see the empty sentinel.
#[derive(Clone, Debug, Default)]
pub struct NodeUpdate {
    pub product_a: Option<Product>,
    pub product_b: Option<Product>,
    pub content: Option<ContentBlocks>,
    pub faq: Option<Value>,
    pub page: Option<Value>,
    pub comparison: Option<Value>,
}

impl NodeUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_product_a(mut self, product: Product) -> Self {
        self.product_a = Some(product);
        self
    }

    #[must_use]
    pub fn with_product_b(mut self, product: Product) -> Self {
        self.product_b = Some(product);
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: ContentBlocks) -> Self {
        self.content = Some(content);
        self
    }

    #[must_use]
    pub fn with_faq(mut self, faq: Value) -> Self {
        self.faq = Some(faq);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: Value) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_comparison(mut self, comparison: Value) -> Self {
        self.comparison = Some(comparison);
        self
    }

    /// Returns `true` if this update writes no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_a.is_none()
            && self.product_b.is_none()
            && self.content.is_none()
            && self.faq.is_none()
            && self.page.is_none()
            && self.comparison.is_none()
    }
}

/// Errors that can occur when using [`NodeContext`] methods.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeContextError {
    /// The event channel's receiving side is gone.
    #[error("failed to emit event: event channel closed")]
    #[diagnostic(
        code(plait::node::event_channel_closed),
        help("The run's event bus was dropped before the node finished.")
    )]
    ChannelClosed,
}

/// Fatal node failures.
///
/// Returning one of these halts every dependent of the failing node. For
/// recoverable failures, degrade instead: emit a warning event and return an
/// empty [`NodeUpdate`].
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// Expected input data is missing from the snapshot.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(plait::node::missing_input),
        help("Check that an upstream node produced the required field.")
    )]
    MissingInput { what: &'static str },

    /// External provider or service error.
    #[error("provider error ({provider}): {message}")]
    #[diagnostic(code(plait::node::provider))]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    #[diagnostic(code(plait::node::serde_json))]
    Serde(#[from] serde_json::Error),

    /// Input validation failed.
    #[error("validation failed: {0}")]
    #[diagnostic(
        code(plait::node::validation),
        help("Check input data format and required fields.")
    )]
    ValidationFailed(String),

    /// The node's task panicked; normalized at the scheduler boundary.
    #[error("node panicked: {detail}")]
    #[diagnostic(code(plait::node::panic))]
    Panicked { detail: String },

    /// Event channel communication error.
    #[error("event channel error: {0}")]
    #[diagnostic(code(plait::node::events))]
    Events(#[from] NodeContextError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_update_is_empty() {
        assert!(NodeUpdate::default().is_empty());
        assert!(!NodeUpdate::new().with_faq(serde_json::json!({})).is_empty());
    }

    #[test]
    fn emit_fails_once_receiver_is_gone() {
        let (tx, rx) = flume::unbounded();
        let ctx = NodeContext {
            node: "probe".into(),
            run_id: "run-test".into(),
            pass: 1,
            events: tx,
        };
        drop(rx);
        assert!(matches!(
            ctx.emit("scope", "message"),
            Err(NodeContextError::ChannelClosed)
        ));
    }
}
