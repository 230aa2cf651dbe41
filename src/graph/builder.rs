//! Fluent accumulation of node registrations.

use std::sync::Arc;

use crate::node::Node;
use crate::types::NodeName;

pub(super) struct Registration {
    pub name: NodeName,
    pub predecessors: Vec<NodeName>,
    pub node: Arc<dyn Node>,
}

/// Builder for pipeline graphs.
///
/// Accumulates `(name, predecessors, node)` registrations; nothing is
/// validated until [`build`](Self::build). A node with no predecessors hangs
/// off the virtual `Start` root. Attempts to register `Start` itself are
/// ignored with a warning; it is structural, not executable.
pub struct GraphBuilder {
    pub(super) registrations: Vec<Registration>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Registers a node together with its declared predecessors.
    ///
    /// Predecessors are given by name; they may be registered before or after
    /// this call. Listing `"Start"` explicitly is allowed and equivalent to
    /// omitting it. Duplicate predecessor entries collapse to one edge.
    #[must_use]
    pub fn add_node(
        mut self,
        name: impl Into<NodeName>,
        predecessors: &[&str],
        node: impl Node + 'static,
    ) -> Self {
        let name = name.into();
        if name.is_start() {
            tracing::warn!("ignoring registration of the virtual Start root");
            return self;
        }

        let mut preds: Vec<NodeName> = Vec::with_capacity(predecessors.len());
        for pred in predecessors {
            let pred = NodeName::from(*pred);
            if pred.is_start() || preds.contains(&pred) {
                continue;
            }
            preds.push(pred);
        }

        self.registrations.push(Registration {
            name,
            predecessors: preds,
            node: Arc::new(node),
        });
        self
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
