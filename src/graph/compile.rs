//! Graph validation and the immutable compiled form.

use miette::Diagnostic;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

use super::builder::GraphBuilder;
use crate::node::Node;
use crate::types::NodeName;

/// Structural errors detected when building a graph.
///
/// All of these are fatal at build time: the pipeline never starts.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("duplicate node registration: {name}")]
    #[diagnostic(
        code(plait::graph::duplicate_node),
        help("Every node name must be registered exactly once.")
    )]
    DuplicateNode { name: NodeName },

    #[error("node {node} declares unknown predecessor {predecessor}")]
    #[diagnostic(
        code(plait::graph::unknown_predecessor),
        help("Predecessors must name registered nodes; registration order does not matter.")
    )]
    UnknownPredecessor {
        node: NodeName,
        predecessor: NodeName,
    },

    #[error("dependency cycle among nodes: {}", .members.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    #[diagnostic(
        code(plait::graph::cycle),
        help("Remove at least one predecessor edge among the listed nodes.")
    )]
    Cycle { members: Vec<NodeName> },

    #[error("graph has no nodes")]
    #[diagnostic(code(plait::graph::empty))]
    Empty,
}

/// An immutable, validated dependency graph.
///
/// Built once per pipeline via [`GraphBuilder::build`] and never mutated for
/// the duration of a run.
pub struct Graph {
    nodes: FxHashMap<NodeName, Arc<dyn Node>>,
    predecessors: FxHashMap<NodeName, Vec<NodeName>>,
    successors: FxHashMap<NodeName, Vec<NodeName>>,
    topo: Vec<NodeName>,
}

impl Graph {
    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The executable unit registered under `name`.
    #[must_use]
    pub fn node(&self, name: &NodeName) -> Option<&Arc<dyn Node>> {
        self.nodes.get(name)
    }

    /// Declared predecessors of `name` (empty for roots).
    #[must_use]
    pub fn predecessors(&self, name: &NodeName) -> &[NodeName] {
        self.predecessors.get(name).map_or(&[], Vec::as_slice)
    }

    /// Derived successors of `name` (empty for sinks).
    #[must_use]
    pub fn successors(&self, name: &NodeName) -> &[NodeName] {
        self.successors.get(name).map_or(&[], Vec::as_slice)
    }

    /// All node names in a deterministic topological order (predecessors
    /// before dependents, lexicographic tie-break).
    #[must_use]
    pub fn topological_order(&self) -> &[NodeName] {
        &self.topo
    }
}

impl GraphBuilder {
    /// Validates the accumulated registrations and returns the immutable
    /// graph.
    ///
    /// # Errors
    ///
    /// [`GraphError::Empty`] when nothing was registered,
    /// [`GraphError::DuplicateNode`] when a name was registered twice,
    /// [`GraphError::UnknownPredecessor`] when an edge points at no
    /// registered node, and [`GraphError::Cycle`] when the declaration is not
    /// acyclic (detected regardless of cycle length or position).
    pub fn build(self) -> Result<Graph, GraphError> {
        if self.registrations.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut nodes: FxHashMap<NodeName, Arc<dyn Node>> = FxHashMap::default();
        let mut predecessors: FxHashMap<NodeName, Vec<NodeName>> = FxHashMap::default();
        for registration in &self.registrations {
            if nodes.contains_key(&registration.name) {
                return Err(GraphError::DuplicateNode {
                    name: registration.name.clone(),
                });
            }
            nodes.insert(registration.name.clone(), Arc::clone(&registration.node));
            predecessors.insert(
                registration.name.clone(),
                registration.predecessors.clone(),
            );
        }

        for registration in &self.registrations {
            for pred in &registration.predecessors {
                if !nodes.contains_key(pred) {
                    return Err(GraphError::UnknownPredecessor {
                        node: registration.name.clone(),
                        predecessor: pred.clone(),
                    });
                }
            }
        }

        let mut successors: FxHashMap<NodeName, Vec<NodeName>> = FxHashMap::default();
        for (name, preds) in &predecessors {
            for pred in preds {
                successors
                    .entry(pred.clone())
                    .or_default()
                    .push(name.clone());
            }
        }
        for succs in successors.values_mut() {
            succs.sort();
        }

        let topo = topological_sort(&predecessors, &successors)?;

        Ok(Graph {
            nodes,
            predecessors,
            successors,
            topo,
        })
    }
}

/// Kahn's algorithm over the declared predecessor edges.
///
/// Ties break lexicographically so the order is stable across runs. Any node
/// left unprocessed sits on a cycle.
fn topological_sort(
    predecessors: &FxHashMap<NodeName, Vec<NodeName>>,
    successors: &FxHashMap<NodeName, Vec<NodeName>>,
) -> Result<Vec<NodeName>, GraphError> {
    let mut in_degree: FxHashMap<&NodeName, usize> = predecessors
        .iter()
        .map(|(name, preds)| (name, preds.len()))
        .collect();

    let mut roots: Vec<&NodeName> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(name, _)| *name)
        .collect();
    roots.sort();

    let mut queue: VecDeque<&NodeName> = roots.into();
    let mut order: Vec<NodeName> = Vec::with_capacity(predecessors.len());

    while let Some(name) = queue.pop_front() {
        order.push(name.clone());
        let mut released: Vec<&NodeName> = Vec::new();
        if let Some(succs) = successors.get(name) {
            for succ in succs {
                if let Some(degree) = in_degree.get_mut(succ) {
                    *degree = degree.saturating_sub(1);
                    if *degree == 0 {
                        released.push(succ);
                    }
                }
            }
        }
        released.sort();
        queue.extend(released);
    }

    if order.len() < predecessors.len() {
        let ordered: FxHashSet<&NodeName> = order.iter().collect();
        let mut members: Vec<NodeName> = predecessors
            .keys()
            .filter(|name| !ordered.contains(name))
            .cloned()
            .collect();
        members.sort();
        return Err(GraphError::Cycle { members });
    }

    Ok(order)
}
