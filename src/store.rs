//! The state store: sole mutation point for shared pipeline state.
//!
//! Every node output funnels through [`StateStore::apply`], which merges each
//! written field through its reducer inside one short critical section. A
//! single lock covers the whole record: fan-out here is at most three nodes,
//! so per-field locking would buy nothing.
//!
//! The store also owns the run's fatal-error slot with first-error-wins
//! semantics: the first recorded failure becomes the pipeline's outcome,
//! later ones are logged and dropped.

use parking_lot::Mutex;

use crate::errors::ErrorEvent;
use crate::node::NodeUpdate;
use crate::reducers::{FirstWriteWins, Reducer};
use crate::state::{PipelineState, StateSnapshot};
use crate::types::NodeName;

/// Arbiter for concurrent writes to the shared state record.
pub struct StateStore {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    state: PipelineState,
    fatal: Option<ErrorEvent>,
}

impl StateStore {
    /// Wraps an initial (seeded) state record.
    #[must_use]
    pub fn new(initial: PipelineState) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                state: initial,
                fatal: None,
            }),
        }
    }

    /// Clones the current state into a read-only snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.lock().state.snapshot()
    }

    /// Merges a node's proposed writes into the state, field by field,
    /// through the first-write-wins reducer. Atomic per call: concurrent
    /// `apply` invocations from different nodes never interleave within the
    /// record.
    pub fn apply(&self, node: &NodeName, update: NodeUpdate) {
        let mut inner = self.inner.lock();
        let state = &mut inner.state;
        merge_field(node, "product_a", &mut state.product_a, update.product_a);
        merge_field(node, "product_b", &mut state.product_b, update.product_b);
        merge_field(node, "content", &mut state.content, update.content);
        merge_field(node, "faq", &mut state.faq, update.faq);
        merge_field(node, "page", &mut state.page, update.page);
        merge_field(node, "comparison", &mut state.comparison, update.comparison);
    }

    /// Records a fatal error. The first error of the run wins; subsequent
    /// ones are logged at warn level and dropped.
    pub fn record_error(&self, event: ErrorEvent) {
        let mut inner = self.inner.lock();
        match &inner.fatal {
            Some(first) => {
                tracing::warn!(
                    first = %first,
                    suppressed = %event,
                    "suppressing subsequent error; first error wins"
                );
            }
            None => inner.fatal = Some(event),
        }
    }

    /// Returns `true` once a fatal error has been recorded.
    #[must_use]
    pub fn has_fatal_error(&self) -> bool {
        self.inner.lock().fatal.is_some()
    }

    /// Consumes the store, yielding the final state and the fatal slot.
    #[must_use]
    pub fn finish(self) -> (PipelineState, Option<ErrorEvent>) {
        let inner = self.inner.into_inner();
        (inner.state, inner.fatal)
    }
}

fn merge_field<T>(node: &NodeName, field: &'static str, slot: &mut Option<T>, incoming: Option<T>) {
    let Some(value) = incoming else { return };
    if slot.is_some() {
        tracing::warn!(node = %node, field, "discarding write to occupied field; first write wins");
    }
    *slot = FirstWriteWins.merge(slot.take(), value);
}
