//! The fatal-error record surfaced as a pipeline's outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::node::NodeError;
use crate::types::NodeName;

/// A recorded node failure: when it happened, where, and why.
///
/// Exactly one of these can occupy the store's fatal slot per run; the first
/// one recorded wins (see
/// [`StateStore::record_error`](crate::store::StateStore::record_error)).
/// The node identity is stored in display form to keep the record
/// serialization-friendly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub when: DateTime<Utc>,
    pub node: String,
    pub message: String,
}

impl ErrorEvent {
    /// Records a node failure at the current instant.
    #[must_use]
    pub fn node_failure(node: &NodeName, error: &NodeError) -> Self {
        Self {
            when: Utc::now(),
            node: node.to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {} failed: {}", self.node, self.message)
    }
}
