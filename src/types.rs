//! Core identifiers for pipeline graphs.
//!
//! [`NodeName`] identifies a unit of work in the dependency graph. `Start` is
//! the single virtual root: it is never registered and never executed, and
//! every node with no declared predecessors implicitly hangs off it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a node within a pipeline graph.
///
/// # Examples
///
/// ```rust
/// use plait::types::NodeName;
///
/// let parse: NodeName = "parse_a".into();
/// assert!(parse.is_custom());
/// assert_eq!(parse.to_string(), "parse_a");
///
/// let root: NodeName = "Start".into();
/// assert!(root.is_start());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeName {
    /// Virtual root of every graph. Never registered, never executed; its
    /// completion status is always treated as done.
    Start,

    /// A registered, executable node, identified by a unique string.
    Custom(String),
}

impl NodeName {
    /// Returns `true` if this is the virtual [`Start`](Self::Start) root.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns `true` if this names a registered node.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

// Developer experience: allow string literals where a NodeName is expected.
impl From<&str> for NodeName {
    fn from(s: &str) -> Self {
        match s {
            "Start" => NodeName::Start,
            other => NodeName::Custom(other.to_string()),
        }
    }
}

impl From<String> for NodeName {
    fn from(s: String) -> Self {
        NodeName::from(s.as_str())
    }
}
