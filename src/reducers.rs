//! Merge policies for concurrent writes to a shared state field.
//!
//! A [`Reducer`] is a pure function from `(existing, incoming)` to the
//! resolved field value. The store invokes one per written field; the reducer
//! itself never logs or mutates, which keeps the conflict policy auditable and
//! testable in isolation.

/// Pure merge policy for one state field.
pub trait Reducer<T>: Send + Sync {
    /// Resolves an incoming write against the existing field value.
    fn merge(&self, existing: Option<T>, incoming: T) -> Option<T>;
}

/// Keeps the existing value and discards the incoming one.
///
/// The default policy for every pipeline field: no two nodes are supposed to
/// write the same field, so this only decides the outcome when a graph author
/// breaks that rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FirstWriteWins;

impl<T> Reducer<T> for FirstWriteWins {
    fn merge(&self, existing: Option<T>, incoming: T) -> Option<T> {
        match existing {
            Some(kept) => Some(kept),
            None => Some(incoming),
        }
    }
}
