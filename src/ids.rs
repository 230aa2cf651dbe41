//! Run identifier generation.

use uuid::Uuid;

/// Generates unique run identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdGenerator;

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// A fresh `run-<uuid>` identifier.
    #[must_use]
    pub fn generate_run_id(&self) -> String {
        format!("run-{}", Uuid::new_v4())
    }
}
