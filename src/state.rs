//! Shared pipeline state.
//!
//! State is a fixed-shape record: one typed field per value the pipeline can
//! produce, where `None` is the field's defined "empty" sentinel. Nodes never
//! touch the live record; they receive a [`StateSnapshot`] and return a
//! [`NodeUpdate`](crate::node::NodeUpdate), which the
//! [`StateStore`](crate::store::StateStore) merges through per-field reducers.
//!
//! The `template_*` fields are inputs: they are seeded before the run and no
//! node writes them. Everything else is a node output.
//!
//! # Examples
//!
//! ```rust
//! use plait::pipeline::product::ProductTemplate;
//! use plait::state::PipelineState;
//!
//! let state = PipelineState::builder()
//!     .with_template_a(ProductTemplate {
//!         product_name: "Retinol Night Cream".into(),
//!         ..Default::default()
//!     })
//!     .build();
//!
//! let snapshot = state.snapshot();
//! assert!(snapshot.template_a.is_some());
//! assert!(snapshot.product_a.is_none());
//! ```

use serde_json::Value;

use crate::pipeline::content::ContentBlocks;
use crate::pipeline::product::{Product, ProductTemplate};

/// The single shared state record for one pipeline run.
///
/// Created fresh per invocation, mutated only through
/// [`StateStore::apply`](crate::store::StateStore::apply), and discarded (or
/// returned to the caller) when the run terminates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineState {
    /// Raw template for the first product (seeded input).
    pub template_a: Option<ProductTemplate>,
    /// Raw template for the second product (seeded input).
    pub template_b: Option<ProductTemplate>,
    /// Parsed first product.
    pub product_a: Option<Product>,
    /// Parsed second product.
    pub product_b: Option<Product>,
    /// Fabricated content blocks for the first product.
    pub content: Option<ContentBlocks>,
    /// Generated FAQ object for the first product.
    pub faq: Option<Value>,
    /// Assembled product-page object.
    pub page: Option<Value>,
    /// Product comparison object.
    pub comparison: Option<Value>,
}

/// Read-only, point-in-time view of the pipeline state.
///
/// Handed to node functions at dispatch; independent of the live record, so
/// concurrent merges never show through mid-execution.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    pub template_a: Option<ProductTemplate>,
    pub template_b: Option<ProductTemplate>,
    pub product_a: Option<Product>,
    pub product_b: Option<Product>,
    pub content: Option<ContentBlocks>,
    pub faq: Option<Value>,
    pub page: Option<Value>,
    pub comparison: Option<Value>,
}

impl PipelineState {
    /// Creates a builder for seeding initial inputs.
    #[must_use]
    pub fn builder() -> StateBuilder {
        StateBuilder::default()
    }

    /// Clones the current field values into an immutable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            template_a: self.template_a.clone(),
            template_b: self.template_b.clone(),
            product_a: self.product_a.clone(),
            product_b: self.product_b.clone(),
            content: self.content.clone(),
            faq: self.faq.clone(),
            page: self.page.clone(),
            comparison: self.comparison.clone(),
        }
    }
}

/// Fluent builder for the initial [`PipelineState`].
#[derive(Debug, Default)]
pub struct StateBuilder {
    template_a: Option<ProductTemplate>,
    template_b: Option<ProductTemplate>,
}

impl StateBuilder {
    /// Seeds the first product template.
    #[must_use]
    pub fn with_template_a(mut self, template: ProductTemplate) -> Self {
        self.template_a = Some(template);
        self
    }

    /// Seeds the second product template.
    #[must_use]
    pub fn with_template_b(mut self, template: ProductTemplate) -> Self {
        self.template_b = Some(template);
        self
    }

    /// Builds the initial state; all output fields start empty.
    #[must_use]
    pub fn build(self) -> PipelineState {
        PipelineState {
            template_a: self.template_a,
            template_b: self.template_b,
            ..Default::default()
        }
    }
}
