//! Template parsing nodes.

use async_trait::async_trait;

use crate::node::{Node, NodeContext, NodeError, NodeUpdate};
use crate::pipeline::product::Product;
use crate::state::StateSnapshot;

/// Which product slot a [`ParseNode`] reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSlot {
    A,
    B,
}

/// Normalizes one raw template into a [`Product`].
///
/// This node is fatal on failure: a missing template or a template without a
/// product name is an irrecoverable upstream problem, and every dependent of
/// this node is skipped.
pub struct ParseNode {
    slot: ProductSlot,
}

impl ParseNode {
    #[must_use]
    pub fn new(slot: ProductSlot) -> Self {
        Self { slot }
    }
}

#[async_trait]
impl Node for ParseNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError> {
        let (template, what) = match self.slot {
            ProductSlot::A => (snapshot.template_a, "template_a"),
            ProductSlot::B => (snapshot.template_b, "template_b"),
        };
        let template = template.ok_or(NodeError::MissingInput { what })?;
        if template.product_name.trim().is_empty() {
            return Err(NodeError::ValidationFailed(format!(
                "{what} has no product_name"
            )));
        }

        let product = Product::from_template(template);
        ctx.emit("parse", format!("parsed product '{}'", product.name))?;
        Ok(match self.slot {
            ProductSlot::A => NodeUpdate::new().with_product_a(product),
            ProductSlot::B => NodeUpdate::new().with_product_b(product),
        })
    }
}
