//! Product comparison through a chat model.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::node::{Node, NodeContext, NodeError, NodeUpdate};
use crate::pipeline::llm::ChatModel;
use crate::pipeline::product::Product;
use crate::state::StateSnapshot;

/// Compares the two parsed products and recommends one.
///
/// Best-effort like the other enrichment nodes: any failure degrades to "no
/// comparison" with a warning.
pub struct ComparisonNode {
    model: Arc<dyn ChatModel>,
}

impl ComparisonNode {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

fn comparison_prompt(product_a: &Product, product_b: &Product) -> Result<String, NodeError> {
    let first = serde_json::to_string_pretty(product_a)?;
    let second = serde_json::to_string_pretty(product_b)?;
    Ok(format!(
        "You are an expert product review agent with over 15 years of experience, a sharp \
         eye for detail, and the ability to extract meaningful insights from a product. \
         Compare the following two products and reply as per the desired output structure.\n\
         \n\
         Products to compare -\n\
         Product A - {first}\n\
         Product B - {second}\n\
         \n\
         Output structure -\n\
         Product A - summarise Product A\n\
         Product B - summarise Product B\n\
         Comparison - 3 points of differentiation between the products, each with a conclusion\n\
         Recommendation - recommend the right product for a user\n\
         \n\
         Guardrails:\n\
         1. Give factual and concise answers only.\n\
         2. Use the product names in place of \"Product A\" and \"Product B\".\n\
         3. Do not assume anything.\n\
         4. The summary and recommendation must be strictly less than 200 words.\n\
         5. Reply with a plain JSON object; no markdown fences.\n"
    ))
}

#[async_trait]
impl Node for ComparisonNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError> {
        let (Some(product_a), Some(product_b)) = (snapshot.product_a, snapshot.product_b) else {
            tracing::warn!("comparison degraded: both parsed products are required");
            ctx.emit("compare", "missing parsed products; writing no comparison")?;
            return Ok(NodeUpdate::new());
        };

        let prompt = comparison_prompt(&product_a, &product_b)?;
        ctx.emit(
            "compare",
            format!("comparing '{}' with '{}'", product_a.name, product_b.name),
        )?;

        let reply = match self.model.complete(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "comparison failed; proceeding without it");
                ctx.emit("compare", "model call failed; writing no comparison")?;
                return Ok(NodeUpdate::new());
            }
        };

        match serde_json::from_str::<Value>(&reply) {
            Ok(value) if value.is_object() => {
                ctx.emit("compare", "comparison generated")?;
                Ok(NodeUpdate::new().with_comparison(value))
            }
            _ => {
                tracing::warn!("comparison reply was not a JSON object; proceeding without it");
                ctx.emit("compare", "unusable model reply; writing no comparison")?;
                Ok(NodeUpdate::new())
            }
        }
    }
}
