//! FAQ generation through a chat model.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::node::{Node, NodeContext, NodeError, NodeUpdate};
use crate::pipeline::llm::ChatModel;
use crate::pipeline::product::Product;
use crate::state::StateSnapshot;

/// Generates grounded FAQs for the first product.
///
/// Best-effort enrichment: provider failures and unparseable replies degrade
/// to "no FAQ" with a warning instead of failing the run.
pub struct FaqGenNode {
    model: Arc<dyn ChatModel>,
}

impl FaqGenNode {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }
}

fn faq_prompt(product: &Product) -> Result<String, NodeError> {
    let data = serde_json::to_string_pretty(product)?;
    Ok(format!(
        "You are an AI FAQ generator. You must create FAQs ONLY using the information \
         from the product data below. You are NOT allowed to add external facts.\n\
         \n\
         STRICT RULES:\n\
         - Use ONLY the information provided.\n\
         - No outside knowledge.\n\
         - No invented benefits or ingredients.\n\
         - 15 Q&A pairs.\n\
         - Keep answers factual and grounded.\n\
         - Reply with a plain JSON object; no markdown fences.\n\
         \n\
         PRODUCT DATA:\n\
         {data}\n\
         \n\
         Output structure -\n\
         FAQs:\n\
             Id - \"integer\"\n\
             Question - \"string\"\n\
             Answer - \"string\"\n"
    ))
}

#[async_trait]
impl Node for FaqGenNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError> {
        let Some(product) = snapshot.product_a else {
            tracing::warn!("FAQ generation degraded: no parsed product");
            ctx.emit("faq", "no parsed product; writing no FAQ")?;
            return Ok(NodeUpdate::new());
        };

        let prompt = faq_prompt(&product)?;
        ctx.emit("faq", format!("requesting FAQs for '{}'", product.name))?;

        let reply = match self.model.complete(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(%error, "FAQ generation failed; proceeding without FAQs");
                ctx.emit("faq", "model call failed; writing no FAQ")?;
                return Ok(NodeUpdate::new());
            }
        };

        match serde_json::from_str::<Value>(&reply) {
            Ok(value) if value.is_object() => {
                ctx.emit("faq", "FAQ object generated")?;
                Ok(NodeUpdate::new().with_faq(value))
            }
            _ => {
                tracing::warn!("FAQ reply was not a JSON object; proceeding without FAQs");
                ctx.emit("faq", "unusable model reply; writing no FAQ")?;
                Ok(NodeUpdate::new())
            }
        }
    }
}
