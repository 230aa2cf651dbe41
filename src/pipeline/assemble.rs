//! Product-page assembly.

use async_trait::async_trait;
use rand::Rng;
use serde_json::{Map, Value, json};

use crate::node::{Node, NodeContext, NodeError, NodeUpdate};
use crate::state::StateSnapshot;

/// Merges the parsed product, content blocks, and FAQ into one page object.
///
/// Always produces a page: absent or malformed inputs degrade to warnings and
/// the page is assembled from whatever is available.
pub struct PageAssemblerNode;

#[async_trait]
impl Node for PageAssemblerNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError> {
        let mut page = Map::new();
        page.insert(
            "id".to_string(),
            json!(rand::rng().random_range(1_000_000..10_000_000_u64)),
        );

        let product_name = match &snapshot.product_a {
            Some(product) => product.name.clone(),
            None => {
                ctx.emit("page", "no parsed product; assembling page without a name")?;
                String::new()
            }
        };
        page.insert("product_name".to_string(), Value::String(product_name));

        match snapshot.content {
            Some(content) => {
                let rendered = serde_json::to_value(content)?;
                if let Value::Object(fields) = rendered {
                    page.extend(fields);
                }
            }
            None => ctx.emit("page", "no content blocks; assembling page without them")?,
        }

        match snapshot.faq {
            Some(Value::Object(fields)) => page.extend(fields),
            Some(_) => {
                tracing::warn!("FAQ value is not a JSON object; ignoring it");
                ctx.emit("page", "FAQ is not a JSON object; ignoring it")?;
            }
            None => ctx.emit("page", "no FAQ; assembling page without it")?,
        }

        ctx.emit("page", format!("assembled page with {} fields", page.len()))?;
        Ok(NodeUpdate::new().with_page(Value::Object(page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::content::ContentBlocks;
    use crate::pipeline::product::Product;
    use crate::state::PipelineState;

    fn ctx() -> (NodeContext, flume::Receiver<crate::events::Event>) {
        let (tx, rx) = flume::unbounded();
        (
            NodeContext {
                node: "page".into(),
                run_id: "run-test".into(),
                pass: 3,
                events: tx,
            },
            rx,
        )
    }

    fn page_of(update: NodeUpdate) -> Map<String, Value> {
        match update.page {
            Some(Value::Object(map)) => map,
            other => panic!("expected page object, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn merges_product_content_and_faq() {
        let mut state = PipelineState::default();
        state.product_a = Some(Product {
            name: "Niacinamide Serum".into(),
            ..Default::default()
        });
        state.content = Some(ContentBlocks {
            summary_block: "A short summary.".into(),
            ..Default::default()
        });
        state.faq = Some(json!({"FAQs": [{"Id": 1}]}));

        let (ctx, _events) = ctx();
        let update = PageAssemblerNode.run(state.snapshot(), ctx).await.unwrap();
        let page = page_of(update);

        assert_eq!(page["product_name"], json!("Niacinamide Serum"));
        assert_eq!(page["summary_block"], json!("A short summary."));
        assert_eq!(page["FAQs"], json!([{"Id": 1}]));
        let id = page["id"].as_u64().unwrap();
        assert!((1_000_000..10_000_000).contains(&id));
    }

    #[tokio::test]
    async fn degrades_when_everything_is_missing() {
        let (ctx, _events) = ctx();
        let update = PageAssemblerNode
            .run(PipelineState::default().snapshot(), ctx)
            .await
            .unwrap();
        let page = page_of(update);
        assert_eq!(page["product_name"], json!(""));
        assert!(page.contains_key("id"));
    }

    #[tokio::test]
    async fn non_object_faq_is_ignored() {
        let mut state = PipelineState::default();
        state.faq = Some(json!(["not", "an", "object"]));
        let (ctx, _events) = ctx();
        let update = PageAssemblerNode.run(state.snapshot(), ctx).await.unwrap();
        let page = page_of(update);
        assert!(!page.contains_key("FAQs"));
        assert!(!page.values().any(|v| v == &json!("not")));
    }
}
