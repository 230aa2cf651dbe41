use std::sync::Arc;

use miette::{IntoDiagnostic, Result, WrapErr};

use plait::artifacts::save_json;
use plait::graph::GraphBuilder;
use plait::pipeline::assemble::PageAssemblerNode;
use plait::pipeline::compare::ComparisonNode;
use plait::pipeline::content::ContentBlockNode;
use plait::pipeline::faq::FaqGenNode;
use plait::pipeline::llm::MistralClient;
use plait::pipeline::parse::{ParseNode, ProductSlot};
use plait::pipeline::product::ProductTemplate;
use plait::runner::PipelineRunner;
use plait::state::PipelineState;

#[tokio::main]
async fn main() -> Result<()> {
    plait::telemetry::init();
    dotenvy::dotenv().ok();

    let raw = std::fs::read_to_string("template.json")
        .into_diagnostic()
        .wrap_err("failed to read template.json")?;
    let templates: Vec<ProductTemplate> = serde_json::from_str(&raw)
        .into_diagnostic()
        .wrap_err("template.json is not a valid product array")?;

    let mut templates = templates.into_iter();
    let (Some(template_a), Some(template_b)) = (templates.next(), templates.next()) else {
        miette::bail!("template.json must contain at least 2 products");
    };
    tracing::info!("template loaded");

    let model = Arc::new(MistralClient::from_env()?);

    let graph = GraphBuilder::new()
        .add_node("parse_a", &[], ParseNode::new(ProductSlot::A))
        .add_node("parse_b", &[], ParseNode::new(ProductSlot::B))
        .add_node("content", &["parse_a"], ContentBlockNode)
        .add_node("faq", &["parse_a"], FaqGenNode::new(model.clone()))
        .add_node("page", &["content", "faq"], PageAssemblerNode)
        .add_node("compare", &["parse_a", "parse_b"], ComparisonNode::new(model))
        .build()?;

    let initial = PipelineState::builder()
        .with_template_a(template_a)
        .with_template_b(template_b)
        .build();

    let final_state = PipelineRunner::new(graph).run(initial).await?;

    let artifacts = [
        ("output/faq.json", final_state.faq.as_ref()),
        ("output/product_page.json", final_state.page.as_ref()),
        ("output/comparison_page.json", final_state.comparison.as_ref()),
    ];
    for (path, value) in artifacts {
        let Some(value) = value else { continue };
        if let Err(error) = save_json(value, path) {
            tracing::error!(%error, path, "failed to save artifact");
        }
    }

    Ok(())
}
