//! Content-block fabrication.
//!
//! Pure transforms from a parsed [`Product`], with no model calls. Empty product
//! fields yield empty blocks rather than errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeContext, NodeError, NodeUpdate};
use crate::pipeline::product::Product;
use crate::state::StateSnapshot;

/// The full set of fabricated content blocks for a product page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentBlocks {
    pub summary_block: String,
    pub benefits_block: Vec<BenefitBlock>,
    pub usage_block: Vec<UsageStep>,
    pub ingredients_block: Vec<IngredientBlock>,
    pub side_effects_block: SideEffectsBlock,
    pub price_block: PriceBlock,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenefitBlock {
    pub benefit: String,
    pub explanation: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStep {
    pub step_number: usize,
    pub instruction: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientBlock {
    pub ingredient: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideEffectsBlock {
    pub description: String,
    pub severity: Severity,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBlock {
    pub value: Option<u64>,
    pub currency: String,
}

impl ContentBlocks {
    /// Fabricates every block from the product record.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            summary_block: summary(product),
            benefits_block: benefits(product),
            usage_block: usage_steps(&product.usage),
            ingredients_block: product
                .ingredients
                .iter()
                .map(|ingredient| IngredientBlock {
                    ingredient: ingredient.clone(),
                })
                .collect(),
            side_effects_block: SideEffectsBlock {
                description: product.side_effects.clone(),
                severity: severity(&product.side_effects),
            },
            price_block: price(&product.price),
        }
    }
}

fn summary(product: &Product) -> String {
    let skins = product.skin_type.join(", ").to_lowercase();
    let main_benefit = product
        .benefits
        .first()
        .map(|benefit| benefit.to_lowercase())
        .unwrap_or_default();
    format!(
        "{} with {} is suitable for {} skin and helps with {}.",
        product.name, product.concentration, skins, main_benefit
    )
    .trim()
    .to_string()
}

fn benefits(product: &Product) -> Vec<BenefitBlock> {
    product
        .benefits
        .iter()
        .map(|benefit| BenefitBlock {
            benefit: benefit.clone(),
            explanation: format!(
                "This product supports {} based on the provided product details.",
                benefit.to_lowercase()
            ),
        })
        .collect()
}

/// Splits free-form usage text into numbered steps. Bullet markers count as
/// sentence breaks.
fn usage_steps(raw: &str) -> Vec<UsageStep> {
    raw.replace('•', ".")
        .split('.')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .enumerate()
        .map(|(index, step)| UsageStep {
            step_number: index + 1,
            instruction: step.to_string(),
        })
        .collect()
}

fn severity(text: &str) -> Severity {
    let text = text.to_lowercase();
    if text.contains("tingling") || text.contains("mild") {
        Severity::Low
    } else if text.contains("rash") || text.contains("burn") {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn price(raw: &str) -> PriceBlock {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    PriceBlock {
        value: digits.parse().ok(),
        currency: "INR".to_string(),
    }
}

/// Fabricates [`ContentBlocks`] from the first parsed product.
///
/// Degrades instead of failing: without a parsed product it writes nothing
/// and the page is assembled without content blocks.
pub struct ContentBlockNode;

#[async_trait]
impl Node for ContentBlockNode {
    async fn run(
        &self,
        snapshot: StateSnapshot,
        ctx: NodeContext,
    ) -> Result<NodeUpdate, NodeError> {
        let Some(product) = snapshot.product_a else {
            tracing::warn!("content generation degraded: no parsed product");
            ctx.emit("content", "no parsed product; writing no content blocks")?;
            return Ok(NodeUpdate::new());
        };

        let blocks = ContentBlocks::from_product(&product);
        ctx.emit(
            "content",
            format!(
                "fabricated {} benefit blocks and {} usage steps",
                blocks.benefits_block.len(),
                blocks.usage_block.len()
            ),
        )?;
        Ok(NodeUpdate::new().with_content(blocks))
    }
}
