//! Product records flowing through the pipeline.
//!
//! [`ProductTemplate`] is the raw record as it appears in `template.json`;
//! [`Product`] is the normalized form every downstream node works with.

use serde::{Deserialize, Serialize};

/// Raw product record as read from a template file.
///
/// Every field is optional in the file; missing fields deserialize to their
/// empty defaults so a sparse template still parses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductTemplate {
    pub product_name: String,
    pub concentration: String,
    pub skin_type: Vec<String>,
    pub key_ingredients: Vec<String>,
    pub how_to_use: String,
    pub benefits: Vec<String>,
    pub price: String,
    pub side_effects: String,
}

/// Normalized product record produced by the parse stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub concentration: String,
    pub skin_type: Vec<String>,
    pub ingredients: Vec<String>,
    pub usage: String,
    pub benefits: Vec<String>,
    pub price: String,
    pub side_effects: String,
}

impl Product {
    /// Normalizes a raw template into a [`Product`].
    #[must_use]
    pub fn from_template(template: ProductTemplate) -> Self {
        Self {
            name: template.product_name,
            concentration: template.concentration,
            skin_type: template.skin_type,
            ingredients: template.key_ingredients,
            usage: template.how_to_use,
            benefits: template.benefits,
            price: template.price,
            side_effects: template.side_effects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_template_fills_defaults() {
        let template: ProductTemplate =
            serde_json::from_str(r#"{"product_name": "Niacinamide Serum"}"#).unwrap();
        assert_eq!(template.product_name, "Niacinamide Serum");
        assert!(template.benefits.is_empty());
        assert!(template.price.is_empty());
    }

    #[test]
    fn normalization_renames_template_fields() {
        let template: ProductTemplate = serde_json::from_str(
            r#"{
                "product_name": "Vitamin C Serum",
                "key_ingredients": ["ascorbic acid"],
                "how_to_use": "Apply in the morning."
            }"#,
        )
        .unwrap();
        let product = Product::from_template(template);
        assert_eq!(product.name, "Vitamin C Serum");
        assert_eq!(product.ingredients, vec!["ascorbic acid".to_string()]);
        assert_eq!(product.usage, "Apply in the morning.");
    }
}
