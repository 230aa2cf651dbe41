//! The product-content pipeline: the node bodies the orchestrator runs.
//!
//! Two raw product templates come in; out come a parsed pair of products,
//! fabricated content blocks, a model-generated FAQ, an assembled product
//! page, and a model-generated comparison.
//!
//! Failure policy per node (see [`crate::node`]):
//! - [`parse::ParseNode`] is fatal: a product that cannot be parsed stops
//!   everything downstream of it.
//! - [`content::ContentBlockNode`], [`faq::FaqGenNode`],
//!   [`assemble::PageAssemblerNode`] and [`compare::ComparisonNode`] degrade:
//!   on failure they emit a warning and write nothing, so the run continues
//!   and the corresponding artifact is simply absent.

pub mod assemble;
pub mod compare;
pub mod content;
pub mod faq;
pub mod llm;
pub mod parse;
pub mod product;
