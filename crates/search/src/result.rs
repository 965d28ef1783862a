use outfitter_common::Product;
use serde::Serialize;

/// Answer to one search call
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Exactly one entry: the match, or the empty placeholder
    pub products: Vec<Product>,

    /// Generated text, or a description of what went wrong
    pub response: String,

    /// Similarity of the best candidate, when one was retrieved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SearchResult {
    pub fn new(found: Option<Product>, response: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            products: vec![found.unwrap_or_else(Product::placeholder)],
            response: response.into(),
            score,
        }
    }

    /// Result carrying an error message instead of a generated response
    pub fn failed(found: Option<Product>, message: impl Into<String>) -> Self {
        Self::new(found, message, None)
    }

    /// Matched product, if any
    pub fn product(&self) -> Option<&Product> {
        self.products.first().filter(|product| !product.is_placeholder())
    }

    pub fn is_match(&self) -> bool {
        self.product().is_some()
    }
}
