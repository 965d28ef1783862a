use chrono::{DateTime, Utc};
use outfitter_common::{OutfitterError, Product, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::similarity::cosine_similarity;

/// Product embedding plus the denormalized product fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Product ID
    pub id: i64,

    pub name: String,

    pub description: String,

    pub price: f64,

    pub image_url: String,

    /// Embedding of the synthesized product description
    pub vector: Vec<f32>,

    /// Timestamp when indexed
    pub indexed_at: DateTime<Utc>,
}

impl VectorRecord {
    pub fn from_product(product: &Product, vector: Vec<f32>) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            vector,
            indexed_at: Utc::now(),
        }
    }

    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Record with its similarity to a query
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: VectorRecord,

    /// Cosine similarity (-1.0 to 1.0, higher is closer)
    pub score: f32,
}

/// In-memory vector index keyed by product id
///
/// The first stored vector fixes the dimension; every later record and
/// query must match it.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: HashMap<i64, VectorRecord>,
    dimension: Option<usize>,
}

impl VectorIndex {
    /// Create new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record with the same id
    pub fn upsert(&mut self, record: VectorRecord) -> Result<i64> {
        if record.vector.is_empty() {
            return Err(OutfitterError::invalid_input(format!(
                "Product {} has an empty embedding",
                record.id
            )));
        }
        self.check_dimension(record.dimension())?;

        let id = record.id;
        self.dimension = Some(record.dimension());
        self.entries.insert(id, record);
        Ok(id)
    }

    /// Top `top_k` records by descending cosine similarity
    pub fn nearest(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredRecord>> {
        if self.entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.is_empty() {
            return Err(OutfitterError::invalid_input("Query embedding is empty"));
        }
        self.check_dimension(query.len())?;

        let mut results: Vec<ScoredRecord> = self
            .entries
            .values()
            .map(|record| {
                // NaN would sort above every real score under total_cmp
                let score = cosine_similarity(query, &record.vector);
                ScoredRecord {
                    score: if score.is_finite() { score } else { f32::NEG_INFINITY },
                    record: record.clone(),
                }
            })
            .collect();

        // Ties resolve to the lowest id so repeated searches agree
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        results.truncate(top_k);

        Ok(results)
    }

    /// Get entry by product id
    pub fn get(&self, id: i64) -> Option<&VectorRecord> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(OutfitterError::DimensionMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}
