//! Catalog indexing
//!
//! Embeds every product's synthesized description and upserts it into the
//! vector store. One failing product is recorded and skipped; a dimension
//! mismatch stops the whole pass.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use outfitter_common::{Product, Result};
use outfitter_llm::{with_timeout, EmbeddingGateway};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::store::VectorStore;
use crate::types::VectorRecord;

/// Text embedded for a product
pub fn product_description(product: &Product) -> String {
    format!(
        "{} is a product that costs {} and is described as {}",
        product.name,
        product.display_price(),
        product.description
    )
}

/// Product that could not be indexed
#[derive(Debug, Clone, Serialize)]
pub struct IndexFailure {
    pub product_id: i64,
    pub reason: String,
}

/// Outcome of one fill pass
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    /// Products in the catalog
    pub total: usize,

    /// Products embedded and stored
    pub indexed: usize,

    pub failed: Vec<IndexFailure>,

    pub elapsed: Duration,

    pub completed_at: DateTime<Utc>,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.indexed == self.total
    }
}

/// Populates a [`VectorStore`] from catalog products
pub struct Indexer {
    embedder: Arc<dyn EmbeddingGateway>,
    store: Arc<dyn VectorStore>,
    concurrency: usize,
    embed_timeout: Duration,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn EmbeddingGateway>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            concurrency: 4,
            embed_timeout: Duration::from_secs(30),
        }
    }

    /// Embedding requests in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Limit for each product's embedding call
    pub fn with_timeout(mut self, embed_timeout: Duration) -> Self {
        self.embed_timeout = embed_timeout;
        self
    }

    /// Embed and upsert every product
    pub async fn fill(&self, products: Vec<Product>) -> Result<IndexReport> {
        let started = Instant::now();
        let total = products.len();
        let mut indexed = 0;
        let mut failed = Vec::new();

        if total == 0 {
            info!("Catalog is empty, nothing to index");
        } else {
            info!(
                "Indexing {} products (concurrency={})",
                total, self.concurrency
            );
        }

        let mut embedded = stream::iter(products)
            .map(move |product| async move {
                let text = product_description(&product);
                let result = with_timeout(
                    "product embedding",
                    self.embed_timeout,
                    self.embedder.embed(&text),
                )
                .await;
                (product, result)
            })
            .buffer_unordered(self.concurrency);

        while let Some((product, result)) = embedded.next().await {
            let outcome = match result {
                Ok(vector) => self
                    .store
                    .upsert(VectorRecord::from_product(&product, vector))
                    .await
                    .map(|_| ()),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => indexed += 1,
                Err(e) if e.is_fatal() => {
                    error!("Indexing aborted at product {}: {}", product.id, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Skipping product {} ({}): {}", product.id, product.name, e);
                    failed.push(IndexFailure {
                        product_id: product.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = IndexReport {
            total,
            indexed,
            failed,
            elapsed: started.elapsed(),
            completed_at: Utc::now(),
        };

        info!(
            "Indexing completed - {}/{} products indexed, {} failed, took {:?}",
            report.indexed,
            report.total,
            report.failed.len(),
            report.elapsed
        );
        Ok(report)
    }
}
