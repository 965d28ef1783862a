use async_trait::async_trait;
use outfitter_common::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{ScoredRecord, VectorIndex, VectorRecord};

/// Storage backend for product vectors
///
/// Search and indexing only talk to this trait, so a persistent backend can
/// replace [`InMemoryVectorStore`] without touching them.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace the record with the same id; returns the id
    async fn upsert(&self, record: VectorRecord) -> Result<i64>;

    /// Up to `top_k` records, most similar first. An empty store yields an
    /// empty list.
    async fn nearest_neighbor(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredRecord>>;

    /// Number of stored records
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-lifetime vector store
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    index: Arc<RwLock<VectorIndex>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of the record for a product id
    pub async fn get(&self, id: i64) -> Option<VectorRecord> {
        self.index.read().await.get(id).cloned()
    }

    /// Embedding dimension, once the first record is stored
    pub async fn dimension(&self) -> Option<usize> {
        self.index.read().await.dimension()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, record: VectorRecord) -> Result<i64> {
        let mut index = self.index.write().await;
        let id = index.upsert(record)?;
        debug!("Upserted vector record {} ({} total)", id, index.len());
        Ok(id)
    }

    async fn nearest_neighbor(&self, query: &[f32], top_k: usize) -> Result<Vec<ScoredRecord>> {
        let index = self.index.read().await;
        let results = index.nearest(query, top_k)?;
        debug!(
            "Nearest neighbor search - {} results from {} records",
            results.len(),
            index.len()
        );
        Ok(results)
    }

    async fn len(&self) -> usize {
        self.index.read().await.len()
    }
}
