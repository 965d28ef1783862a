use outfitter_common::{AppConfig, OutfitterError, Result};
use std::time::Duration;

/// Similarity a match must exceed to count as relevant
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.4;

/// Tunables for [`SearchEngine`](crate::SearchEngine)
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Minimum cosine similarity (exclusive)
    pub relevance_threshold: f32,

    /// Limit for each embedding or chat call
    pub gateway_timeout: Duration,

    /// Parallel embedding requests while indexing
    pub index_concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            gateway_timeout: Duration::from_secs(30),
            index_concurrency: 4,
        }
    }
}

impl From<&AppConfig> for SearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            relevance_threshold: config.relevance_threshold,
            gateway_timeout: config.gateway_timeout(),
            index_concurrency: config.index_concurrency,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        if !(-1.0..=1.0).contains(&self.relevance_threshold) {
            return Err(OutfitterError::config(format!(
                "Relevance threshold must be within [-1, 1], got {}",
                self.relevance_threshold
            )));
        }
        if self.gateway_timeout.is_zero() {
            return Err(OutfitterError::config("Gateway timeout must be greater than 0"));
        }
        if self.index_concurrency == 0 {
            return Err(OutfitterError::config("Index concurrency cannot be 0"));
        }
        Ok(())
    }
}
