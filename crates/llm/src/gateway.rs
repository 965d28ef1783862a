use async_trait::async_trait;
use outfitter_common::{AppConfig, ModelProvider, OutfitterError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::client::OllamaClient;
use crate::openai::OpenAiClient;
use crate::types::ChatMessage;

/// Text to embedding vector
///
/// Indexing and querying must go through the same model so every vector
/// has the same dimension.
#[async_trait]
pub trait EmbeddingGateway: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Message sequence to generated text
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Returns the first generated message
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Both gateways for the configured provider
#[derive(Clone)]
pub struct Gateways {
    pub embedder: Arc<dyn EmbeddingGateway>,
    pub chat: Arc<dyn ChatGateway>,
}

impl Gateways {
    /// Build HTTP-backed gateways from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.provider {
            ModelProvider::Ollama => {
                let client = Arc::new(OllamaClient::from_config(config)?);
                Ok(Self {
                    embedder: client.clone(),
                    chat: client,
                })
            }
            ModelProvider::OpenAi => {
                let client = Arc::new(OpenAiClient::from_config(config)?);
                Ok(Self {
                    embedder: client.clone(),
                    chat: client,
                })
            }
        }
    }
}

/// Bound a gateway call; running out of time is a gateway failure.
pub async fn with_timeout<T>(
    operation: &str,
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| OutfitterError::timeout(operation, limit))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, OutfitterError>(vec![1.0_f32])
        };
        let err = with_timeout("query embedding", Duration::from_secs(1), slow)
            .await
            .unwrap_err();
        assert!(matches!(err, OutfitterError::Timeout { .. }));
        assert!(err.is_gateway_failure());
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        let fast = async { Err::<(), _>(OutfitterError::chat("rate limited")) };
        let err = with_timeout("chat completion", Duration::from_secs(1), fast)
            .await
            .unwrap_err();
        assert!(matches!(err, OutfitterError::Chat(_)));
    }

    #[test]
    fn test_gateways_from_default_config() {
        assert!(Gateways::from_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_openai_gateways_need_key() {
        let mut config = AppConfig::default();
        config.provider = ModelProvider::OpenAi;
        config.openai_api_key = None;
        assert!(Gateways::from_config(&config).is_err());

        config.openai_api_key = Some("sk-test".to_string());
        assert!(Gateways::from_config(&config).is_ok());
    }
}
