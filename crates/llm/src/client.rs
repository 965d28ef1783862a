use async_trait::async_trait;
use outfitter_common::{AppConfig, OutfitterError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::gateway::{ChatGateway, EmbeddingGateway};
use crate::retry::with_retry;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, EmbedRequest, EmbedResponse};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
    embedding_model: String,
    chat_model: String,
    max_retries: u32,
}

impl OllamaClient {
    /// Create new Ollama client
    pub fn new(
        base_url: impl Into<String>,
        embedding_model: impl Into<String>,
        chat_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OutfitterError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Ollama client initialized: {}", base_url);
        Ok(Self {
            base_url,
            client,
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
            max_retries: 3,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            &config.ollama_base_url,
            &config.embedding_model,
            &config.chat_model,
            config.http_timeout(),
        )?
        .with_max_retries(config.max_retries))
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate embedding for text (with retry logic)
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbedRequest {
            model: self.embedding_model.clone(),
            prompt: text.to_string(),
        };

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            request.model,
            text.len()
        );

        let embedding = with_retry("Ollama embedding request", self.max_retries, || {
            self.try_embed(&url, &request)
        })
        .await?;

        debug!("Received embedding - Dimension: {}", embedding.len());
        Ok(embedding)
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| OutfitterError::network(format!("Failed to send embedding request: {}", e)))?
            .error_for_status()
            .map_err(|e| OutfitterError::embedding(format!("Ollama embedding API error: {}", e)))?;

        let result: EmbedResponse = response.json().await.map_err(|e| {
            OutfitterError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if result.embedding.is_empty() {
            return Err(OutfitterError::embedding("Empty embedding from Ollama"));
        }

        Ok(result.embedding)
    }

    /// Run a chat completion (with retry logic)
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: messages.to_vec(),
            stream: false,
        };

        debug!(
            "Sending chat request to Ollama - Model: {}, Messages: {}",
            request.model,
            request.messages.len()
        );

        with_retry("Ollama chat request", self.max_retries, || {
            self.try_chat(&url, &request)
        })
        .await
    }

    /// Single attempt to run a chat completion
    async fn try_chat(&self, url: &str, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| OutfitterError::network(format!("Failed to send chat request: {}", e)))?
            .error_for_status()
            .map_err(|e| OutfitterError::chat(format!("Ollama chat API error: {}", e)))?;

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| OutfitterError::chat(format!("Failed to parse chat response: {}", e)))?;

        if result.message.content.trim().is_empty() {
            return Err(OutfitterError::chat("Empty response from Ollama"));
        }

        debug!(
            "Received response from Ollama - Model: {}, Length: {}, Done: {}",
            result.model,
            result.message.content.len(),
            result.done
        );
        Ok(result.message.content)
    }
}

#[async_trait]
impl EmbeddingGateway for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }
}

#[async_trait]
impl ChatGateway for OllamaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.chat(messages).await
    }
}
