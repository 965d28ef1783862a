use async_trait::async_trait;
use outfitter_common::{AppConfig, OutfitterError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::gateway::{ChatGateway, EmbeddingGateway};
use crate::retry::with_retry;
use crate::types::ChatMessage;

/// OpenAI-compatible REST client (`/embeddings` and `/chat/completions`)
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: Client,
    embedding_model: String,
    chat_model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        embedding_model: impl Into<String>,
        chat_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OutfitterError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("OpenAI-compatible client initialized: {}", base_url);
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            client,
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
            max_retries: 3,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| OutfitterError::config("OPENAI_API_KEY not set"))?;

        Ok(Self::new(
            &config.openai_base_url,
            api_key,
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

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: vec![text],
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OutfitterError::network(format!("Failed to send embedding request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OutfitterError::embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let result: EmbeddingResponse = response.json().await.map_err(|e| {
            OutfitterError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        first_embedding(result)
    }

    async fn try_complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.chat_model,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| OutfitterError::network(format!("Failed to send chat request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OutfitterError::chat(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| OutfitterError::chat(format!("Failed to parse chat response: {}", e)))?;

        first_choice(result)
    }
}

/// Lowest-index embedding of a batch response
fn first_embedding(response: EmbeddingResponse) -> Result<Vec<f32>> {
    response
        .data
        .into_iter()
        .min_by_key(|d| d.index)
        .map(|d| d.embedding)
        .filter(|embedding| !embedding.is_empty())
        .ok_or_else(|| OutfitterError::embedding("No embedding returned"))
}

fn first_choice(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| OutfitterError::chat("No completion returned"))
}

#[async_trait]
impl EmbeddingGateway for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.embedding_model,
            text.len()
        );
        with_retry("OpenAI embedding request", self.max_retries, || {
            self.try_embed(text)
        })
        .await
    }
}

#[async_trait]
impl ChatGateway for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            "Sending chat request - Model: {}, Messages: {}",
            self.chat_model,
            messages.len()
        );
        with_retry("OpenAI chat request", self.max_retries, || {
            self.try_complete(messages)
        })
        .await
    }
}
