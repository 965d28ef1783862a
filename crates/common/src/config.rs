use crate::error::OutfitterError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides (`OUTFITTER_CHAT_MODEL=...`)
pub const ENV_PREFIX: &str = "OUTFITTER";

/// Which service hosts the embedding and chat models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible REST API (OpenAI, Azure OpenAI proxies, vLLM, ...)
    OpenAi,
}

/// Outfitter application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model provider backing both gateways
    pub provider: ModelProvider,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// OpenAI-compatible API base URL
    pub openai_base_url: String,

    /// API key for the OpenAI-compatible provider
    pub openai_api_key: Option<String>,

    /// Embedding model name
    pub embedding_model: String,

    /// Chat completion model name
    pub chat_model: String,

    /// Product catalog file (JSON array)
    pub catalog_path: PathBuf,

    /// Minimum similarity a match must exceed
    pub relevance_threshold: f32,

    /// Upper bound for a single gateway call made by the search pipeline
    pub gateway_timeout_secs: u64,

    /// HTTP client timeout
    pub http_timeout_secs: u64,

    /// Retries per HTTP request
    pub max_retries: u32,

    /// Parallel embedding requests while indexing
    pub index_concurrency: usize,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::Ollama,
            ollama_base_url: "http://localhost:11434".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_api_key: None,
            embedding_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.2:latest".to_string(),
            catalog_path: PathBuf::from("./data/products.json"),
            relevance_threshold: 0.4,
            gateway_timeout_secs: 30,
            http_timeout_secs: 300,
            max_retries: 3,
            index_concurrency: 4,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then an optional TOML file, then
    /// `OUTFITTER_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, OutfitterError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(OutfitterError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path.to_path_buf()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Ok(config)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), OutfitterError> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir).map_err(|e| {
                OutfitterError::config(format!(
                    "Failed to create directory {}: {}",
                    self.log_dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }

    /// Base URL of the configured provider
    pub fn provider_base_url(&self) -> &str {
        match self.provider {
            ModelProvider::Ollama => &self.ollama_base_url,
            ModelProvider::OpenAi => &self.openai_base_url,
        }
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), OutfitterError> {
        let base_url = self.provider_base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(OutfitterError::config(format!(
                "Provider base URL must start with http:// or https://: {}",
                base_url
            )));
        }

        if self.provider == ModelProvider::OpenAi && self.openai_api_key.is_none() {
            return Err(OutfitterError::config(
                "openai provider requires OUTFITTER_OPENAI_API_KEY or OPENAI_API_KEY",
            ));
        }

        if self.embedding_model.is_empty() || self.chat_model.is_empty() {
            return Err(OutfitterError::config("Model names cannot be empty"));
        }

        // Cosine similarity lives in [-1, 1]
        if !(-1.0..=1.0).contains(&self.relevance_threshold) {
            return Err(OutfitterError::config(format!(
                "Relevance threshold must be within [-1, 1], got {}",
                self.relevance_threshold
            )));
        }

        if self.gateway_timeout_secs == 0 || self.http_timeout_secs == 0 {
            return Err(OutfitterError::config("Timeouts must be greater than 0"));
        }

        if self.index_concurrency == 0 {
            return Err(OutfitterError::config("Index concurrency cannot be 0"));
        }

        Ok(())
    }
}
