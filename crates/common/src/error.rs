use std::time::Duration;

/// Outfitter error types
#[derive(Debug, thiserror::Error)]
pub enum OutfitterError {
    /// Embedding service error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Chat completion service error
    #[error("Chat error: {0}")]
    Chat(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// External call did not finish in time
    #[error("Timed out after {limit:?}: {operation}")]
    Timeout { operation: String, limit: Duration },

    /// Product catalog error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Vector length differs from the dimension already held by the index
    #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OutfitterError {
    /// Create embedding error
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create chat error
    pub fn chat<S: Into<String>>(msg: S) -> Self {
        Self::Chat(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create timeout error
    pub fn timeout<S: Into<String>>(operation: S, limit: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            limit,
        }
    }

    /// Create catalog error
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Configuration errors cannot be fixed by retrying and should stop startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::DimensionMismatch { .. })
    }

    /// Failures of the embedding or chat services (including timeouts).
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            Self::Embedding(_) | Self::Chat(_) | Self::Network(_) | Self::Timeout { .. }
        )
    }
}

impl From<config::ConfigError> for OutfitterError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
