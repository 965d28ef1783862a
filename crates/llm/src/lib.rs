//! Outfitter model gateways
//!
//! Embedding and chat clients for Ollama and OpenAI-compatible APIs,
//! plus the prompt templates used by product search.

mod client;
mod gateway;
mod openai;
pub mod prompts;
mod retry;
mod types;

pub use client::OllamaClient;
pub use gateway::{with_timeout, ChatGateway, EmbeddingGateway, Gateways};
pub use openai::OpenAiClient;
pub use prompts::{no_match_prompt, product_prompt, SYSTEM_PROMPT};
pub use types::{ChatMessage, ChatRequest, ChatResponse, EmbedRequest, EmbedResponse, Role};
