//! Outfitter product search
//!
//! Embeds a free-text query, retrieves the closest catalog product and asks
//! a chat model to phrase a response around it.

mod engine;
pub mod options;
pub mod prompt;
pub mod relevance;
mod result;

pub use engine::SearchEngine;
pub use options::{SearchOptions, DEFAULT_RELEVANCE_THRESHOLD};
pub use result::SearchResult;
