//! Outfitter vector index
//!
//! In-memory product embeddings, cosine nearest-neighbor search and the
//! catalog indexer that fills them.

pub mod indexer;
pub mod similarity;
pub mod store;
pub mod types;

pub use indexer::{product_description, IndexFailure, IndexReport, Indexer};
pub use similarity::cosine_similarity;
pub use store::{InMemoryVectorStore, VectorStore};
pub use types::{ScoredRecord, VectorIndex, VectorRecord};
