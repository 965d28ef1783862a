pub mod catalog;
pub mod config;
pub mod error;
pub mod logger;
pub mod product;

// Re-export commonly used types
pub use catalog::{Catalog, InMemoryCatalog, JsonCatalog};
pub use config::{AppConfig, ModelProvider};
pub use error::OutfitterError;
pub use product::Product;
pub type Result<T> = std::result::Result<T, OutfitterError>;
