//! Product catalog collaborators
//!
//! The search pipeline only ever lists the whole catalog, once, when it
//! builds its vector index.

use crate::error::OutfitterError;
use crate::product::Product;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Read-only source of products
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List every product in the catalog
    async fn list_products(&self) -> Result<Vec<Product>>;
}

/// Catalog held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }
}

/// Catalog backed by a JSON file holding an array of products
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    file_path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    async fn list_products(&self) -> Result<Vec<Product>> {
        if !self.file_path.exists() {
            return Err(OutfitterError::catalog(format!(
                "Catalog file not found: {}",
                self.file_path.display()
            )));
        }

        let data = tokio::fs::read_to_string(&self.file_path).await?;
        let products: Vec<Product> = serde_json::from_str(&data).map_err(|e| {
            OutfitterError::catalog(format!(
                "Invalid catalog file {}: {}",
                self.file_path.display(),
                e
            ))
        })?;

        info!(
            "Loaded {} products from {}",
            products.len(),
            self.file_path.display()
        );
        Ok(products)
    }
}
