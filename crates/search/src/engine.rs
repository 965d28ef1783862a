use outfitter_common::{Catalog, OutfitterError, Product, Result};
use outfitter_llm::{with_timeout, ChatGateway, EmbeddingGateway, Gateways};
use outfitter_vector::{InMemoryVectorStore, IndexReport, Indexer, VectorStore};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument};

use crate::options::SearchOptions;
use crate::prompt::build_messages;
use crate::relevance::select_match;
use crate::result::SearchResult;

/// Retrieval-augmented product search
///
/// The catalog is indexed lazily on the first search. Concurrent first
/// callers wait on the same fill, so every product is embedded once per
/// engine. A fill that fails with a configuration error is not retried:
/// later calls report the same error without touching the gateways.
pub struct SearchEngine {
    catalog: Arc<dyn Catalog>,
    embedder: Arc<dyn EmbeddingGateway>,
    chat: Arc<dyn ChatGateway>,
    store: Arc<dyn VectorStore>,
    indexer: Indexer,
    options: SearchOptions,
    indexed: OnceCell<IndexReport>,
    fatal: OnceCell<String>,
}

impl SearchEngine {
    /// Build an engine over the given store. Call once at startup.
    pub fn initialize(
        options: SearchOptions,
        gateways: Gateways,
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        options.validate()?;

        let indexer = Indexer::new(gateways.embedder.clone(), store.clone())
            .with_concurrency(options.index_concurrency)
            .with_timeout(options.gateway_timeout);

        info!(
            "Search engine initialized - threshold={}, timeout={:?}",
            options.relevance_threshold, options.gateway_timeout
        );

        Ok(Self {
            catalog,
            embedder: gateways.embedder,
            chat: gateways.chat,
            store,
            indexer,
            options,
            indexed: OnceCell::new(),
            fatal: OnceCell::new(),
        })
    }

    /// Build an engine backed by a fresh in-memory store
    pub fn in_memory(
        options: SearchOptions,
        gateways: Gateways,
        catalog: Arc<dyn Catalog>,
    ) -> Result<Self> {
        Self::initialize(options, gateways, catalog, Arc::new(InMemoryVectorStore::new()))
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Whether the catalog has been indexed
    pub fn is_ready(&self) -> bool {
        self.indexed.initialized()
    }

    pub fn index_report(&self) -> Option<&IndexReport> {
        self.indexed.get()
    }

    /// Index the catalog now instead of on the first search.
    ///
    /// Returns configuration errors (such as mixed embedding dimensions) so
    /// startup can stop early.
    pub async fn warm_up(&self) -> Result<&IndexReport> {
        self.ensure_indexed().await
    }

    /// Configuration error that stopped indexing, if any
    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal.get().map(String::as_str)
    }

    fn check_fatal(&self) -> Result<()> {
        match self.fatal.get() {
            Some(message) => Err(OutfitterError::config(format!(
                "Catalog indexing failed earlier: {}",
                message
            ))),
            None => Ok(()),
        }
    }

    /// Fill the store exactly once. A transient failure (such as an
    /// unavailable catalog) leaves the gate open and the next caller
    /// retries; a fatal one is latched.
    async fn ensure_indexed(&self) -> Result<&IndexReport> {
        if let Some(report) = self.indexed.get() {
            return Ok(report);
        }
        self.check_fatal()?;
        self.indexed.get_or_try_init(|| self.fill_from_catalog()).await
    }

    async fn fill_from_catalog(&self) -> Result<IndexReport> {
        // Callers queued behind a fatal fill get the gate next
        self.check_fatal()?;

        let result = match self.catalog.list_products().await {
            Ok(products) => self.indexer.fill(products).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            if e.is_fatal() {
                error!("Indexing disabled until restart: {}", e);
                let _ = self.fatal.set(e.to_string());
            }
        }
        result
    }

    /// Find the best matching product and generate a response for it.
    ///
    /// Never fails: errors are reported through the response text.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> SearchResult {
        let mut found = None;

        match self.run(query, &mut found).await {
            Ok(result) => result,
            Err(e) => {
                if e.is_fatal() {
                    error!("Search unavailable due to configuration error: {}", e);
                } else {
                    error!("Search failed: {}", e);
                }
                SearchResult::failed(found, format!("Sorry, the search failed: {}", e))
            }
        }
    }

    async fn run(&self, query: &str, found: &mut Option<Product>) -> Result<SearchResult> {
        if query.trim().is_empty() {
            return Err(OutfitterError::invalid_input("Search query cannot be empty"));
        }

        self.ensure_indexed().await?;

        let timeout = self.options.gateway_timeout;
        let query_vector =
            with_timeout("query embedding", timeout, self.embedder.embed(query)).await?;

        let candidates = self.store.nearest_neighbor(&query_vector, 1).await?;
        let best = candidates.first();
        let score = best.map(|candidate| candidate.score);

        *found = select_match(best, self.options.relevance_threshold);
        match (&*found, score) {
            (Some(product), Some(score)) => {
                debug!("Matched product {} ({}) with score {:.3}", product.id, product.name, score)
            }
            (None, Some(score)) => debug!(
                "Best score {:.3} is not above threshold {}",
                score, self.options.relevance_threshold
            ),
            _ => debug!("Vector store returned no candidates"),
        }

        let messages = build_messages(query, found.as_ref());
        let response =
            with_timeout("chat completion", timeout, self.chat.complete(&messages)).await?;

        info!(
            "Search completed - matched={}, response length={}",
            found.is_some(),
            response.len()
        );
        Ok(SearchResult::new(found.clone(), response, score))
    }
}
