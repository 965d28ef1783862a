use async_trait::async_trait;
use outfitter_common::{Catalog, InMemoryCatalog, OutfitterError, Product, Result};
use outfitter_llm::{ChatGateway, ChatMessage, EmbeddingGateway, Gateways};
use outfitter_search::{SearchEngine, SearchOptions};
use outfitter_vector::{InMemoryVectorStore, VectorStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const VOCABULARY: [&str; 5] = ["tent", "stove", "lantern", "backpack", "sleeping"];

/// Bag-of-keywords embedder that counts calls
#[derive(Default)]
struct KeywordEmbedder {
    product_calls: AtomicUsize,
    query_calls: AtomicUsize,
    fail_queries: bool,
}

#[async_trait]
impl EmbeddingGateway for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // widen the window for concurrent first searches
        tokio::time::sleep(Duration::from_millis(10)).await;

        if text.contains("is a product that costs") {
            self.product_calls.fetch_add(1, Ordering::SeqCst);
        } else {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_queries {
                return Err(OutfitterError::embedding("embedding service returned 503"));
            }
        }

        let text = text.to_lowercase();
        Ok(VOCABULARY
            .iter()
            .map(|word| if text.contains(word) { 1.0 } else { 0.0 })
            .collect())
    }
}

/// Records every prompt and answers with a fixed message
#[derive(Default)]
struct RecordingChat {
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingChat {
    fn last_user_prompt(&self) -> String {
        let prompts = self.prompts.lock().unwrap();
        prompts.last().unwrap()[1].content.clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok("Adventure awaits!".to_string())
    }
}

fn camping_catalog() -> Vec<Product> {
    vec![
        Product::new(1, "Tent", "2-person tent", 99.99).with_image_url("tent.png"),
        Product::new(2, "Camp Stove", "Compact gas stove", 45.0),
        Product::new(3, "Lantern", "Rechargeable LED lantern", 24.5),
        Product::new(4, "Trail Backpack", "40L hiking backpack", 120.0),
    ]
}

fn build(
    products: Vec<Product>,
    embedder: Arc<KeywordEmbedder>,
    chat: Arc<RecordingChat>,
    store: Arc<InMemoryVectorStore>,
) -> SearchEngine {
    let gateways = Gateways {
        embedder,
        chat,
    };
    let catalog: Arc<dyn Catalog> = Arc::new(InMemoryCatalog::new(products));
    SearchEngine::initialize(SearchOptions::default(), gateways, catalog, store).unwrap()
}

#[tokio::test]
async fn test_round_trip_tent_query() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let chat = Arc::new(RecordingChat::default());
    let store = Arc::new(InMemoryVectorStore::new());
    let engine = build(
        vec![Product::new(1, "Tent", "2-person tent", 99.99)],
        embedder.clone(),
        chat.clone(),
        store.clone(),
    );

    let result = engine.search("I need a tent for two").await;

    assert_eq!(result.product().unwrap().id, 1);
    assert_eq!(result.response, "Adventure awaits!");
    assert_eq!(store.len().await, 1);

    let prompt = chat.last_user_prompt();
    for expected in ["I need a tent for two", "Tent", "99.99", "2-person tent"] {
        assert!(prompt.contains(expected), "prompt is missing {:?}: {}", expected, prompt);
    }
}

#[tokio::test]
async fn test_picks_best_product_from_catalog() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let chat = Arc::new(RecordingChat::default());
    let engine = build(
        camping_catalog(),
        embedder,
        chat.clone(),
        Arc::new(InMemoryVectorStore::new()),
    );

    let result = engine.search("which lantern lasts all night?").await;
    assert_eq!(result.product().unwrap().name, "Lantern");
    assert!(chat.last_user_prompt().contains("Rechargeable LED lantern"));

    let result = engine.search("a backpack for day hikes").await;
    assert_eq!(result.product().unwrap().id, 4);
}

#[tokio::test]
async fn test_unrelated_query_gets_no_match_prompt() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let chat = Arc::new(RecordingChat::default());
    let engine = build(
        camping_catalog(),
        embedder,
        chat.clone(),
        Arc::new(InMemoryVectorStore::new()),
    );

    let result = engine.search("quantum physics textbook").await;

    assert!(!result.is_match());
    assert!(result.products[0].is_placeholder());
    let prompt = chat.last_user_prompt();
    assert!(prompt.contains("quantum physics textbook"));
    assert!(prompt.contains("No product in the catalog matches"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_searches_index_once() {
    let embedder = Arc::new(KeywordEmbedder::default());
    let chat = Arc::new(RecordingChat::default());
    let catalog_size = camping_catalog().len();
    let engine = Arc::new(build(
        camping_catalog(),
        embedder.clone(),
        chat,
        Arc::new(InMemoryVectorStore::new()),
    ));

    let searches = (0..8).map(|i| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.search(&format!("tent number {}", i)).await })
    });
    let results = futures::future::join_all(searches).await;

    for result in results {
        assert_eq!(result.unwrap().product().unwrap().name, "Tent");
    }
    assert_eq!(embedder.product_calls.load(Ordering::SeqCst), catalog_size);
    assert_eq!(embedder.query_calls.load(Ordering::SeqCst), 8);
    assert_eq!(engine.index_report().unwrap().indexed, catalog_size);

    // later searches do not re-index
    engine.search("stove").await;
    assert_eq!(embedder.product_calls.load(Ordering::SeqCst), catalog_size);
}

#[tokio::test]
async fn test_query_embedding_failure_is_reported_not_raised() {
    let embedder = Arc::new(KeywordEmbedder {
        fail_queries: true,
        ..Default::default()
    });
    let chat = Arc::new(RecordingChat::default());
    let engine = build(
        camping_catalog(),
        embedder,
        chat.clone(),
        Arc::new(InMemoryVectorStore::new()),
    );

    let result = engine.search("I need a tent for two").await;

    assert!(!result.response.is_empty());
    assert!(result.response.contains("503"));
    assert!(result.products[0].is_placeholder());
    assert!(chat.prompts.lock().unwrap().is_empty());
}

struct FlakyCatalog {
    calls: AtomicUsize,
}

#[async_trait]
impl Catalog for FlakyCatalog {
    async fn list_products(&self) -> Result<Vec<Product>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(OutfitterError::catalog("database is starting up"))
        } else {
            Ok(camping_catalog())
        }
    }
}

#[tokio::test]
async fn test_failed_fill_is_retried_by_next_search() {
    let gateways = Gateways {
        embedder: Arc::new(KeywordEmbedder::default()),
        chat: Arc::new(RecordingChat::default()),
    };
    let catalog = Arc::new(FlakyCatalog {
        calls: AtomicUsize::new(0),
    });
    let engine = SearchEngine::in_memory(SearchOptions::default(), gateways, catalog).unwrap();

    let first = engine.search("tent").await;
    assert!(first.response.contains("database is starting up"));
    assert!(!engine.is_ready());

    let second = engine.search("tent").await;
    assert_eq!(second.product().unwrap().name, "Tent");
    assert!(engine.is_ready());
}

/// Gives the Tent a 3-d vector and everything else a 2-d one
#[derive(Default)]
struct MixedEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingGateway for MixedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.starts_with("Tent") {
            Ok(vec![1.0, 0.0, 0.0])
        } else {
            Ok(vec![1.0, 0.0])
        }
    }
}

fn mixed_engine(embedder: Arc<MixedEmbedder>, chat: Arc<RecordingChat>) -> SearchEngine {
    let gateways = Gateways { embedder, chat };
    let options = SearchOptions {
        index_concurrency: 1,
        ..Default::default()
    };
    let catalog = Arc::new(InMemoryCatalog::new(camping_catalog()));
    SearchEngine::in_memory(options, gateways, catalog).unwrap()
}

#[tokio::test]
async fn test_warm_up_reports_dimension_mismatch() {
    let embedder = Arc::new(MixedEmbedder::default());
    let engine = mixed_engine(embedder.clone(), Arc::new(RecordingChat::default()));

    let err = engine.warm_up().await.unwrap_err();
    assert!(err.is_fatal());
    assert!(!engine.is_ready());
    assert!(engine.fatal_error().unwrap().contains("dimension mismatch"));

    // the second warm-up reports the same error without embedding again
    let calls = embedder.calls.load(Ordering::SeqCst);
    let err = engine.warm_up().await.unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("dimension mismatch"));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), calls);
}

#[tokio::test]
async fn test_dimension_mismatch_is_not_reindexed_per_search() {
    let embedder = Arc::new(MixedEmbedder::default());
    let chat = Arc::new(RecordingChat::default());
    let engine = mixed_engine(embedder.clone(), chat.clone());

    let first = engine.search("tent").await;
    assert!(first.response.contains("dimension mismatch"));
    let calls_after_first = embedder.calls.load(Ordering::SeqCst);
    assert!(calls_after_first >= 2);

    for _ in 0..3 {
        let result = engine.search("tent").await;
        assert!(result.response.contains("dimension mismatch"));
        assert!(result.products[0].is_placeholder());
    }

    assert_eq!(embedder.calls.load(Ordering::SeqCst), calls_after_first);
    assert!(chat.prompts.lock().unwrap().is_empty());
    assert!(!engine.is_ready());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_searches_share_one_failed_fill() {
    let embedder = Arc::new(MixedEmbedder::default());
    let engine = Arc::new(mixed_engine(
        embedder.clone(),
        Arc::new(RecordingChat::default()),
    ));

    let searches = (0..8).map(|_| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.search("tent").await })
    });
    for result in futures::future::join_all(searches).await {
        assert!(result.unwrap().response.contains("dimension mismatch"));
    }

    // one pass: Tent, then the first 2-d product aborts it
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
}
