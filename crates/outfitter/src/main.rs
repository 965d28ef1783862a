use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use outfitter_common::{logger, AppConfig, Catalog, JsonCatalog};
use outfitter_llm::Gateways;
use outfitter_search::{SearchEngine, SearchOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "outfitter")]
#[command(about = "Outfitter - AI product search for an outdoor camping store", long_about = None)]
struct Cli {
    /// TOML config file, layered under OUTFITTER_* environment variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Product catalog JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log to the console only, without a log file
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one query and print the result as JSON
    Search {
        /// Free-text question from the customer
        query: String,
    },

    /// Index the catalog and print the report
    Index,

    /// Answer queries read line by line from stdin
    Repl,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    // CLI flags override file and environment
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = logger::parse_log_level(level)?.to_string().to_lowercase();
    }

    config.validate()?;
    Ok(config)
}

fn build_engine(config: &AppConfig) -> Result<SearchEngine> {
    let gateways = Gateways::from_config(config)?;
    let catalog: Arc<dyn Catalog> = Arc::new(JsonCatalog::new(&config.catalog_path));
    let engine = SearchEngine::in_memory(SearchOptions::from(config), gateways, catalog)?;
    Ok(engine)
}

async fn run_repl(engine: &SearchEngine) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    eprintln!("Ask about camping gear (Ctrl-D to quit)");
    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let result = engine.search(query).await;
        let mut output = serde_json::to_string_pretty(&result)?;
        output.push('\n');
        stdout.write_all(output.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root before the
    // config layers read OUTFITTER_* variables
    load_dotenv_from_project_root();

    let config = load_config(&cli).context("Invalid configuration")?;

    if cli.no_log_file {
        logger::setup_console_logging(&config.log_level)?;
    } else {
        config.ensure_directories()?;
        logger::setup_logging(&config.log_dir, &config.log_level)?;
    }

    tracing::info!("Outfitter starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Provider: {:?}", config.provider);
    tracing::info!("  Base URL: {}", config.provider_base_url());
    tracing::info!("  Models: {} / {}", config.embedding_model, config.chat_model);
    tracing::info!("  Catalog: {}", config.catalog_path.display());

    let engine = build_engine(&config)?;

    match cli.command {
        Commands::Search { query } => {
            // Configuration errors exit non-zero instead of landing in the JSON
            if let Err(e) = engine.warm_up().await {
                if e.is_fatal() {
                    return Err(e).context("Failed to index the catalog");
                }
                tracing::warn!("Catalog indexing failed, search will retry: {}", e);
            }
            let result = engine.search(&query).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Index => {
            let report = engine
                .warm_up()
                .await
                .context("Failed to index the catalog")?;
            println!("{}", serde_json::to_string_pretty(report)?);
            if !report.is_complete() {
                tracing::warn!(
                    "{} of {} products could not be indexed",
                    report.failed.len(),
                    report.total
                );
            }
        }
        Commands::Repl => {
            // Index before the first prompt so startup errors surface early
            if let Err(e) = engine.warm_up().await {
                tracing::error!("Catalog indexing failed: {}", e);
                if e.is_fatal() {
                    return Err(e.into());
                }
            }
            run_repl(&engine).await?;
        }
    }

    Ok(())
}
