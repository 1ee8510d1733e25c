use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polymind_core::{AiService, CompletionProvider, OpenAiCompletions};
use polymind_knowledge::{Document, EmbeddingProvider, OpenAiEmbeddings, QdrantStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::PolymindConfig;

#[derive(Parser)]
#[command(name = "polymind")]
#[command(version)]
#[command(about = "Polymind, a multi-agent AI layer with a shared knowledge base")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory and default config
    Init,

    /// Show current configuration
    Config,

    /// List the configured agents
    Agents,

    /// Send a message to the best-matching agent
    Ask {
        /// The message to send
        message: String,

        /// Agent id to use instead of keyword routing
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// Chat with the default agent
    Chat {
        /// The message to send
        message: String,

        /// JSON context prepended to the message
        #[arg(long)]
        context: Option<String>,
    },

    /// Add documents from a JSON file to the knowledge base
    Ingest {
        /// Path to a JSON array of {content, metadata} objects
        file: PathBuf,
    },

    /// Search the knowledge base
    Search {
        /// The search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Generate embeddings for one or more texts
    Embed {
        /// Texts to embed
        texts: Vec<String>,
    },

    /// Analyze the sentiment of a text
    Sentiment {
        /// The text to analyze
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.debug {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Init => cmd_init().await,
        Commands::Config => cmd_config(&cli.config).await,
        Commands::Agents => cmd_agents(&cli.config).await,
        Commands::Ask { message, agent } => {
            cmd_ask(&cli.config, &message, agent.as_deref()).await
        }
        Commands::Chat { message, context } => {
            cmd_chat(&cli.config, &message, context.as_deref()).await
        }
        Commands::Ingest { file } => cmd_ingest(&cli.config, &file).await,
        Commands::Search { query, limit } => cmd_search(&cli.config, &query, limit).await,
        Commands::Embed { texts } => cmd_embed(&cli.config, &texts).await,
        Commands::Sentiment { text } => cmd_sentiment(&cli.config, &text).await,
    }
}

async fn cmd_init() -> Result<()> {
    let config_dir = config::config_dir();
    tokio::fs::create_dir_all(&config_dir)
        .await
        .with_context(|| format!("Failed to create config dir: {}", config_dir.display()))?;

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        warn!("Config already exists at {}", config_path.display());
    } else {
        let default_config = include_str!("../../../config/default.toml");
        tokio::fs::write(&config_path, default_config).await?;
        // The config may hold secrets; keep it owner-only so load() accepts it
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&config_path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        info!("Created default config at {}", config_path.display());
    }

    println!("Polymind initialized at {}", config_dir.display());
    println!(
        "Edit {} to configure your API key and vector store.",
        config_path.display()
    );
    Ok(())
}

async fn cmd_config(config_path: &Option<PathBuf>) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    println!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

async fn cmd_agents(config_path: &Option<PathBuf>) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    for agent in cfg.catalog() {
        println!("{}  ({})", agent.id, agent.display_name);
        println!("    {}", agent.description);
        println!(
            "    tools: [{}]  temperature: {}",
            agent.tools.join(", "),
            agent.temperature
        );
    }
    Ok(())
}

async fn cmd_ask(
    config_path: &Option<PathBuf>,
    message: &str,
    agent: Option<&str>,
) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    let (service, _store) = build_service(&cfg)?;

    let envelope = service.route_to_agent(message, agent).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_chat(
    config_path: &Option<PathBuf>,
    message: &str,
    context: Option<&str>,
) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    let (service, _store) = build_service(&cfg)?;

    let context: Option<serde_json::Value> = match context {
        Some(raw) => Some(serde_json::from_str(raw).context("Failed to parse --context as JSON")?),
        None => None,
    };

    let envelope = service.generate_response(message, context.as_ref()).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_ingest(config_path: &Option<PathBuf>, file: &PathBuf) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;

    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let documents: Vec<Document> = serde_json::from_str(&raw).with_context(|| {
        format!(
            "Failed to parse {} as a JSON array of documents",
            file.display()
        )
    })?;
    info!("Ingesting {} documents from {}", documents.len(), file.display());

    let (service, store) = build_service(&cfg)?;
    store.ensure_collection().await?;

    let envelope = service.add_to_knowledge_base(documents).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_search(config_path: &Option<PathBuf>, query: &str, limit: usize) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    let (service, store) = build_service(&cfg)?;
    store.ensure_collection().await?;

    let envelope = service.semantic_search(query, limit).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_embed(config_path: &Option<PathBuf>, texts: &[String]) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    let (service, _store) = build_service(&cfg)?;

    let envelope = service.generate_embeddings(texts).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_sentiment(config_path: &Option<PathBuf>, text: &str) -> Result<()> {
    let cfg = PolymindConfig::load(config_path)?;
    let (service, _store) = build_service(&cfg)?;

    let envelope = service.analyze_sentiment(text).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Wire the OpenAI clients and the Qdrant store into a service.
/// The concrete store is also returned so commands that write to the
/// knowledge base can create the collection first.
fn build_service(cfg: &PolymindConfig) -> Result<(AiService, Arc<QdrantStore>)> {
    let openai = &cfg.providers.openai;

    let provider: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompletions::new(
        openai.api_key.clone(),
        openai.chat_model.clone(),
        openai.base_url.clone(),
    ));
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddings::new(
        openai.api_key.clone(),
        openai.embedding_model.clone(),
        openai.base_url.clone(),
    ));
    let store = Arc::new(QdrantStore::new(
        cfg.store.url.clone(),
        cfg.store.collection.clone(),
        embedder.clone(),
    ));

    let service = AiService::new(
        cfg.catalog(),
        provider,
        embedder,
        store.clone(),
        openai.max_tokens,
    )?;
    Ok((service, store))
}
