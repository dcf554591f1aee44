//! chunkd server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use chunkd::{Config, OpenAiEmbedder, Result, Server};

#[derive(Parser)]
#[command(name = "chunkd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Document chunking service: recursive and semantic strategies over HTTP")]
struct Cli {
    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Maximum chunk size for /rtc, in characters
    #[arg(long, default_value_t = 1000)]
    chunk_size: usize,

    /// Overlap between adjacent /rtc chunks, in characters
    #[arg(long, default_value_t = 400)]
    chunk_overlap: usize,

    /// Soft average chunk size for /semantic, in characters
    #[arg(long, default_value_t = 600)]
    avg_chunk_size: usize,

    /// Minimum chunk size for /semantic, in characters
    #[arg(long, default_value_t = 400)]
    min_chunk_size: usize,

    /// Embedding model name
    #[arg(long, default_value = "text-embedding-3-large")]
    embedding_model: String,

    /// Embedding provider base URL
    #[arg(long, default_value = "https://api.openai.com")]
    embedding_base_url: String,

    /// Overwrite this path with {"content": [...]} after each request
    #[arg(long)]
    debug_dump: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Fail fast: without a credential the semantic route can never work.
    let api_key = Config::api_key_from_env()?;

    let mut config = Config::new(api_key);
    config.host = cli.host;
    config.port = cli.port;
    config.chunk_size = cli.chunk_size;
    config.chunk_overlap = cli.chunk_overlap;
    config.avg_chunk_size = cli.avg_chunk_size;
    config.min_chunk_size = cli.min_chunk_size;
    config.embedding_model = cli.embedding_model;
    config.embedding_base_url = cli.embedding_base_url;
    config.debug_dump = cli.debug_dump;

    let embedder = Arc::new(OpenAiEmbedder::new(
        config.api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_base_url.clone(),
    ));

    info!("starting chunkd v{}", env!("CARGO_PKG_VERSION"));
    Server::new(config, embedder)?.start().await
}
