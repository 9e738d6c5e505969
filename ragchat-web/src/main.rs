//! RagChat relay server
//!
//! Forwards chat requests from the front end to the RAG backend.

use anyhow::Context;
use clap::Parser;
use ragchat_core::{init_logging, LoggingConfig};
use ragchat_web::server::RelayServerBuilder;
use ragchat_web::WebConfig;
use tracing::info;

/// RagChat relay - forwards chat requests to the RAG backend
#[derive(Parser)]
#[command(name = "ragchat-web")]
#[command(about = "HTTP relay in front of the RagChat backend")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Backend origin to relay to (overrides API_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Seconds to wait for the backend before answering 504
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Development mode: log every request with its headers
    #[arg(long)]
    dev: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables before reading any configuration
    dotenvy::dotenv().ok();

    let logging_config = LoggingConfig {
        filter_directives: vec![
            format!("ragchat_web={}", args.log_level),
            format!("ragchat_core={}", args.log_level),
            "tower_http=info".to_string(),
        ],
        ..LoggingConfig::default().with_level(args.log_level.clone())
    };
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let mut config = WebConfig::from_env();
    config.host = args.host;
    config.port = args.port;
    config.dev_mode = args.dev;
    if let Some(backend_url) = args.backend_url {
        config.relay.backend_origin = Some(backend_url);
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.relay.timeout_secs = timeout_secs;
    }

    info!(
        "Starting RagChat relay v{} on http://{}",
        env!("CARGO_PKG_VERSION"),
        config.address()
    );

    let server = RelayServerBuilder::with_config(config)
        .build()
        .context("Failed to build server")?;

    server.start().await.context("Server failed")?;

    info!("✅ Server shut down gracefully");
    Ok(())
}
