//! Pulse Sentiment Gateway - Main Entry Point

use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_gateway::{
    handlers::explain::DigestSummarizer, store::MemoryStore, GatewayConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let matches = Command::new("pulse-gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Time-bucketed sentiment aggregation and streaming gateway")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("gateway.toml"),
        )
        .get_matches();

    // Load configuration
    let default_config = "gateway.toml".to_string();
    let config_path = matches
        .get_one::<String>("config")
        .unwrap_or(&default_config);
    let config = match GatewayConfig::from_file(config_path) {
        Ok(config) => {
            info!("Loaded configuration from: {}", config_path);
            config
        }
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path, e);
            info!("Using default configuration");
            GatewayConfig::default()
        }
    };

    info!(
        "Starting Pulse Sentiment Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Server will bind to: {}", config.server_address());
    info!(
        "Aggregation: {}s buckets, {}s default stream window",
        config.aggregation.bucket_width_secs, config.aggregation.default_window_secs
    );
    info!(
        "Fallback: widen {} months, keep {} most recent",
        config.fallback.widen_months, config.fallback.max_items
    );

    // The store is the external persistence collaborator; the in-memory
    // implementation stands in until one is wired up.
    let store = Arc::new(MemoryStore::new());
    let summarizer = Arc::new(DigestSummarizer::default());

    if let Err(e) = pulse_gateway::start_server(config, store, summarizer).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
