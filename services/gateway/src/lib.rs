//! Pulse Sentiment Gateway
//!
//! Serves time-bucketed sentiment aggregates for a fixed set of tracked
//! assets, either as a one-shot response or as a continuously-updating
//! stream over a WebSocket connection. Features:
//! - Epoch-anchored time bucketing with zero-filled timelines
//! - Per-connection streaming sessions with window/filter overrides
//! - Fallback window widening when a requested interval is empty
//! - Narrow data-source and summarizer seams for external collaborators

use anyhow::Result;
use std::sync::Arc;

pub mod assets;
pub mod bucketer;
pub mod config;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
pub mod session;
pub mod store;

pub use config::{AggregationConfig, FallbackConfig, GatewayConfig, ServerConfig};
pub use server::GatewayServer;

use handlers::explain::Summarizer;
use store::SentimentStore;

/// Start the gateway server
pub async fn start_server(
    config: GatewayConfig,
    store: Arc<dyn SentimentStore>,
    summarizer: Arc<dyn Summarizer>,
) -> Result<()> {
    let server = GatewayServer::new(config, store, summarizer).await?;
    server.start().await
}
