//! Gateway server implementation

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    assets::AssetTable,
    config::GatewayConfig,
    handlers::{
        aggregate::oneshot_handler,
        explain::{explain_handler, Summarizer},
        health::health_handler,
    },
    middleware::create_cors_layer,
    session::ws_handler,
    store::SentimentStore,
};

/// Shared application state
///
/// Everything here is either immutable after startup (asset table,
/// config) or internally synchronized; per-session mutable state lives in
/// each connection's own task.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SentimentStore>,
    pub assets: Arc<AssetTable>,
    pub summarizer: Arc<dyn Summarizer>,
    pub config: Arc<GatewayConfig>,
    pub start_time: Instant,
}

/// Sentiment gateway server
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayServer {
    /// Create a server: loads the static asset table before any request
    /// or session is accepted
    pub async fn new(
        config: GatewayConfig,
        store: Arc<dyn SentimentStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self> {
        info!("Initializing sentiment gateway");

        let assets = match store.load_assets().await {
            Ok(assets) => {
                info!("Loaded {} tracked assets", assets.len());
                Arc::new(AssetTable::new(assets))
            }
            Err(e) => {
                error!("Failed to load asset table: {}", e);
                return Err(e.into());
            }
        };

        let state = AppState {
            store,
            assets,
            summarizer,
            config: Arc::new(config.clone()),
            start_time: Instant::now(),
        };

        Ok(Self { config, state })
    }

    /// Start serving
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .server_address()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid server address: {e}"))?;

        let app = self.create_app();
        info!("Starting sentiment gateway on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind TCP listener to {}: {}", addr, e);
            anyhow::anyhow!("Failed to bind to address {addr}: {e}")
        })?;

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {e}"));
        }

        Ok(())
    }

    /// Build the Axum application with all routes and middleware
    pub fn create_app(self) -> Router {
        let mut app = Router::new()
            .route(&self.config.monitoring.health_path, get(health_handler))
            .route("/sentiment", post(oneshot_handler))
            .route("/ws", get(ws_handler))
            .route("/explain", post(explain_handler))
            .with_state(self.state)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_size))
            .layer(TimeoutLayer::new(std::time::Duration::from_secs(
                self.config.server.timeout_seconds,
            )));

        if self.config.monitoring.tracing_enabled {
            app = app.layer(TraceLayer::new_for_http());
        }
        if self.config.cors.enabled {
            app = app.layer(create_cors_layer(&self.config));
        }

        info!("Gateway routes configured");
        app
    }
}
