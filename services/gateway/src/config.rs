//! Configuration for the sentiment gateway

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};

use pulse_common::constants::{
    DEFAULT_BUCKET_WIDTH_SECS, DEFAULT_FALLBACK_MAX_ITEMS, DEFAULT_FALLBACK_WIDEN_MONTHS,
    DEFAULT_ONESHOT_BUCKETS, DEFAULT_STREAM_WINDOW_SECS,
};

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Time-bucketed aggregation configuration
    pub aggregation: AggregationConfig,
    /// Empty-window fallback configuration
    pub fallback: FallbackConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Monitoring configuration
    pub monitoring: MonitoringConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

/// Aggregation configuration
///
/// The 5-minute width and 1-hour streaming default are deployment policy,
/// not protocol requirements, so they live here rather than in code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Bucket width in seconds
    pub bucket_width_secs: u64,
    /// Default streaming window installed on connect, in seconds
    pub default_window_secs: u64,
    /// Number of buckets served by the one-shot aggregate endpoint
    pub oneshot_buckets: u32,
}

/// Fallback widening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Calendar months to widen an empty window by, anchored at its end
    pub widen_months: u32,
    /// Cap on fallback results, most recent first
    pub max_items: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight requests
    pub max_age_seconds: u64,
}

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Health check endpoint path
    pub health_path: String,
    /// Enable request tracing
    pub tracing_enabled: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                timeout_seconds: 30,
                max_body_size: 1024 * 1024, // 1MB
            },
            aggregation: AggregationConfig {
                bucket_width_secs: DEFAULT_BUCKET_WIDTH_SECS,
                default_window_secs: DEFAULT_STREAM_WINDOW_SECS,
                oneshot_buckets: DEFAULT_ONESHOT_BUCKETS,
            },
            fallback: FallbackConfig {
                widen_months: DEFAULT_FALLBACK_WIDEN_MONTHS,
                max_items: DEFAULT_FALLBACK_MAX_ITEMS,
            },
            cors: CorsConfig {
                enabled: true,
                allowed_origins: vec!["http://localhost:3000".to_string()],
                allowed_methods: vec![
                    "GET".to_string(),
                    "POST".to_string(),
                    "OPTIONS".to_string(),
                ],
                allowed_headers: vec![
                    "Content-Type".to_string(),
                    "X-Requested-With".to_string(),
                ],
                max_age_seconds: 86400, // 24 hours
            },
            monitoring: MonitoringConfig {
                health_path: "/health".to_string(),
                tracing_enabled: true,
            },
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file, layered with `PULSE_*` env vars
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("PULSE"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Get server address
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl AggregationConfig {
    /// Bucket width as a chrono duration
    #[must_use]
    pub fn bucket_width(&self) -> Duration {
        Duration::seconds(self.bucket_width_secs as i64)
    }

    /// Default streaming window length as a chrono duration
    #[must_use]
    pub fn default_window(&self) -> Duration {
        Duration::seconds(self.default_window_secs as i64)
    }
}
