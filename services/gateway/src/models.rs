//! REST and WebSocket request/response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound WebSocket control frame
///
/// `start_time` and `end_time` are RFC-3339 and required together; a frame
/// that parses as JSON but lacks a valid window is rejected in-band without
/// closing the session. `tokens` present (even empty) replaces the asset
/// filter; absent leaves the previous filter untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFrame {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub tokens: Option<Vec<String>>,
}

/// In-band error notification, for both WS frames and HTTP bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    /// Short error message
    pub error: String,
}

impl ErrorFrame {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Explain endpoint request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    /// Numeric asset identifier
    pub coin_id: i64,
    /// Window start, RFC-3339
    pub start_time: String,
    /// Window end, RFC-3339
    pub end_time: String,
}

/// Explain endpoint response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    /// Textual explanation of the sentiment in the window
    pub explanation: String,
}

/// One flattened one-shot bucket: `{"time": ..., "42": 1.5, ...}`
///
/// Per-asset scores sit beside `time` keyed by decimal asset id, not nested
/// under `coins` as in the streaming variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatBucket(pub Map<String, Value>);

impl FlatBucket {
    /// Bucket boundary label, when present
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        self.0.get("time").and_then(Value::as_str)
    }

    /// Score for an asset id, when present
    #[must_use]
    pub fn score(&self, asset_id: i64) -> Option<f64> {
        self.0.get(&asset_id.to_string()).and_then(Value::as_f64)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
    /// Number of assets in the static table
    pub tracked_assets: usize,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
}
