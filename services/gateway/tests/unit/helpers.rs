//! Shared fixtures for the unit suites

use chrono::{DateTime, Utc};
use std::sync::Arc;

use pulse_common::{Asset, RawMessage, ScorePoint};
use pulse_gateway::assets::AssetTable;

/// Parse an RFC-3339 timestamp, panicking on bad test data
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .unwrap_or_else(|e| panic!("bad test timestamp {raw}: {e}"))
        .with_timezone(&Utc)
}

/// Three tracked assets; 42 deliberately matches the id used by the
/// one-shot scenarios
pub fn sample_assets() -> Vec<Asset> {
    vec![
        Asset {
            id: 1,
            code: "BTC".to_string(),
        },
        Asset {
            id: 2,
            code: "ETH".to_string(),
        },
        Asset {
            id: 42,
            code: "DOGE".to_string(),
        },
    ]
}

pub fn sample_table() -> Arc<AssetTable> {
    Arc::new(AssetTable::new(sample_assets()))
}

pub fn point(asset_id: i64, score: f64, observed_at: &str) -> ScorePoint {
    ScorePoint {
        asset_id,
        score,
        observed_at: ts(observed_at),
    }
}

pub fn message(asset_id: i64, content: &str, created_at: &str) -> RawMessage {
    RawMessage {
        asset_id,
        content: content.to_string(),
        created_at: ts(created_at),
    }
}
