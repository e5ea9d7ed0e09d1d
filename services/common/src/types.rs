//! Domain types shared by the Pulse services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ServiceError;

/// A tracked asset from the static reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique numeric identifier
    pub id: i64,
    /// Display code (e.g. "BTC"); treated as unique for lookup
    pub code: String,
}

/// One sentiment observation: a raw event or a pre-aggregated row
///
/// For pre-aggregated rows `observed_at` carries the row's window start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub asset_id: i64,
    pub score: f64,
    pub observed_at: DateTime<Utc>,
}

/// A raw source message, consumed by the explain path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub asset_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Anything carrying an observation timestamp, for recency ordering
pub trait Timestamped {
    fn observed_at(&self) -> DateTime<Utc>;
}

impl Timestamped for ScorePoint {
    fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

impl Timestamped for RawMessage {
    fn observed_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Half-open aggregation interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// Build a window, rejecting `start >= end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ServiceError> {
        if start >= end {
            return Err(ServiceError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Whether a timestamp falls inside the window
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }
}

/// One time bucket of a streamed snapshot
///
/// `coins` always holds exactly the requested asset label set, zero-filled
/// for labels without data; BTreeMap keeps the key order lexicographic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotBucket {
    /// Bucket boundary, minute precision, UTC
    pub time: String,
    /// Per-asset aggregate scores keyed by display label
    pub coins: BTreeMap<String, f64>,
}

/// An ordered series of contiguous buckets at the configured width
pub type Timeline = Vec<SnapshotBucket>;
