//! One-shot aggregate endpoint
//!
//! Stateless counterpart of the streaming session: a fixed recent window
//! split into the configured number of buckets, every known asset
//! reported, keys are decimal asset ids, buckets flattened beside `time`.

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use pulse_common::{ServiceError, Window};

use crate::{
    assets::AssetTable,
    bucketer::{bucket_scores, floor_to_width},
    config::AggregationConfig,
    error::ApiError,
    models::FlatBucket,
    server::AppState,
    store::SentimentStore,
};

/// Aggregate recent message scores into flattened buckets
///
/// The window is the `oneshot_buckets` most recent bucket boundaries
/// ending now, so the response always holds exactly that many buckets.
pub async fn aggregate_recent(
    store: &dyn SentimentStore,
    assets: &AssetTable,
    aggregation: &AggregationConfig,
) -> Result<Vec<FlatBucket>, ServiceError> {
    let now = Utc::now();
    let width = aggregation.bucket_width();
    let last = floor_to_width(now, width);
    let start = last - width * (aggregation.oneshot_buckets.saturating_sub(1) as i32);
    let window = Window::new(start, now)?;

    let points = store.fetch_message_scores().await?;

    let mut labels: Vec<String> = assets.ids().map(|id| id.to_string()).collect();
    labels.sort();
    let timeline = bucket_scores(&points, width, window, &labels, |id| id.to_string());

    Ok(timeline
        .into_iter()
        .map(|bucket| {
            let mut flat = Map::with_capacity(bucket.coins.len() + 1);
            flat.insert("time".to_string(), Value::String(bucket.time));
            for (label, score) in bucket.coins {
                flat.insert(label, Value::from(score));
            }
            FlatBucket(flat)
        })
        .collect())
}

/// POST /sentiment
pub async fn oneshot_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FlatBucket>>, ApiError> {
    info!("One-shot aggregate request");
    let buckets = aggregate_recent(
        state.store.as_ref(),
        state.assets.as_ref(),
        &state.config.aggregation,
    )
    .await?;
    Ok(Json(buckets))
}
