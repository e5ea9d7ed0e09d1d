//! Pure time-bucketing of sentiment observations
//!
//! Buckets are anchored at the Unix epoch, never at the query start, so
//! overlapping queries of different ranges place the same observation on
//! the same boundary.

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use pulse_common::{ScorePoint, SnapshotBucket, Timeline, Window};

/// Floor a timestamp to the bucket boundary at or below it
#[must_use]
pub fn floor_to_width(ts: DateTime<Utc>, width: Duration) -> DateTime<Utc> {
    let width_secs = width.num_seconds().max(1);
    let floored = ts.timestamp().div_euclid(width_secs) * width_secs;
    DateTime::from_timestamp(floored, 0).unwrap_or(ts)
}

/// Render a bucket boundary at minute precision, UTC
#[must_use]
pub fn bucket_time_label(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%MZ").to_string()
}

/// Bucket observations into a contiguous, zero-filled timeline
///
/// Every boundary `t0, t0+width, ...` with `t <= window.end` is emitted
/// (`t0 = floor(window.start)`), and every label in `labels` appears in
/// every bucket, zero-filled when no observation landed there. When two
/// observations collide on the same (bucket, asset) pair the later element
/// of `points` wins.
#[must_use]
pub fn bucket_scores<F>(
    points: &[ScorePoint],
    width: Duration,
    window: Window,
    labels: &[String],
    resolve: F,
) -> Timeline
where
    F: Fn(i64) -> String,
{
    let width_secs = width.num_seconds().max(1);

    // Label observations by epoch-anchored bucket start
    let mut by_bucket: FxHashMap<i64, FxHashMap<String, f64>> = FxHashMap::default();
    for point in points {
        let bucket = point.observed_at.timestamp().div_euclid(width_secs) * width_secs;
        by_bucket
            .entry(bucket)
            .or_default()
            .insert(resolve(point.asset_id), point.score);
    }

    // Walk every boundary in range, projecting onto the requested labels
    let mut timeline = Timeline::new();
    let t0 = window.start.timestamp().div_euclid(width_secs) * width_secs;
    let end = window.end.timestamp();
    let mut t = t0;
    while t <= end {
        let scores = by_bucket.get(&t);
        let coins: BTreeMap<String, f64> = labels
            .iter()
            .map(|label| {
                let score = scores
                    .and_then(|bucket| bucket.get(label))
                    .copied()
                    .unwrap_or(0.0);
                (label.clone(), score)
            })
            .collect();

        let Some(boundary) = DateTime::from_timestamp(t, 0) else {
            break;
        };
        timeline.push(SnapshotBucket {
            time: bucket_time_label(boundary),
            coins,
        });
        t += width_secs;
    }

    timeline
}
