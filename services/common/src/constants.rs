//! Shared constants
//!
//! Single source of truth for the aggregation defaults.

// Time constants
pub const SECS_PER_MIN: u64 = 60;
pub const MINS_PER_HOUR: u64 = 60;
pub const SECS_PER_HOUR: u64 = SECS_PER_MIN * MINS_PER_HOUR;

// Aggregation defaults
/// Default bucket width for sentiment aggregation (5 minutes)
pub const DEFAULT_BUCKET_WIDTH_SECS: u64 = 5 * SECS_PER_MIN;
/// Default streaming window on connect (most recent hour)
pub const DEFAULT_STREAM_WINDOW_SECS: u64 = SECS_PER_HOUR;
/// Default number of buckets served by the one-shot aggregate
pub const DEFAULT_ONESHOT_BUCKETS: u32 = 3;

// Fallback defaults
/// Default widening of an empty window, in calendar months anchored at end
pub const DEFAULT_FALLBACK_WIDEN_MONTHS: u32 = 2;
/// Default cap on fallback results, most recent first
pub const DEFAULT_FALLBACK_MAX_ITEMS: usize = 10;
