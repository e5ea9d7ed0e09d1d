//! Empty-window fallback resolution
//!
//! When a requested interval has no data, the search is retried over a
//! wider historical window anchored at the same end, and the result is
//! bounded to the most recent items so downstream cost stays capped.

use std::future::Future;

use chrono::Months;
use tracing::info;

use pulse_common::{ServiceError, Timestamped, Window};

use crate::config::FallbackConfig;

/// Outcome of a fallback-aware fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// Fetched items; when `used_fallback`, at most `max_items`, most
    /// recent first
    pub items: Vec<T>,
    /// Whether the widened window supplied the data
    pub used_fallback: bool,
}

/// Fetch over `window`, widening on empty results
///
/// The widened window is `[end - widen_months, end)`. An empty widened
/// fetch is a `NoData` error, never a silent empty success.
pub async fn resolve_with_fallback<T, F, Fut>(
    window: Window,
    policy: &FallbackConfig,
    fetch: F,
) -> Result<Resolved<T>, ServiceError>
where
    T: Timestamped,
    F: Fn(Window) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ServiceError>>,
{
    let items = fetch(window).await?;
    if !items.is_empty() {
        return Ok(Resolved {
            items,
            used_fallback: false,
        });
    }

    let fallback_start = window
        .end
        .checked_sub_months(Months::new(policy.widen_months))
        .ok_or_else(|| {
            ServiceError::Internal("fallback window start out of range".to_string())
        })?;
    let widened = Window::new(fallback_start, window.end)?;
    info!(
        "No data in requested window, widening to {} -> {}",
        widened.start, widened.end
    );

    let mut items = fetch(widened).await?;
    if items.is_empty() {
        return Err(ServiceError::NoData);
    }

    items.sort_by_key(|item| std::cmp::Reverse(item.observed_at()));
    items.truncate(policy.max_items);

    Ok(Resolved {
        items,
        used_fallback: true,
    })
}
