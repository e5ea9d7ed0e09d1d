//! Sentiment explanation endpoint
//!
//! Resolves raw messages for one asset through the fallback search, then
//! hands the bounded, recency-sorted set to the summarizer collaborator.

use async_trait::async_trait;
use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use tracing::info;

use pulse_common::{RawMessage, ServiceError, Window};

use crate::{
    error::ApiError,
    fallback::resolve_with_fallback,
    models::{ExplainRequest, ExplainResponse},
    server::AppState,
};

/// Context handed to the summarizer alongside the resolved messages
#[derive(Debug, Clone)]
pub struct ExplainContext {
    pub coin_id: i64,
    pub window: Window,
    pub used_fallback: bool,
}

/// Text-generation collaborator, treated as a black box
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        messages: &[RawMessage],
        context: &ExplainContext,
    ) -> Result<String, ServiceError>;
}

/// Default summarizer: a bounded digest of the resolved messages
///
/// Produces the same digest the explain path would feed an external
/// generation model, capped at `max_messages` entries.
#[derive(Debug, Clone)]
pub struct DigestSummarizer {
    pub max_messages: usize,
}

impl Default for DigestSummarizer {
    fn default() -> Self {
        Self { max_messages: 20 }
    }
}

#[async_trait]
impl Summarizer for DigestSummarizer {
    async fn summarize(
        &self,
        messages: &[RawMessage],
        context: &ExplainContext,
    ) -> Result<String, ServiceError> {
        let mut digest = format!(
            "Here are {} messages about coin {} between {} and {}:\n\n",
            messages.len(),
            context.coin_id,
            context.window.start.to_rfc3339(),
            context.window.end.to_rfc3339(),
        );
        for message in messages.iter().take(self.max_messages) {
            let _ = writeln!(digest, "- {}", message.content);
        }
        if messages.len() > self.max_messages {
            digest.push_str("\n… and more messages …\n");
        }
        Ok(digest)
    }
}

/// POST /explain
pub async fn explain_handler(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let start = parse_time(&request.start_time, "start_time")?;
    let end = parse_time(&request.end_time, "end_time")?;
    let window = Window::new(start, end)?;

    info!(
        "Explain request for coin {} over {} -> {}",
        request.coin_id, window.start, window.end
    );

    let store = state.store.as_ref();
    let coin_id = request.coin_id;
    let resolved = resolve_with_fallback(window, &state.config.fallback, |w| {
        store.fetch_messages_for_asset(coin_id, w)
    })
    .await?;

    let context = ExplainContext {
        coin_id,
        window,
        used_fallback: resolved.used_fallback,
    };
    let explanation = state
        .summarizer
        .summarize(&resolved.items, &context)
        .await?;

    Ok(Json(ExplainResponse { explanation }))
}

fn parse_time(raw: &str, field: &str) -> Result<DateTime<Utc>, ServiceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ServiceError::Validation(format!("bad {field}: {e}")))
}
