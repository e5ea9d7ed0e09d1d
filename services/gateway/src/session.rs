//! Streaming session state machine
//!
//! One `StreamSession` per WebSocket connection, owned by that
//! connection's task. Frames are processed strictly in arrival order: the
//! snapshot for frame N is computed and written before frame N+1 is read,
//! so no locking is needed anywhere in the session.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use chrono::{DateTime, Utc};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use pulse_common::{ServiceError, Timeline, Window};

use crate::{
    assets::AssetTable,
    bucketer::bucket_scores,
    config::AggregationConfig,
    models::{ControlFrame, ErrorFrame},
    server::AppState,
    store::SentimentStore,
};

/// Result of processing one inbound control frame
#[derive(Debug)]
pub enum FrameOutcome {
    /// Valid frame: the re-aggregated timeline to emit
    Snapshot(Timeline),
    /// Parseable frame with an invalid window or a failed fetch: notify
    /// in-band, keep state, stay active
    Reject(ErrorFrame),
    /// Malformed frame: terminate the session
    Close,
}

/// Per-connection session state
pub struct StreamSession {
    store: Arc<dyn SentimentStore>,
    assets: Arc<AssetTable>,
    aggregation: AggregationConfig,
    window: Window,
    filter: Option<Vec<String>>,
}

impl StreamSession {
    /// Create a session with the default window (the most recent hour)
    /// and an optional asset-code filter supplied at connection time
    #[must_use]
    pub fn new(
        store: Arc<dyn SentimentStore>,
        assets: Arc<AssetTable>,
        aggregation: AggregationConfig,
        initial_filter: Option<Vec<String>>,
    ) -> Self {
        let now = Utc::now();
        let window = Window {
            start: now - aggregation.default_window(),
            end: now,
        };
        Self {
            store,
            assets,
            aggregation,
            window,
            filter: initial_filter,
        }
    }

    /// Current aggregation window
    #[must_use]
    pub const fn window(&self) -> Window {
        self.window
    }

    /// Current asset filter, when one is active
    #[must_use]
    pub fn filter(&self) -> Option<&[String]> {
        self.filter.as_deref()
    }

    /// Process one inbound control frame
    ///
    /// The frame is the atomic unit of work: state is only updated once
    /// the new window has validated, so a rejected frame leaves the prior
    /// window and filter untouched.
    pub async fn handle_frame(&mut self, text: &str) -> FrameOutcome {
        let frame: ControlFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Malformed control frame, closing session: {}", e);
                return FrameOutcome::Close;
            }
        };

        let window = match parse_window(&frame) {
            Ok(window) => window,
            Err(e) => {
                warn!("Rejected control frame: {}", e);
                return FrameOutcome::Reject(ErrorFrame::new(
                    "invalid start_time or end_time",
                ));
            }
        };

        self.window = window;
        if let Some(tokens) = frame.tokens {
            info!("Token filter overridden: {:?}", tokens);
            self.filter = Some(tokens);
        }

        let points = match self.store.fetch_aggregates_between(window).await {
            Ok(points) => points,
            Err(e) => {
                error!("Aggregate fetch failed: {}", e);
                return FrameOutcome::Reject(ErrorFrame::new("data fetch failed"));
            }
        };

        let labels = self.effective_labels();
        let assets = Arc::clone(&self.assets);
        let timeline = bucket_scores(
            &points,
            self.aggregation.bucket_width(),
            window,
            &labels,
            |id| assets.label(id),
        );
        FrameOutcome::Snapshot(timeline)
    }

    /// The asset label set for the next snapshot: the active filter, else
    /// every known code, lexicographically sorted either way
    fn effective_labels(&self) -> Vec<String> {
        match &self.filter {
            Some(codes) => {
                let mut codes = codes.clone();
                codes.sort();
                codes
            }
            None => self.assets.codes_sorted(),
        }
    }
}

/// Parse and validate the frame's window
fn parse_window(frame: &ControlFrame) -> Result<Window, ServiceError> {
    let start = parse_rfc3339(frame.start_time.as_deref(), "start_time")?;
    let end = parse_rfc3339(frame.end_time.as_deref(), "end_time")?;
    Window::new(start, end)
}

fn parse_rfc3339(value: Option<&str>, field: &str) -> Result<DateTime<Utc>, ServiceError> {
    let raw = value
        .ok_or_else(|| ServiceError::Validation(format!("{field} is required")))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ServiceError::Validation(format!("bad {field}: {e}")))
}

/// Query parameters accepted at upgrade time
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Comma-separated asset codes installed as the initial filter
    pub tokens: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let initial_filter = query.tokens.as_deref().map(|raw| {
        raw.split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect::<Vec<_>>()
    });
    if let Some(filter) = &initial_filter {
        info!("Initial token filter: {:?}", filter);
    }

    ws.on_upgrade(move |socket| {
        let session = StreamSession::new(
            Arc::clone(&state.store),
            Arc::clone(&state.assets),
            state.config.aggregation.clone(),
            initial_filter,
        );
        serve_socket(socket, session)
    })
}

/// Drive one connection: read a frame, process it, write the snapshot,
/// repeat. Protocol pings are answered with pongs carrying the same
/// payload; pongs are logged and otherwise ignored.
pub async fn serve_socket(socket: WebSocket, mut session: StreamSession) {
    info!("WebSocket connection established");
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let payload = match session.handle_frame(&text).await {
                    FrameOutcome::Snapshot(timeline) => {
                        info!("Sending {} buckets", timeline.len());
                        serde_json::to_string(&timeline)
                    }
                    FrameOutcome::Reject(frame) => serde_json::to_string(&frame),
                    FrameOutcome::Close => break,
                };
                let payload = match payload {
                    Ok(payload) => payload,
                    Err(e) => {
                        error!("Snapshot serialization failed: {}", e);
                        break;
                    }
                };
                if sender.send(Message::Text(payload)).await.is_err() {
                    warn!("WebSocket write failed, closing session");
                    break;
                }
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Pong(data)) => {
                info!("Received pong ({} bytes)", data.len());
            }
            Ok(Message::Binary(_)) => {
                warn!("Binary frame not supported, closing session");
                break;
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed by client");
                break;
            }
            Err(e) => {
                warn!("WebSocket read error: {}", e);
                break;
            }
        }
    }

    info!("WebSocket session ended");
}
