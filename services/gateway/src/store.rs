//! Data source seam
//!
//! The gateway is read-only over an external store; this trait is the
//! whole contract. The in-memory implementation backs tests and the
//! default wiring; a database-backed implementation plugs in behind the
//! same trait.

use async_trait::async_trait;

use pulse_common::{Asset, RawMessage, ScorePoint, ServiceError, Window};

/// Read-only sentiment data source
#[async_trait]
pub trait SentimentStore: Send + Sync {
    /// Load the static asset table; invoked once before the first request
    async fn load_assets(&self) -> Result<Vec<Asset>, ServiceError>;

    /// Pre-aggregated per-bucket scores inside `window`
    async fn fetch_aggregates_between(
        &self,
        window: Window,
    ) -> Result<Vec<ScorePoint>, ServiceError>;

    /// Recent raw scored events, for the one-shot aggregate
    async fn fetch_message_scores(&self) -> Result<Vec<ScorePoint>, ServiceError>;

    /// Raw messages for one asset inside `window`, for the explain path
    async fn fetch_messages_for_asset(
        &self,
        asset_id: i64,
        window: Window,
    ) -> Result<Vec<RawMessage>, ServiceError>;
}

/// In-memory store used by tests and the default wiring
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    assets: Vec<Asset>,
    aggregates: Vec<ScorePoint>,
    message_scores: Vec<ScorePoint>,
    messages: Vec<RawMessage>,
    failing: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    #[must_use]
    pub fn with_aggregates(mut self, aggregates: Vec<ScorePoint>) -> Self {
        self.aggregates = aggregates;
        self
    }

    #[must_use]
    pub fn with_message_scores(mut self, scores: Vec<ScorePoint>) -> Self {
        self.message_scores = scores;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Vec<RawMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Make every fetch fail, to exercise data-source error paths
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.failing {
            return Err(ServiceError::DataSource(
                "memory store configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SentimentStore for MemoryStore {
    async fn load_assets(&self) -> Result<Vec<Asset>, ServiceError> {
        self.check()?;
        Ok(self.assets.clone())
    }

    async fn fetch_aggregates_between(
        &self,
        window: Window,
    ) -> Result<Vec<ScorePoint>, ServiceError> {
        self.check()?;
        Ok(self
            .aggregates
            .iter()
            .filter(|point| window.contains(point.observed_at))
            .cloned()
            .collect())
    }

    async fn fetch_message_scores(&self) -> Result<Vec<ScorePoint>, ServiceError> {
        self.check()?;
        Ok(self.message_scores.clone())
    }

    async fn fetch_messages_for_asset(
        &self,
        asset_id: i64,
        window: Window,
    ) -> Result<Vec<RawMessage>, ServiceError> {
        self.check()?;
        Ok(self
            .messages
            .iter()
            .filter(|msg| msg.asset_id == asset_id && window.contains(msg.created_at))
            .cloned()
            .collect())
    }
}
