//! Common error types for services

use thiserror::Error;

/// Service error taxonomy
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed request body, unparseable timestamp, or inverted window
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Data source fetch failed (connectivity or query failure)
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Neither the requested window nor the widened fallback window had data
    #[error("No data in the requested or fallback window")]
    NoData,

    /// Malformed frame structure or connection read/write failure
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
