//! HTTP error mapping for the gateway

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use tracing::error;

use pulse_common::ServiceError;

use crate::models::ErrorFrame;

/// Gateway request error, mapped onto HTTP status codes
///
/// Validation -> 400, NoData -> 404, DataSource/Internal -> 500. Protocol
/// errors never reach this path; they terminate the WebSocket session
/// instead of producing a response.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::NoData => (StatusCode::NOT_FOUND, "no messages".to_string()),
            ServiceError::DataSource(msg) => {
                error!("Data source failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "data source error".to_string(),
                )
            }
            ServiceError::Protocol(msg) | ServiceError::Internal(msg) => {
                error!("Internal failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(ErrorFrame::new(message))).into_response()
    }
}
