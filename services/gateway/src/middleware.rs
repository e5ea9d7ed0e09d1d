//! HTTP middleware helpers

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use crate::config::GatewayConfig;

/// Build the CORS layer from configuration
pub fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let mut cors =
        CorsLayer::new().max_age(std::time::Duration::from_secs(config.cors.max_age_seconds));

    if config.cors.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(tower_http::cors::Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Result<Vec<Method>, _> = config
        .cors
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();
    if let Ok(methods) = methods {
        cors = cors.allow_methods(methods);
    }

    let headers: Result<Vec<HeaderName>, _> = config
        .cors
        .allowed_headers
        .iter()
        .map(|header| header.parse())
        .collect();
    if let Ok(headers) = headers {
        cors = cors.allow_headers(headers);
    }

    cors
}
