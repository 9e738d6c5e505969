//! Route definitions for the relay server

use crate::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chat relay
        .route("/chat/rag", post(handlers::relay_rag))
        .route("/chat/general", post(handlers::relay_general))
}

/// Create API documentation routes
pub fn docs_routes() -> Router<AppState> {
    Router::new().route("/api-docs/openapi.json", get(handlers::openapi_json))
}
