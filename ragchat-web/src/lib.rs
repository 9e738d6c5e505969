//! RagChat Web Relay
//!
//! A small axum server that forwards chat requests to the configured RAG
//! backend under a bounded wait and maps every outcome to a JSON response.

pub mod handlers;
pub mod openapi;
pub mod relay;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use relay::BackendRelay;
pub use server::RelayServer;
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
    Router,
};
use ragchat_core::{ChatError, RelayConfig, RelayErrorBody};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Level of the per-request spans and response events.
///
/// Development mode raises them to INFO and records request headers.
pub fn request_trace_level(dev_mode: bool) -> Level {
    if dev_mode {
        Level::INFO
    } else {
        Level::DEBUG
    }
}

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let dev_mode = state.config.dev_mode;
    let level = request_trace_level(dev_mode);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(level).include_headers(dev_mode))
        .on_response(DefaultOnResponse::new().level(level));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::docs_routes())
        .layer(trace)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// Configuration for the relay server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log every request at INFO, headers included
    pub dev_mode: bool,
    /// Backend relay settings
    pub relay: RelayConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            dev_mode: false,
            relay: RelayConfig::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("RAGCHAT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("RAGCHAT_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            dev_mode: std::env::var("RAGCHAT_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            relay: RelayConfig::from_env(),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the relay server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Relay(#[from] ChatError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            WebError::Relay(e) => (
                StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.to_error_body(),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RelayErrorBody {
                    error: "Internal server error".to_string(),
                    detail: Some(other.to_string()),
                    backend_url: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_mode_raises_request_tracing() {
        assert_eq!(request_trace_level(true), Level::INFO);
        assert_eq!(request_trace_level(false), Level::DEBUG);
    }
}
