//! Application state shared by all handlers

use crate::{BackendRelay, WebConfig, WebError, WebResult};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Forwarder to the chat backend
    pub relay: Arc<BackendRelay>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let relay = BackendRelay::new(config.relay.clone())
            .map_err(|e| WebError::Config(e.to_string()))?;

        if relay.is_configured() {
            info!("Relaying chat requests to {}", relay.config().resolved_origin());
        } else {
            warn!("⚠️ API_URL is not set; chat requests will be answered with a configuration error");
        }

        Ok(Self {
            config,
            relay: Arc::new(relay),
        })
    }
}
