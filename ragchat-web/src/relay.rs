//! Backend relay
//!
//! Forwards one chat request to `{origin}/api/chat/{mode}` and classifies the
//! outcome. A single attempt is made; the whole exchange (connect, response
//! head and body) runs under one `tokio::time::timeout`, and dropping that
//! future cancels the in-flight call together with its timer.

use ragchat_core::{
    truncate_chars, ChatError, ChatMode, ChatResult, RelayConfig, UNREADABLE_ERROR_BODY,
};
use serde_json::Value;
use tracing::{debug, error, info};

/// Characters of the request body echoed into the debug log
const REQUEST_PREVIEW_CHARS: usize = 100;

/// Stateless forwarder shared by all relay requests
#[derive(Debug, Clone)]
pub struct BackendRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl BackendRelay {
    pub fn new(config: RelayConfig) -> ChatResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Relay `body` unmodified to the backend endpoint for `mode`.
    ///
    /// Returns the backend's JSON untouched on success.
    pub async fn forward(&self, mode: ChatMode, body: &Value) -> ChatResult<Value> {
        if !self.is_configured() {
            error!("Backend origin is not configured (set API_URL)");
            return Err(ChatError::backend_not_configured());
        }

        let url = format!("{}{}", self.config.resolved_origin(), mode.endpoint());
        info!("🔄 Proxying to: {}", url);
        debug!(
            "📦 Request body: {}",
            truncate_chars(&body.to_string(), REQUEST_PREVIEW_CHARS)
        );

        match tokio::time::timeout(self.config.timeout(), self.exchange(&url, body)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout {
                seconds: self.config.timeout_secs,
            }),
        }
    }

    async fn exchange(&self, url: &str, body: &Value) -> ChatResult<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_ERROR_BODY.to_string());
            error!("❌ Backend error {}: {}", status.as_u16(), text);

            return Err(ChatError::Backend {
                status: status.as_u16(),
                detail: truncate_chars(&text, self.config.error_detail_max_chars).to_string(),
            });
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(|e| self.network_error(e))?;

        info!("✅ Proxy success");
        Ok(data)
    }

    fn network_error(&self, error: reqwest::Error) -> ChatError {
        ChatError::network(
            error.to_string(),
            Some(self.config.resolved_origin().to_string()),
        )
    }
}
