//! HTTP transport to a chat endpoint
//!
//! Talks either to the backend directly or to the relay; both expose the same
//! `/api/chat/{rag|general}` surface.

use async_trait::async_trait;
use ragchat_core::{
    truncate_chars, ChatAnswer, ChatError, ChatMode, ChatRequest, ChatResult, ChatTransport,
    ClientConfig, ERROR_DETAIL_MAX_CHARS, UNREADABLE_ERROR_BODY,
};
use std::time::Duration;
use tracing::debug;

pub struct HttpTransport {
    client: reqwest::Client,
    origin: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(origin: impl Into<String>, timeout: Duration) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            origin: origin.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Transport for the target (relay or backend) selected by `config`
    pub fn from_config(config: &ClientConfig) -> ChatResult<Self> {
        Self::new(config.target_origin(), config.request_timeout())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn map_error(&self, error: reqwest::Error) -> ChatError {
        if error.is_timeout() {
            ChatError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            ChatError::network(error.to_string(), Some(self.origin.clone()))
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, mode: ChatMode, request: &ChatRequest) -> ChatResult<ChatAnswer> {
        let url = format!("{}{}", self.origin, mode.endpoint());
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_ERROR_BODY.to_string());
            return Err(ChatError::Backend {
                status: status.as_u16(),
                detail: truncate_chars(&text, ERROR_DETAIL_MAX_CHARS).to_string(),
            });
        }

        response
            .json::<ChatAnswer>()
            .await
            .map_err(|e| self.map_error(e))
    }
}
