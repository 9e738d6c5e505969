//! Core trait definitions

use crate::error::ChatResult;
use crate::types::{ChatAnswer, ChatMode, ChatRequest};
use async_trait::async_trait;

/// Carries one chat request to a chat endpoint and returns its answer.
///
/// Implemented over HTTP by the client binary; tests substitute in-memory
/// doubles.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `request` to the endpoint selected by `mode`
    async fn send(&self, mode: ChatMode, request: &ChatRequest) -> ChatResult<ChatAnswer>;
}
