//! Chat relay handlers

use crate::{AppState, WebError};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Json,
};
use ragchat_core::{ChatError, ChatMode};
use serde_json::Value;

/// Relay a knowledge-base chat request
#[utoipa::path(
    post,
    path = "/api/chat/rag",
    tag = "Chat",
    summary = "Relay a RAG chat request",
    description = "Forward the JSON body unmodified to the backend's /api/chat/rag endpoint and pass its answer through",
    request_body = ragchat_core::ChatRequest,
    responses(
        (status = 200, description = "Backend answer, passed through unchanged", body = ragchat_core::ChatAnswer),
        (status = 400, description = "Request body is not JSON", body = ragchat_core::RelayErrorBody),
        (status = 413, description = "Request body exceeds the size limit", body = ragchat_core::RelayErrorBody),
        (status = 500, description = "Backend not configured or unreachable", body = ragchat_core::RelayErrorBody),
        (status = 504, description = "Backend did not answer within the bounded wait", body = ragchat_core::RelayErrorBody)
    )
)]
pub async fn relay_rag(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, WebError> {
    relay(&state, ChatMode::Rag, body).await
}

/// Relay a general chat request
#[utoipa::path(
    post,
    path = "/api/chat/general",
    tag = "Chat",
    summary = "Relay a general chat request",
    description = "Forward the JSON body unmodified to the backend's /api/chat/general endpoint and pass its answer through",
    request_body = ragchat_core::ChatRequest,
    responses(
        (status = 200, description = "Backend answer, passed through unchanged", body = ragchat_core::ChatAnswer),
        (status = 400, description = "Request body is not JSON", body = ragchat_core::RelayErrorBody),
        (status = 413, description = "Request body exceeds the size limit", body = ragchat_core::RelayErrorBody),
        (status = 500, description = "Backend not configured or unreachable", body = ragchat_core::RelayErrorBody),
        (status = 504, description = "Backend did not answer within the bounded wait", body = ragchat_core::RelayErrorBody)
    )
)]
pub async fn relay_general(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, WebError> {
    relay(&state, ChatMode::General, body).await
}

async fn relay(
    state: &AppState,
    mode: ChatMode,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, WebError> {
    // Unconfigured relays answer before looking at the body, even a rejected one
    if !state.relay.is_configured() {
        let e = ChatError::backend_not_configured();
        e.log();
        return Err(e.into());
    }

    let body = body.map_err(|rejection| {
        let e = ChatError::RequestRejected {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        };
        e.log();
        e
    })?;

    let payload: Value = serde_json::from_slice(&body).map_err(|e| ChatError::InvalidRequest {
        message: e.to_string(),
    })?;

    match state.relay.forward(mode, &payload).await {
        Ok(data) => Ok(Json(data)),
        Err(e) => {
            e.log();
            Err(e.into())
        }
    }
}
