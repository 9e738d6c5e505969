//! OpenAPI specification for the relay API

use crate::handlers::HealthResponse;
use ragchat_core::{ChatAnswer, ChatMode, ChatRequest, Model, RelayErrorBody};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RagChat Relay API",
        version = "0.1.0",
        description = "Relay forwarding chat requests to a RAG backend",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,
        crate::handlers::relay_rag,
        crate::handlers::relay_general,
    ),
    components(
        schemas(
            HealthResponse,
            ChatRequest,
            ChatAnswer,
            ChatMode,
            Model,
            RelayErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Chat", description = "Chat relay operations"),
    )
)]
pub struct ApiDoc;
