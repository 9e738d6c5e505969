//! API documentation handlers

use crate::openapi::ApiDoc;
use axum::response::Json;
use utoipa::OpenApi;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
