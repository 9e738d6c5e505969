//! Health and documentation endpoints

mod helpers;

use helpers::{spawn_app, spawn_app_for};
use ragchat_core::RelayConfig;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_unconfigured_backend() {
    let app = spawn_app(RelayConfig::default()).await;

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: Value = response.json().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["backendConfigured"], false);
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_reports_configured_backend() {
    let app = spawn_app_for("https://api.example.com", 60).await;

    let health: Value = app.get("/api/health").await.json().await.unwrap();
    assert_eq!(health["backendConfigured"], true);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app(RelayConfig::default()).await;

    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc: Value = response.json().await.unwrap();
    assert_eq!(doc["info"]["title"], "RagChat Relay API");
    assert!(doc["paths"]["/api/chat/rag"]["post"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = spawn_app(RelayConfig::default()).await;

    let response = app.get("/api/chat/unknown").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
