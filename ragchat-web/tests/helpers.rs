//! Integration test helpers
//!
//! Spawns the relay and a stub chat backend on ephemeral ports.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use ragchat_core::RelayConfig;
use ragchat_web::{AppState, WebConfig};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

// Make sure tracing is initialised only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// How long the stub backend stalls on a `"slow"` message
pub const SLOW_BACKEND_DELAY: Duration = Duration::from_secs(5);

/// Running relay instance
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_chat(&self, mode: &str, body: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/chat/{}", &self.address, mode))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, mode: &str, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/chat/{}", &self.address, mode))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_body(&self, mode: &str, body: Vec<u8>) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/chat/{}", &self.address, mode))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Spawn the relay with the given backend settings
pub async fn spawn_app(relay: RelayConfig) -> TestApp {
    LazyLock::force(&TRACING);

    let config = WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        dev_mode: true,
        relay,
    };

    let state = AppState::new(config).expect("Failed to build app state");
    let app = ragchat_web::create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
    }
}

/// Spawn the relay pointed at `origin`
pub async fn spawn_app_for(origin: &str, timeout_secs: u64) -> TestApp {
    spawn_app(RelayConfig {
        backend_origin: Some(origin.to_string()),
        timeout_secs,
        ..RelayConfig::default()
    })
    .await
}

/// Shared state of the stub backend
#[derive(Clone, Default)]
pub struct StubState {
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
}

/// A fake chat backend that behaves according to the `message` field:
///
/// - `"slow"`: answers after [`SLOW_BACKEND_DELAY`]
/// - `"broken"`: 200 with a body that is not JSON
/// - `"status:<code>"`: `<code>` with a 600 character body
/// - anything else: `{answer: "hi", sources: ["a"], timestamp: "t"}`
pub struct StubBackend {
    pub origin: String,
    state: StubState,
}

impl StubBackend {
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.state.last_body.lock().unwrap().clone()
    }
}

pub async fn spawn_stub_backend() -> StubBackend {
    let state = StubState::default();

    let app = Router::new()
        .route("/api/chat/rag", post(stub_rag))
        .route("/api/chat/general", post(stub_general))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        origin: format!("http://127.0.0.1:{}", port),
        state,
    }
}

/// An origin nothing is listening on
pub async fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

async fn stub_rag(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().unwrap() = Some(body.clone());

    let message = body["message"].as_str().unwrap_or_default();

    if message == "slow" {
        tokio::time::sleep(SLOW_BACKEND_DELAY).await;
        return Json(json!({"answer": "late", "timestamp": "t"})).into_response();
    }

    if message == "broken" {
        return (StatusCode::OK, "<html>not json</html>").into_response();
    }

    if let Some(code) = message.strip_prefix("status:") {
        let status = StatusCode::from_u16(code.parse().unwrap()).unwrap();
        return (status, "오류".repeat(300)).into_response();
    }

    Json(json!({"answer": "hi", "sources": ["a"], "timestamp": "t"})).into_response()
}

async fn stub_general(State(state): State<StubState>, Json(body): Json<Value>) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().unwrap() = Some(body);

    Json(json!({"answer": "general answer", "timestamp": "t"})).into_response()
}
