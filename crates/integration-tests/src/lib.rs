//! Integration tests for Serendib.
//!
//! Each test starts a mock Rasa server and a storefront on ephemeral ports,
//! then drives the storefront over HTTP with a cookie-keeping client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p serendib-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use serendib_core::Catalog;
use serendib_storefront::config::{CorsOrigins, RasaConfig, StorefrontConfig};
use serendib_storefront::{AppState, build_router};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

/// How the mock Rasa server answers.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// One `{"recipient_id", "text"}` element per string.
    Texts(Vec<String>),
    /// This exact JSON body.
    Raw(Value),
    /// An error status with a short body, for both webhook and status probe.
    Status(u16),
}

impl MockReply {
    /// Reply with the given texts.
    #[must_use]
    pub fn texts(texts: &[&str]) -> Self {
        Self::Texts(texts.iter().map(ToString::to_string).collect())
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    received: Arc<Mutex<Vec<Value>>>,
}

/// A stand-in Rasa REST channel.
pub struct MockRasa {
    pub url: Url,
    received: Arc<Mutex<Vec<Value>>>,
}

impl MockRasa {
    /// Start the mock on an ephemeral port.
    pub async fn start(reply: MockReply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            received: Arc::clone(&received),
        };

        let app = Router::new()
            .route("/webhooks/rest/webhook", post(webhook))
            .route("/status", get(status))
            .with_state(state);

        let addr = serve(app).await;
        Self {
            url: Url::parse(&format!("http://{addr}")).expect("mock url"),
            received,
        }
    }

    /// Webhook bodies received so far.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().expect("mock lock").clone()
    }
}

async fn webhook(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let sender = body["sender"].as_str().unwrap_or_default().to_string();
    state.received.lock().expect("mock lock").push(body);

    match state.reply {
        MockReply::Texts(texts) => {
            let elements: Vec<Value> = texts
                .into_iter()
                .map(|text| json!({"recipient_id": sender, "text": text}))
                .collect();
            Json(Value::Array(elements)).into_response()
        }
        MockReply::Raw(value) => Json(value).into_response(),
        MockReply::Status(code) => error_status(code),
    }
}

async fn status(State(state): State<MockState>) -> Response {
    match state.reply {
        MockReply::Status(code) => error_status(code),
        _ => Json(json!({"version": "3.6.0"})).into_response(),
    }
}

fn error_status(code: u16) -> Response {
    let status = StatusCode::from_u16(code).expect("valid status code");
    (status, "mock failure").into_response()
}

/// A URL on which nothing is listening.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("url")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("server");
    });
    addr
}

/// A running storefront plus a client that keeps its session cookie.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: Url,
    data_dir: TempDir,
}

impl TestContext {
    /// Start a storefront relaying to `rasa_url`.
    pub async fn start(rasa_url: Url) -> Self {
        let data_dir = tempfile::tempdir().expect("tempdir");
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            base_url: "http://localhost".to_string(),
            data_dir: data_dir.path().to_path_buf(),
            catalog_path: None,
            rasa: RasaConfig {
                server_url: rasa_url,
                timeout: Duration::from_secs(5),
            },
            cors: CorsOrigins::Any,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let catalog = Catalog::builtin().expect("builtin catalog");
        let state = AppState::new(config, catalog).expect("app state");
        let addr = serve(build_router(state)).await;

        Self {
            client: Self::new_client(),
            base_url: Url::parse(&format!("http://{addr}/")).expect("base url"),
            data_dir,
        }
    }

    /// A fresh client with its own cookie jar.
    #[must_use]
    pub fn new_client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("client")
    }

    /// Absolute URL for `path` on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .expect("join url")
    }

    /// Directory holding this storefront's carts.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// `POST /api/chat` with a JSON body.
    pub async fn post_chat(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/chat"))
            .json(body)
            .send()
            .await
            .expect("request")
    }

    /// Submit a form and return the final response after redirects.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request")
    }

    /// GET `path` and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request")
    }

    /// GET `path` and parse the body as JSON.
    pub async fn get_json(&self, path: &str) -> Value {
        self.get(path).await.json().await.expect("json body")
    }
}
