//! Router assembly and startup helpers shared by the binary and tests.

use std::path::{Path, PathBuf};

use axum::{Router, body::Body, http::Request, middleware::from_fn, routing::get};
use serendib_core::{Catalog, CatalogError};
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    cors_layer, create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::routes;
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Errors loading the product catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Load the catalog from `path`, or the built-in catalog when unset.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_json(&json)?)
}

/// Build the full application router with middleware.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// chat rate limiter can key on the peer address.
pub fn build_router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the bot service;
/// see `/api/health` for that.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::extract::ConnectInfo;
    use axum::http::StatusCode;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::{CorsOrigins, RasaConfig, StorefrontConfig};
    use crate::middleware::REQUEST_ID_HEADER;

    fn router(data_dir: &Path) -> Router {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            data_dir: data_dir.to_path_buf(),
            catalog_path: None,
            rasa: RasaConfig {
                server_url: Url::parse("http://127.0.0.1:9").unwrap(),
                timeout: Duration::from_secs(1),
            },
            cors: CorsOrigins::Any,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        build_router(AppState::new(config, Catalog::builtin().unwrap()).unwrap())
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_liveness_and_headers() {
        let dir = tempfile::tempdir().unwrap();
        let response = router(dir.path())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_product_pages() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(dir.path());

        let response = app
            .clone()
            .oneshot(
                Request::get("/products?category=tea")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert_eq!(html.matches("class=\"product-card\"").count(), 2);

        let response = app
            .oneshot(Request::get("/products/999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("\"error\""));
    }

    #[tokio::test]
    async fn test_api_chat_rejects_blank_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": "   "}"#))
            .unwrap();
        let peer: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        let response = router(dir.path()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            r#"{"error":"Message cannot be empty"}"#
        );
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "name": "Batik Sarong", "price": {"amount": "3200.00", "currency_code": "LKR"},
                "image": "/static/img/products/sarong.jpg", "category": "apparel", "rating": 4.1}]"#,
        )
        .unwrap();

        let catalog = load_catalog(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);

        assert!(matches!(
            load_catalog(Some(&dir.path().join("missing.json"))),
            Err(CatalogLoadError::Io { .. })
        ));
        assert!(load_catalog(None).unwrap().len() > 1);
    }
}
