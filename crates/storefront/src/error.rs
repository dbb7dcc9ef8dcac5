//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Every error response carries a JSON body of the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serendib_core::chat::api::ApiErrorBody;
use serendib_core::{CartError, SessionIdError};
use thiserror::Error;

use crate::rasa::RasaError;

/// Message returned when the bot service cannot be reached.
pub const CHATBOT_UNREACHABLE: &str =
    "Cannot connect to chatbot server. Please ensure Rasa is running.";

/// Message returned when the bot service answers with an error.
pub const CHATBOT_FAILED: &str = "Failed to get response from chatbot";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart mutation or persistence failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Bot service call failed.
    #[error("Rasa error: {0}")]
    Rasa(#[from] RasaError),

    /// Client sent a malformed session id.
    #[error("Invalid session id: {0}")]
    InvalidSession(#[from] SessionIdError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Cart(CartError::UnknownProduct(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::QuantityTooLarge { .. })
            | Self::InvalidSession(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rasa(err) if err.is_unreachable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Cart(CartError::Storage(_))
            | Self::Rasa(_)
            | Self::Session(_)
            | Self::Template(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ApiErrorBody {
        // Don't expose internal error details to clients
        let (error, status_code) = match self {
            Self::Rasa(err) if err.is_unreachable() => (CHATBOT_UNREACHABLE.to_string(), None),
            Self::Rasa(err) => (CHATBOT_FAILED.to_string(), err.upstream_status()),
            Self::Cart(CartError::Storage(_))
            | Self::Session(_)
            | Self::Template(_)
            | Self::Internal(_) => ("Internal server error".to_string(), None),
            Self::Cart(err) => (err.to_string(), None),
            Self::InvalidSession(err) => (format!("Invalid session id: {err}"), None),
            Self::NotFound(msg) | Self::BadRequest(msg) => (msg.clone(), None),
        };
        ApiErrorBody { error, status_code }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Client error");
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {err}"))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}
