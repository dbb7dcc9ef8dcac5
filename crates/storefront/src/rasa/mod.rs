//! Rasa REST channel client.
//!
//! The conversational engine is an external service. This client posts a
//! user message to `{RASA_SERVER_URL}/webhooks/rest/webhook` and returns the
//! bot's reply elements; it also probes `{RASA_SERVER_URL}/status` for the
//! health endpoint. No retries: one request, one response.

mod error;
mod types;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serendib_core::SessionId;
use serendib_core::chat::ChatBackend;
use tracing::instrument;

use crate::config::RasaConfig;

pub use error::RasaError;
pub use types::{WebhookReply, WebhookRequest};

const WEBHOOK_PATH: &str = "webhooks/rest/webhook";
const STATUS_PATH: &str = "status";
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_ERROR_BODY: usize = 512;

/// Rasa REST channel client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RasaClient {
    inner: Arc<RasaClientInner>,
}

struct RasaClientInner {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RasaClient {
    /// Create a new Rasa client.
    ///
    /// # Errors
    ///
    /// Returns `RasaError::Http` if the HTTP client cannot be built.
    pub fn new(config: &RasaConfig) -> Result<Self, RasaError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(RasaClientInner {
                client,
                base_url: config.server_url.as_str().trim_end_matches('/').to_string(),
                timeout: config.timeout,
            }),
        })
    }

    /// Base URL of the Rasa server, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Send a user message and return all reply elements.
    ///
    /// # Errors
    ///
    /// Returns `Unreachable` if the server cannot be reached, `Status` for a
    /// non-success response, and `Parse` if the body is not a JSON array.
    #[instrument(skip(self, message), fields(sender = %sender, message_len = message.len()))]
    pub async fn send_message(
        &self,
        sender: &SessionId,
        message: &str,
    ) -> Result<Vec<WebhookReply>, RasaError> {
        let body = WebhookRequest {
            sender: sender.as_str(),
            message,
        };

        let response = self
            .inner
            .client
            .post(self.endpoint(WEBHOOK_PATH))
            .timeout(self.inner.timeout)
            .json(&body)
            .send()
            .await
            .map_err(RasaError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_status(status, response).await);
        }

        let text = response.text().await.map_err(RasaError::from_transport)?;
        let replies: Vec<WebhookReply> = serde_json::from_str(&text)
            .map_err(|e| RasaError::Parse(format!("Failed to parse webhook reply: {e}")))?;

        tracing::debug!(replies = replies.len(), "Rasa replied");
        Ok(replies)
    }

    /// Probe the server's `/status` endpoint (5 second timeout).
    ///
    /// # Errors
    ///
    /// Returns `Unreachable` if the server cannot be reached and `Status` for
    /// a non-success response.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<(), RasaError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(STATUS_PATH))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(RasaError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_status(status, response).await)
        }
    }

    async fn error_from_status(status: reqwest::StatusCode, response: reqwest::Response) -> RasaError {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        RasaError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

impl ChatBackend for RasaClient {
    type Error = RasaError;

    async fn send(&self, session_id: &SessionId, message: &str) -> Result<Vec<String>, RasaError> {
        let replies = self.send_message(session_id, message).await?;
        Ok(replies.into_iter().filter_map(|r| r.text).collect())
    }
}
