//! Terminal chat client.
//!
//! Relays each typed line to a running storefront's `POST /api/chat` and
//! prints the bot's replies. Failures print the same fallback message the
//! web page shows.
//!
//! ```bash
//! serendib chat                       # interactive
//! serendib chat -m "Best beaches?"    # one message, then exit
//! ```

use std::time::Duration;

use serendib_core::chat::api::{ApiErrorBody, ChatReply, ChatRequest};
use serendib_core::{ChatBackend, ChatRelay, ChatRole, ChatTranscript, RelayOutcome, SessionId};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

/// Errors returned by the storefront chat API.
#[derive(Debug, Error)]
pub enum ApiChatError {
    /// The storefront could not be reached.
    #[error("cannot reach storefront: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The storefront answered with an error body.
    #[error("storefront returned {status}: {error}")]
    Api { status: u16, error: String },

    /// Any other HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// [`ChatBackend`] that talks to a storefront's JSON chat API.
#[derive(Clone)]
pub struct ApiChatBackend {
    client: reqwest::Client,
    url: Url,
}

impl ApiChatBackend {
    /// Backend for the storefront at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the endpoint
    /// cannot be joined with the API path.
    pub fn new(endpoint: &Url) -> Result<Self, ChatCommandError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiChatError::from)?;
        let url = endpoint.join("api/chat")?;
        Ok(Self { client, url })
    }
}

impl ChatBackend for ApiChatBackend {
    type Error = ApiChatError;

    async fn send(&self, session_id: &SessionId, message: &str) -> Result<Vec<String>, ApiChatError> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: Some(session_id.to_string()),
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ApiChatError::Unreachable(e)
                } else {
                    ApiChatError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error = response
                .json::<ApiErrorBody>()
                .await
                .map_or_else(|_| status.to_string(), |body| body.error);
            return Err(ApiChatError::Api {
                status: status.as_u16(),
                error,
            });
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply.messages.into_iter().map(|m| m.content).collect())
    }
}

/// Errors that can occur running the chat command.
#[derive(Debug, Error)]
pub enum ChatCommandError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Api(#[from] ApiChatError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Print bot messages added to the transcript since `from`.
#[allow(clippy::print_stdout)]
fn print_replies(transcript: &ChatTranscript, from: usize) {
    for message in transcript.messages().iter().skip(from) {
        if message.role == ChatRole::Bot {
            println!("bot> {}", message.text);
        }
    }
}

async fn relay_line(
    relay: &ChatRelay<ApiChatBackend>,
    transcript: &mut ChatTranscript,
    line: &str,
) {
    let before = transcript.len();
    if let RelayOutcome::Failed(err) = relay.relay(transcript, line).await {
        tracing::warn!(error = %err, "Chat relay failed");
    }
    print_replies(transcript, before);
}

/// Run the chat command.
///
/// With `message`, sends it and exits; otherwise reads lines from stdin until
/// EOF or `/quit`. `/reset` starts a new session.
///
/// # Errors
///
/// Returns an error for an invalid endpoint or unreadable stdin. Relay
/// failures are reported in the conversation, not as errors.
#[allow(clippy::print_stdout)]
pub async fn run(
    endpoint: &Url,
    session: Option<SessionId>,
    message: Option<String>,
) -> Result<(), ChatCommandError> {
    let relay = ChatRelay::new(ApiChatBackend::new(endpoint)?);
    let mut transcript = ChatTranscript::new(session.unwrap_or_else(SessionId::generate));

    if let Some(message) = message {
        relay_line(&relay, &mut transcript, &message).await;
        return Ok(());
    }

    println!(
        "Chatting with {} (session {}). Type /reset for a new session, /quit to exit.",
        endpoint,
        transcript.session_id()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                transcript = ChatTranscript::new(SessionId::generate());
                println!("New session {}", transcript.session_id());
            }
            text => relay_line(&relay, &mut transcript, text).await,
        }
    }

    Ok(())
}
