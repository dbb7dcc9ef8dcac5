//! Web chat page.
//!
//! The transcript lives in the visitor's session. Submitting the form relays
//! the message to the bot service and redirects back to the page, so a
//! reload never resends a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use serendib_core::{ChatMessage, ChatRole, ChatTranscript, RelayOutcome, SessionId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session::keys;
use crate::state::AppState;

/// Chat message display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageView {
    pub from_bot: bool,
    pub text: String,
    pub time: String,
}

impl From<&ChatMessage> for ChatMessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            from_bot: message.role == ChatRole::Bot,
            text: message.text.clone(),
            time: message.timestamp.format("%H:%M").to_string(),
        }
    }
}

/// Chat form data.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Chat page template.
#[derive(Template, WebTemplate)]
#[template(path = "chat/show.html")]
pub struct ChatShowTemplate {
    pub session_id: String,
    pub messages: Vec<ChatMessageView>,
}

/// Load the session's transcript, starting a new conversation if absent.
pub(crate) async fn load_transcript(session: &Session) -> Result<ChatTranscript> {
    let transcript = session
        .get::<ChatTranscript>(keys::CHAT_TRANSCRIPT)
        .await?
        .unwrap_or_else(|| ChatTranscript::new(SessionId::generate()));
    Ok(transcript)
}

/// Message views of a transcript, oldest first.
pub(crate) fn message_views(transcript: &ChatTranscript) -> Vec<ChatMessageView> {
    transcript
        .messages()
        .iter()
        .map(ChatMessageView::from)
        .collect()
}

/// Display the chat page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<impl IntoResponse> {
    let transcript = load_transcript(&session).await?;

    Ok(ChatShowTemplate {
        session_id: transcript.session_id().to_string(),
        messages: message_views(&transcript),
    })
}

/// Relay a message and redirect back to the chat page.
#[instrument(skip(state, session, form), fields(message_len = form.message.len()))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> Result<Redirect> {
    let mut transcript = load_transcript(&session).await?;

    match state.relay().relay(&mut transcript, &form.message).await {
        RelayOutcome::Ignored => return Ok(Redirect::to("/chat")),
        RelayOutcome::Replied(count) => {
            tracing::debug!(session_id = %transcript.session_id(), count, "Bot replied");
        }
        RelayOutcome::Empty => {
            tracing::info!(session_id = %transcript.session_id(), "Bot sent no text");
        }
        RelayOutcome::Failed(err) => {
            add_breadcrumb(
                "chat",
                "Relay failed",
                &[("session_id", transcript.session_id().to_string())],
            );
            tracing::warn!(session_id = %transcript.session_id(), error = %err, "Chat relay failed");
        }
    }

    session.insert(keys::CHAT_TRANSCRIPT, &transcript).await?;
    Ok(Redirect::to("/chat"))
}

/// Start a new conversation.
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Redirect> {
    let transcript = ChatTranscript::new(SessionId::generate());
    session.insert(keys::CHAT_TRANSCRIPT, &transcript).await?;

    tracing::debug!(session_id = %transcript.session_id(), "Chat reset");
    Ok(Redirect::to("/chat"))
}
