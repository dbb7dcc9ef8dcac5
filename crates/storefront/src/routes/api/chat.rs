//! `POST /api/chat`: JSON relay to the bot service.
//!
//! Unlike the web chat page, failures are reported to the caller as HTTP
//! errors rather than rendered as a fallback message:
//!
//! - empty message: 400
//! - bot service answered non-2xx: 500 with the upstream `status_code`
//! - bot service unreachable: 503

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serendib_core::chat::api::{BotMessage, ChatReply, ChatRequest};
use serendib_core::{ChatRole, ChatTranscript, RelayOutcome, SessionId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Relay one message and return the bot's replies.
#[instrument(skip(state, payload), fields(session_id = tracing::field::Empty))]
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let session_id = match request.session_id.as_deref() {
        Some(raw) => SessionId::parse(raw)?,
        None => SessionId::default_session(),
    };
    tracing::Span::current().record("session_id", session_id.as_str());

    let mut transcript = ChatTranscript::new(session_id);
    let messages = match state.relay().relay(&mut transcript, &request.message).await {
        RelayOutcome::Replied(_) => bot_messages(&transcript),
        RelayOutcome::Empty => Vec::new(),
        RelayOutcome::Failed(err) => return Err(err.into()),
        RelayOutcome::Ignored => {
            return Err(AppError::BadRequest("Message cannot be empty".to_string()));
        }
    };

    Ok(Json(ChatReply {
        success: true,
        messages,
        session_id: transcript.session_id().to_string(),
    }))
}

fn bot_messages(transcript: &ChatTranscript) -> Vec<BotMessage> {
    transcript
        .messages()
        .iter()
        .filter(|m| m.role == ChatRole::Bot)
        .map(|m| BotMessage::new(m.text.clone(), m.timestamp.to_rfc3339()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_messages_skip_user_turns() {
        let mut transcript = ChatTranscript::new(SessionId::default_session());
        transcript.push_user("What is the best time to visit?");
        transcript.push_bot("December to April.");
        transcript.push_bot("Anything else?");

        let messages = bot_messages(&transcript);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.kind == BotMessage::KIND));
        assert_eq!(messages.first().unwrap().content, "December to April.");
        assert!(
            chrono::DateTime::parse_from_rfc3339(&messages.first().unwrap().timestamp).is_ok()
        );
    }
}
