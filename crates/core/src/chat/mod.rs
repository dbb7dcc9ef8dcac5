//! Chat transcript types and the relay to an external bot service.
//!
//! # Modules
//!
//! - [`relay`] - `ChatBackend` port and the `ChatRelay` that renders replies
//! - [`api`] - Request/response bodies of `POST /api/chat`

pub mod api;
pub mod relay;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::SessionId;

pub use relay::{ChatBackend, ChatRelay, FALLBACK_MESSAGE, RelayOutcome};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Bot,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only list of messages for one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    session_id: SessionId,
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// Start an empty transcript.
    #[must_use]
    pub const fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Append a user message stamped now.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::now(ChatRole::User, text));
    }

    /// Append a bot message stamped now.
    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::now(ChatRole::Bot, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_appends_in_order() {
        let mut transcript = ChatTranscript::new(SessionId::default_session());
        transcript.push_user("hello");
        transcript.push_bot("Ayubowan!");

        let roles: Vec<_> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Bot]);
        assert_eq!(transcript.len(), 2);
        let first = transcript.messages().first().expect("first message");
        let last = transcript.messages().last().expect("last message");
        assert!(first.timestamp <= last.timestamp);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Bot).expect("serialize"),
            "\"bot\""
        );
        assert_eq!(ChatRole::User.to_string(), "user");
    }
}
