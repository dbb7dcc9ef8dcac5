//! Request and response bodies of the JSON chat API.
//!
//! ```text
//! POST /api/chat {"message": "...", "session_id": "..."}
//!   200 {"success": true, "messages": [{"type": "bot", "content": "...", "timestamp": "..."}], "session_id": "..."}
//!   4xx/5xx {"error": "...", "status_code": 502}
//! ```

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Successful reply of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub success: bool,
    pub messages: Vec<BotMessage>,
    pub session_id: String,
}

/// One rendered bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    /// Always `"bot"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    /// RFC 3339 time the relay received the reply.
    pub timestamp: String,
}

impl BotMessage {
    /// Kind tag of bot messages.
    pub const KIND: &'static str = "bot";

    #[must_use]
    pub fn new(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Error body returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    /// Upstream status code, when the bot service answered with an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}
