//! Wire types of the Rasa REST channel.

use serde::{Deserialize, Serialize};

/// Body posted to `/webhooks/rest/webhook`.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookRequest<'a> {
    /// Conversation id; Rasa keys its tracker by sender.
    pub sender: &'a str,
    pub message: &'a str,
}

/// One element of the webhook's JSON array reply.
///
/// Rasa may send text, images, buttons or custom payloads; only `text` is
/// rendered by the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReply {
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_deserialization_mixed_elements() {
        let json = r#"[
            {"recipient_id": "abc", "text": "Ayubowan!"},
            {"recipient_id": "abc", "image": "https://example.com/sigiriya.jpg"},
            {"recipient_id": "abc", "custom": {"kind": "map"}}
        ]"#;

        let replies: Vec<WebhookReply> = serde_json::from_str(json).unwrap();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies.first().unwrap().text.as_deref(), Some("Ayubowan!"));
        assert!(replies.last().unwrap().text.is_none());
    }

    #[test]
    fn test_request_serialization() {
        let body = WebhookRequest {
            sender: "session-1",
            message: "hello",
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"sender":"session-1","message":"hello"}"#
        );
    }
}
