//! Relay of user messages to an external bot service.
//!
//! The relay is a single request/response exchange: no retry, no backoff.
//! Whatever the backend returns is rendered into the transcript; any failure
//! is rendered as one generic fallback message.

use std::future::Future;

use super::ChatTranscript;
use crate::types::SessionId;

/// Bot message shown when the backend fails or replies with nothing.
pub const FALLBACK_MESSAGE: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Port to the external conversational service.
pub trait ChatBackend {
    /// Error type of the transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send one user message and return the bot's text fragments in order.
    fn send(
        &self,
        session_id: &SessionId,
        message: &str,
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}

/// What happened during a relay.
#[derive(Debug)]
pub enum RelayOutcome<E> {
    /// The backend answered with this many text fragments.
    Replied(usize),
    /// The backend answered with no text; the fallback was shown.
    Empty,
    /// The backend failed; the fallback was shown.
    Failed(E),
    /// The user message was blank and nothing was sent.
    Ignored,
}

impl<E> RelayOutcome<E> {
    /// Whether the fallback message was rendered.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        matches!(self, Self::Empty | Self::Failed(_))
    }
}

/// Forwards user messages to a [`ChatBackend`] and renders the replies.
#[derive(Debug, Clone)]
pub struct ChatRelay<B> {
    backend: B,
}

impl<B: ChatBackend> ChatRelay<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Append the user's message, send it, and append the bot replies.
    ///
    /// Each returned fragment becomes one bot message. On error, or when the
    /// backend returns no fragments, a single [`FALLBACK_MESSAGE`] is
    /// appended instead. Blank input is ignored; anything else is recorded
    /// and sent exactly as typed.
    pub async fn relay(&self, transcript: &mut ChatTranscript, text: &str) -> RelayOutcome<B::Error> {
        if text.trim().is_empty() {
            return RelayOutcome::Ignored;
        }

        transcript.push_user(text);

        match self.backend.send(transcript.session_id(), text).await {
            Ok(fragments) if fragments.is_empty() => {
                transcript.push_bot(FALLBACK_MESSAGE);
                RelayOutcome::Empty
            }
            Ok(fragments) => {
                let count = fragments.len();
                for fragment in fragments {
                    transcript.push_bot(fragment);
                }
                RelayOutcome::Replied(count)
            }
            Err(e) => {
                transcript.push_bot(FALLBACK_MESSAGE);
                RelayOutcome::Failed(e)
            }
        }
    }
}
