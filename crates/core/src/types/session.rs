//! Chat session identifier.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur when parsing a [`SessionId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionIdError {
    /// The input string is empty.
    #[error("session id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("session id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("session id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A client-generated identifier correlating chat turns.
///
/// Session ids double as cart storage keys, so the accepted alphabet is kept
/// to characters that are safe in file names and URLs.
///
/// ## Constraints
///
/// - Length: 1-128 characters
/// - Characters: ASCII letters, digits, `_` and `-`
///
/// ## Examples
///
/// ```
/// use serendib_core::SessionId;
///
/// assert!(SessionId::parse("default").is_ok());
/// assert!(SessionId::parse("session_1700000000").is_ok());
///
/// assert!(SessionId::parse("").is_err());
/// assert!(SessionId::parse("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Maximum length of a session id.
    pub const MAX_LENGTH: usize = 128;

    /// Session id used when a chat client does not send one.
    pub const DEFAULT: &'static str = "default";

    /// Parse a `SessionId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 128 characters,
    /// or contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, SessionIdError> {
        if s.is_empty() {
            return Err(SessionIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SessionIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(SessionIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Generate a fresh random session id (UUID v4, hyphenated).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The shared fallback session used by clients that send no id.
    #[must_use]
    pub fn default_session() -> Self {
        Self(Self::DEFAULT.to_owned())
    }

    /// Returns the session id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SessionId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(SessionId::parse("default").is_ok());
        assert!(SessionId::parse("session_1712345678901").is_ok());
        assert!(SessionId::parse("3f2b8c1e-9a4d-4e2f-8b1a-0c9d8e7f6a5b").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SessionId::parse(""), Err(SessionIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(129);
        assert!(matches!(
            SessionId::parse(&long),
            Err(SessionIdError::TooLong { max: 128 })
        ));
        assert!(SessionId::parse(&"a".repeat(128)).is_ok());
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(
            SessionId::parse("../x"),
            Err(SessionIdError::InvalidCharacter('.'))
        );
        assert_eq!(
            SessionId::parse("a b"),
            Err(SessionIdError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_generate_is_valid_and_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert!(SessionId::parse(a.as_str()).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SessionId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(ok.as_str(), "abc-123");
        assert!(serde_json::from_str::<SessionId>("\"a/b\"").is_err());
    }
}
