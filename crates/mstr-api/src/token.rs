//! Authorization token issued by `auth/login`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::error::{Error, Result};

/// Shortest token the server is known to issue.
pub const MIN_TOKEN_LENGTH: usize = 20;

/// The `X-MSTR-AuthToken` value and the instant it was last confirmed valid.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    token: String,
    issued_on: DateTime<Utc>,
}

impl AuthToken {
    /// Wraps a token string, rejecting values shorter than [`MIN_TOKEN_LENGTH`].
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.len() < MIN_TOKEN_LENGTH {
            return Err(Error::InvalidToken {
                length: token.len(),
                min: MIN_TOKEN_LENGTH,
            });
        }
        Ok(Self {
            token,
            issued_on: Utc::now(),
        })
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns when the token was issued or last revalidated.
    pub fn issued_on(&self) -> DateTime<Utc> {
        self.issued_on
    }

    /// Time elapsed since the token was issued or last revalidated.
    pub fn valid_for(&self) -> Duration {
        Utc::now() - self.issued_on
    }

    /// Marks the token as freshly confirmed by the server.
    pub fn validate(&mut self) {
        self.issued_on = Utc::now();
    }

    /// Moves the issue instant into the past.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.issued_on -= by;
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"[REDACTED]")
            .field("issued_on", &self.issued_on)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accepts_long_value() {
        let token = AuthToken::new("ji7ilqelnud37kpjkofgori17r").unwrap();
        assert_eq!(token.as_str(), "ji7ilqelnud37kpjkofgori17r");
        assert!(token.valid_for() < Duration::seconds(5));
    }

    #[test]
    fn test_token_rejects_short_value() {
        let err = AuthToken::new("shorttoken").unwrap_err();
        assert!(matches!(err, Error::InvalidToken { length: 10, min: 20 }));
    }

    #[test]
    fn test_token_boundary_length() {
        assert!(AuthToken::new("a".repeat(19)).is_err());
        assert!(AuthToken::new("a".repeat(20)).is_ok());
    }

    #[test]
    fn test_valid_for_tracks_age_and_validate_resets() {
        let mut token = AuthToken::new("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap();
        token.backdate(Duration::seconds(500));
        assert!(token.valid_for() >= Duration::seconds(500));

        token.validate();
        assert!(token.valid_for() < Duration::seconds(5));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AuthToken::new("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains("FFFFFFFF"));
        assert!(debug.contains("REDACTED"));
    }
}
