//! Error types for the MicroStrategy REST client.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Server error code returned when the session behind a token has expired.
pub const SESSION_EXPIRED_CODE: &str = "ERR009";

/// Errors reported by the server for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication or authorization failure (401/403).
    Auth {
        code: Option<String>,
        message: String,
    },
    /// Any other non-2xx response.
    Http {
        status: u16,
        code: Option<String>,
        message: String,
        iserver_code: Option<i64>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth { code, message } => match code {
                Some(code) => write!(f, "Auth error [{}]: {}", code, message),
                None => write!(f, "Auth error: {}", message),
            },
            ApiError::Http {
                status,
                code,
                message,
                iserver_code,
            } => {
                write!(f, "HTTP error {}", status)?;
                if let Some(code) = code {
                    write!(f, " [{}]", code)?;
                }
                write!(f, ": {}", message)?;
                if let Some(iserver) = iserver_code {
                    write!(f, " (iServer code {})", iserver)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Error payload the server attaches to failed requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub i_server_code: Option<i64>,
}

impl ApiError {
    /// Builds an error from a status code and the raw response body.
    ///
    /// The body is decoded as the server's `{code, message, iServerCode}`
    /// payload when possible; otherwise the raw text becomes the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            401 | 403 => ApiError::Auth {
                code: parsed.code,
                message,
            },
            _ => ApiError::Http {
                status,
                code: parsed.code,
                message,
                iserver_code: parsed.i_server_code,
            },
        }
    }

    /// Returns the server error code, if one was supplied.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Auth { code, .. } | ApiError::Http { code, .. } => code.as_deref(),
        }
    }

    /// Returns true if the server reported an expired session.
    pub fn is_session_expired(&self) -> bool {
        self.code() == Some(SESSION_EXPIRED_CODE)
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Auth { .. } => 4,
            ApiError::Http { .. } => 2,
        }
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        401 | 403 => "Authentication failed",
        404 => "Not found",
        _ => "Unknown error",
    }
}

/// Errors that can occur when talking to the server.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Transport failure (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Login did not produce a usable token.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// A token was rejected before use.
    #[error("invalid token: expected at least {min} characters, got {length}")]
    InvalidToken { length: usize, min: usize },

    /// An operation required an open, valid session.
    #[error("session is not open or has expired")]
    InvalidSession,

    /// A response body was missing keys the client requires.
    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },
}

impl Error {
    /// Creates a decode error for the named payload.
    pub fn decode(what: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            what,
            message: message.into(),
        }
    }

    /// Returns true for authentication failures, local or remote.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Error::Auth { .. } | Error::InvalidToken { .. } | Error::Api(ApiError::Auth { .. })
        )
    }
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
