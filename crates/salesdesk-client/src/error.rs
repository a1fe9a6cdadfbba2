//! Client error types.

use serde::Deserialize;
use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS failure, timeout, connection refused).
    #[error("Transport error: {0}")]
    Transport(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A resource endpoint rejected the bearer token and the session could
    /// not be recovered by replaying the request.
    #[error("Session expired: {0}")]
    AuthExpired(String),

    /// An auth endpoint (login, register, refresh) returned 401.
    #[error("Authentication failed: {0}")]
    AuthEndpoint(String),

    /// The refresh exchange failed; the session has been terminated.
    #[error("Session refresh failed: {0}")]
    RefreshExhausted(String),

    /// Authenticated but not permitted (403).
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Machine-readable code from the server, e.g. `TOKEN_EXPIRED`.
        code: Option<String>,
        /// Error message from server.
        message: String,
    },

    /// The server rejected the request payload (400).
    #[error("Bad request: {}", summarize(.message, .errors))]
    BadRequest {
        /// Top-level message from server.
        message: Option<String>,
        /// Field-level errors, flattened.
        errors: Vec<String>,
    },

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server failed (5xx).
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// Session storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl Error {
    /// Build an error from a non-success response.
    ///
    /// `auth_endpoint` selects between [`Error::AuthEndpoint`] and
    /// [`Error::AuthExpired`] for 401 responses.
    pub fn from_response(status: u16, body: &str, auth_endpoint: bool) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        let message = parsed
            .message
            .clone()
            .or_else(|| parsed.error.clone())
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            400 => Error::BadRequest {
                message: parsed.message,
                errors: parsed.errors.as_ref().map(flatten_errors).unwrap_or_default(),
            },
            401 if auth_endpoint => Error::AuthEndpoint(message),
            401 => Error::AuthExpired(message),
            403 => Error::Forbidden {
                code: parsed.code,
                message,
            },
            404 => Error::NotFound(message),
            s if s >= 500 => Error::Server { status, message },
            _ => Error::Api { status, message },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthExpired(_) | Error::AuthEndpoint(_) => Some(401),
            Error::Forbidden { .. } => Some(403),
            Error::BadRequest { .. } => Some(400),
            Error::NotFound(_) => Some(404),
            Error::Server { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::AuthExpired(_) | Error::AuthEndpoint(_) | Error::RefreshExhausted(_)
        )
    }

    /// Check if the session was terminated because refresh failed.
    pub fn is_session_terminated(&self) -> bool {
        matches!(self, Error::RefreshExhausted(_))
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body as sent by both backends.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

/// Flatten an `errors` payload into display strings.
///
/// Accepts a list (`["a", "b"]`, or objects carrying `msg`/`message`) and
/// field maps (`{"name": ["too short"]}` becomes `name: too short`).
pub(crate) fn flatten_errors(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map
                .get("msg")
                .or_else(|| map.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    match value {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        Value::Object(fields) => fields
            .iter()
            .flat_map(|(field, messages)| {
                let messages: Vec<String> = match messages {
                    Value::Array(items) => items.iter().filter_map(text).collect(),
                    other => text(other).into_iter().collect(),
                };
                messages
                    .into_iter()
                    .map(move |m| format!("{}: {}", field, m))
            })
            .collect(),
        other => text(other).into_iter().collect(),
    }
}

fn summarize(message: &Option<String>, errors: &[String]) -> String {
    if !errors.is_empty() {
        errors.join(", ")
    } else {
        message.clone().unwrap_or_else(|| "invalid request".to_string())
    }
}
