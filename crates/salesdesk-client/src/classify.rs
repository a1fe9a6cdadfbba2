//! Mapping of failed calls to user-facing categories.
//!
//! [`classify`] is pure and total: every [`Error`] maps to exactly one
//! [`ErrorCategory`] with a message suitable for display.

use serde::Serialize;

use crate::error::Error;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";
pub const BAD_REQUEST_MESSAGE: &str = "Invalid request.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const NETWORK_ERROR_MESSAGE: &str = "Connection error.";

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    SessionExpired,
    Forbidden,
    BadRequest,
    ServerError,
    NetworkError,
    Unknown,
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classified {
    pub category: ErrorCategory,
    pub message: String,
}

impl Classified {
    fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Classify a failed call.
pub fn classify(error: &Error) -> Classified {
    match error {
        Error::AuthExpired(_) | Error::RefreshExhausted(_) => {
            Classified::new(ErrorCategory::SessionExpired, SESSION_EXPIRED_MESSAGE)
        }
        // Login and register report their own reason (bad credentials).
        Error::AuthEndpoint(message) if !message.is_empty() => {
            Classified::new(ErrorCategory::SessionExpired, message.as_str())
        }
        Error::AuthEndpoint(_) => {
            Classified::new(ErrorCategory::SessionExpired, SESSION_EXPIRED_MESSAGE)
        }
        Error::Forbidden { .. } => Classified::new(ErrorCategory::Forbidden, FORBIDDEN_MESSAGE),
        Error::BadRequest { message, errors } => {
            let text = if !errors.is_empty() {
                errors.join(", ")
            } else {
                message
                    .clone()
                    .unwrap_or_else(|| BAD_REQUEST_MESSAGE.to_string())
            };
            Classified::new(ErrorCategory::BadRequest, text)
        }
        Error::Server { .. } => Classified::new(ErrorCategory::ServerError, SERVER_ERROR_MESSAGE),
        Error::Transport(message) if !message.is_empty() => {
            Classified::new(ErrorCategory::NetworkError, message.as_str())
        }
        Error::Transport(_) => Classified::new(ErrorCategory::NetworkError, NETWORK_ERROR_MESSAGE),
        Error::NotFound(message) | Error::Api { message, .. } => {
            Classified::new(ErrorCategory::Unknown, message.as_str())
        }
        other => Classified::new(ErrorCategory::Unknown, other.to_string()),
    }
}

impl Error {
    /// Classify this error for display.
    pub fn classify(&self) -> Classified {
        classify(self)
    }
}
