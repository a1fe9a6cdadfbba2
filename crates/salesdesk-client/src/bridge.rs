//! Session termination.
//!
//! When a refresh fails the session is over. [`SessionBridge`] clears the
//! stored credentials and hands control to the host through [`SessionHost`]:
//! one notification, then a redirect to the login entry point flagged with
//! `session_expired=1`.

use std::sync::Arc;

use crate::classify::SESSION_EXPIRED_MESSAGE;
use crate::store::TokenStore;

/// Default login entry point.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Query flag appended to the login location after a session expires.
pub const SESSION_EXPIRED_FLAG: &str = "session_expired=1";

/// Navigation and notification surface supplied by the embedding UI.
pub trait SessionHost: Send + Sync + std::fmt::Debug {
    /// Show a transient error message.
    fn notify(&self, message: &str);

    /// Transfer control to `location`.
    fn redirect(&self, location: &str);
}

/// Host that only logs. Used when the embedding application supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHost;

impl SessionHost for TracingHost {
    fn notify(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn redirect(&self, location: &str) {
        tracing::info!(location, "session ended, login required");
    }
}

/// Terminates sessions on unrecoverable auth failure.
#[derive(Debug, Clone)]
pub struct SessionBridge {
    tokens: TokenStore,
    host: Arc<dyn SessionHost>,
    login_path: String,
}

impl SessionBridge {
    pub fn new(tokens: TokenStore, host: Arc<dyn SessionHost>, login_path: impl Into<String>) -> Self {
        Self {
            tokens,
            host,
            login_path: login_path.into(),
        }
    }

    /// Where the host is sent after termination.
    pub fn login_location(&self) -> String {
        let separator = if self.login_path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.login_path, separator, SESSION_EXPIRED_FLAG)
    }

    /// Clear the session, notify, redirect.
    ///
    /// Without a stored session nothing is cleared or shown; the redirect
    /// still happens.
    pub async fn terminate(&self) {
        let had_session = self.tokens.has_token().await;

        if had_session {
            if let Err(e) = self.tokens.clear().await {
                tracing::error!(error = %e, "failed to clear session");
            }
            self.host.notify(SESSION_EXPIRED_MESSAGE);
        }

        tracing::warn!(had_session, "session terminated");
        self.host.redirect(&self.login_location());
    }
}
