//! Token refresh coordination.
//!
//! A [`RefreshCoordinator`] is shared by every backend client of a session.
//! The first request to see a 401 becomes the leader and runs the refresh
//! exchange; requests that fail while it is in flight are queued and released
//! in arrival order once the new token is stored. A failed refresh rejects
//! the whole queue and terminates the session exactly once. A 401 that lands
//! after the refresh settled reuses the replacement token, or fails without
//! terminating the session a second time.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use url::Url;

use crate::bridge::SessionBridge;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Backend, attach_bearer};
use crate::store::{TokenStore, clean_token};
use crate::transport::Transport;
use crate::types::AuthResponse;

/// Path of the refresh endpoint on the accounts backend.
pub const REFRESH_PATH: &str = "/api/auth/refresh-token";

/// Outcome delivered to a queued request: the new token, or the reason the
/// refresh failed.
type Settlement = std::result::Result<String, String>;

// ============================================================================
// RefreshExchange
// ============================================================================

/// Trades the current token for a new one.
#[async_trait]
pub trait RefreshExchange: Send + Sync + std::fmt::Debug {
    async fn exchange(&self, current: &str) -> Result<String>;
}

/// Refresh over HTTP: `POST /api/auth/refresh-token` with the current token
/// as bearer. The new token is read from the `token` field.
#[derive(Debug)]
pub struct HttpRefreshExchange {
    transport: Arc<dyn Transport>,
    url: Url,
}

impl HttpRefreshExchange {
    pub fn new(transport: Arc<dyn Transport>, accounts_url: &Url) -> Result<Self> {
        let url = accounts_url.join(REFRESH_PATH.trim_start_matches('/'))?;
        Ok(Self { transport, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RefreshExchange for HttpRefreshExchange {
    async fn exchange(&self, current: &str) -> Result<String> {
        let request = ApiRequest::post(Backend::Accounts, REFRESH_PATH).json(&serde_json::json!({}))?;
        let request = attach_bearer(request, Some(current));

        let response = self.transport.send(self.url.clone(), &request).await?;
        if !response.is_success() {
            return Err(Error::from_response(response.status, &response.body, true));
        }

        let body: AuthResponse = response.json()?;
        if !body.success {
            return Err(Error::AuthEndpoint(
                body.message.unwrap_or_else(|| "refresh rejected".to_string()),
            ));
        }

        body.token
            .as_deref()
            .and_then(clean_token)
            .ok_or_else(|| Error::AuthEndpoint("No token received".to_string()))
    }
}

// ============================================================================
// RefreshCoordinator
// ============================================================================

enum RefreshState {
    Idle,
    Refreshing { waiters: VecDeque<oneshot::Sender<Settlement>> },
}

struct Flight {
    state: RefreshState,
    /// Token whose failed refresh ended the session.
    ended: Option<String>,
}

enum Turn {
    Leader,
    Queued(oneshot::Receiver<Settlement>),
    Ended,
}

/// Single-flight refresh with a FIFO queue of waiting requests.
pub struct RefreshCoordinator {
    flight: Mutex<Flight>,
    exchange: Arc<dyn RefreshExchange>,
    tokens: TokenStore,
    bridge: SessionBridge,
    exchanges: AtomicU64,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("pending", &self.pending())
            .field("exchanges", &self.exchanges())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new(exchange: Arc<dyn RefreshExchange>, tokens: TokenStore, bridge: SessionBridge) -> Self {
        Self {
            flight: Mutex::new(Flight {
                state: RefreshState::Idle,
                ended: None,
            }),
            exchange,
            tokens,
            bridge,
            exchanges: AtomicU64::new(0),
        }
    }

    /// Whether a refresh exchange is in flight.
    pub fn is_refreshing(&self) -> bool {
        matches!(self.flight.lock().state, RefreshState::Refreshing { .. })
    }

    /// Number of requests queued behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        match &self.flight.lock().state {
            RefreshState::Refreshing { waiters } => waiters.len(),
            RefreshState::Idle => 0,
        }
    }

    /// Number of refresh exchanges started since creation.
    pub fn exchanges(&self) -> u64 {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn bridge(&self) -> &SessionBridge {
        &self.bridge
    }

    /// Refresh the stored token, leading a refresh or joining the one in flight.
    pub async fn recover(&self) -> Result<String> {
        let current = self.current_token().await;
        self.recover_from(current.as_deref()).await
    }

    /// Obtain a usable token for a request that was rejected while carrying
    /// `presented`.
    ///
    /// If the stored token no longer matches `presented` it is returned
    /// without an exchange. If `presented` already failed to refresh, the
    /// call fails without terminating the session again. Otherwise returns
    /// once the new token is stored. On failure every caller gets
    /// [`Error::RefreshExhausted`] and the session is terminated once, by the
    /// leader.
    pub async fn recover_from(&self, presented: Option<&str>) -> Result<String> {
        match self.enter(presented) {
            Turn::Ended => {
                tracing::debug!("token already failed to refresh, session is over");
                Err(Error::RefreshExhausted("session already expired".to_string()))
            }
            Turn::Queued(rx) => {
                tracing::debug!("refresh in flight, request queued");
                match rx.await {
                    Ok(Ok(token)) => Ok(token),
                    Ok(Err(reason)) => Err(Error::RefreshExhausted(reason)),
                    Err(_) => Err(Error::RefreshExhausted("refresh was abandoned".to_string())),
                }
            }
            Turn::Leader => {
                let guard = LeaderGuard {
                    coordinator: self,
                    settled: false,
                };

                let current = self.current_token().await;
                if let Some(token) = current.as_deref()
                    && presented != Some(token)
                {
                    tracing::debug!("token was replaced since the request was sent");
                    guard.settle(Ok(token.to_string()), None);
                    return Ok(token.to_string());
                }

                let outcome = self.run_exchange(current.as_deref()).await;
                match outcome {
                    Ok(token) => {
                        guard.settle(Ok(token.clone()), None);
                        tracing::info!("session token refreshed");
                        Ok(token)
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        tracing::warn!(error = %reason, "token refresh failed");
                        guard.settle(Err(reason.clone()), current);
                        self.bridge.terminate().await;
                        Err(Error::RefreshExhausted(reason))
                    }
                }
            }
        }
    }

    fn enter(&self, presented: Option<&str>) -> Turn {
        let mut flight = self.flight.lock();
        if presented.is_some() && flight.ended.as_deref() == presented {
            return Turn::Ended;
        }
        if let RefreshState::Refreshing { waiters } = &mut flight.state {
            let (tx, rx) = oneshot::channel();
            waiters.push_back(tx);
            return Turn::Queued(rx);
        }
        flight.state = RefreshState::Refreshing {
            waiters: VecDeque::new(),
        };
        Turn::Leader
    }

    async fn current_token(&self) -> Option<String> {
        match self.tokens.token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read current token");
                None
            }
        }
    }

    async fn run_exchange(&self, current: Option<&str>) -> Result<String> {
        let Some(current) = current else {
            return Err(Error::AuthEndpoint("no token to refresh".to_string()));
        };

        self.exchanges.fetch_add(1, Ordering::SeqCst);
        let token = self.exchange.exchange(current).await?;
        self.tokens.replace_token(&token).await?;
        Ok(token)
    }

    /// Return to idle and deliver `outcome` to every queued request, oldest
    /// first. `ended` records the token whose refresh just failed.
    fn release(&self, outcome: Settlement, ended: Option<String>) {
        let previous = {
            let mut flight = self.flight.lock();
            if ended.is_some() {
                flight.ended = ended;
            }
            std::mem::replace(&mut flight.state, RefreshState::Idle)
        };
        let RefreshState::Refreshing { waiters } = previous else {
            return;
        };

        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver means its caller went away; nothing to do.
            let _ = waiter.send(outcome.clone());
        }
        if count > 0 {
            tracing::debug!(count, ok = outcome.is_ok(), "released queued requests");
        }
    }
}

/// Settles the coordinator if the leading future is dropped mid-refresh.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    fn settle(mut self, outcome: Settlement, ended: Option<String>) {
        self.settled = true;
        self.coordinator.release(outcome, ended);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("refresh abandoned by its caller");
            self.coordinator
                .release(Err("refresh was abandoned".to_string()), None);
        }
    }
}
