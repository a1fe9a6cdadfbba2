//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{AuthApi, HealthApi, ProductsApi, SalesApi, UsersApi};
use crate::bridge::{DEFAULT_LOGIN_PATH, SessionBridge, SessionHost, TracingHost};
use crate::error::{Error, Result};
use crate::refresh::{HttpRefreshExchange, RefreshCoordinator, RefreshExchange};
use crate::request::{ApiRequest, Backend, attach_bearer};
use crate::store::{MemoryStorage, SharedStorage, TokenStore};
use crate::transport::{HttpTransport, RawResponse, Transport};
use crate::types::Envelope;

/// Default timeout for requests, including the refresh exchange.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// SalesDesk API client.
///
/// One client covers both backends and owns the session shared between
/// them: a single token store and a single refresh coordinator.
///
/// # Example
///
/// ```no_run
/// use salesdesk_client::SalesDeskClient;
///
/// # async fn example() -> salesdesk_client::Result<()> {
/// let client = SalesDeskClient::builder()
///     .accounts_url("http://localhost:3001")
///     .catalog_url("http://localhost:5000")
///     .build()?;
///
/// client.auth().login("admin@example.com", "admin123").await?;
/// let products = client.products().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SalesDeskClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    accounts_url: Url,
    catalog_url: Url,
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    coordinator: RefreshCoordinator,
}

impl std::fmt::Debug for SalesDeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesDeskClient")
            .field("accounts_url", &self.inner.accounts_url.as_str())
            .field("catalog_url", &self.inner.catalog_url.as_str())
            .field("coordinator", &self.inner.coordinator)
            .finish()
    }
}

impl SalesDeskClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL of a backend.
    pub fn base_url(&self, backend: Backend) -> &Url {
        match backend {
            Backend::Accounts => &self.inner.accounts_url,
            Backend::Catalog => &self.inner.catalog_url,
        }
    }

    /// The session's token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// The session's refresh coordinator.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the sales API.
    pub fn sales(&self) -> SalesApi {
        SalesApi::new(self.clone())
    }

    /// Access the products API.
    pub fn products(&self) -> ProductsApi {
        ProductsApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the absolute URL for a request.
    pub(crate) fn url(&self, request: &ApiRequest) -> Result<Url> {
        self.base_url(request.backend)
            .join(request.path.trim_start_matches('/'))
            .map_err(Error::from)
    }

    /// Attach the current token and send. Only transport failures are errors.
    ///
    /// Returns the response with the token that was presented.
    async fn dispatch(&self, request: &ApiRequest) -> Result<(RawResponse, Option<String>)> {
        let token = match self.inner.tokens.token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read token, sending without one");
                None
            }
        };

        let request = attach_bearer(request.clone(), token.as_deref());
        let url = self.url(&request)?;
        tracing::debug!(method = %request.method, %url, retried = request.is_retried(), "sending request");
        let response = self.inner.transport.send(url, &request).await?;
        Ok((response, token))
    }

    /// Run a request through the full pipeline.
    ///
    /// A 401 on a resource endpoint is recovered once through the refresh
    /// coordinator and the request is replayed with the new token. Any other
    /// non-success response becomes a classified [`Error`].
    pub async fn execute(&self, mut request: ApiRequest) -> Result<RawResponse> {
        let (response, presented) = self.dispatch(&request).await?;

        if response.status != 401 || request.is_auth_endpoint() || request.is_retried() {
            return Self::check(response, &request);
        }

        request.mark_retried();
        self.inner
            .coordinator
            .recover_from(presented.as_deref())
            .await?;

        tracing::debug!(path = %request.path, "replaying request after refresh");
        let (response, _) = self.dispatch(&request).await?;
        Self::check(response, &request)
    }

    fn check(response: RawResponse, request: &ApiRequest) -> Result<RawResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::from_response(
                response.status,
                &response.body,
                request.is_auth_endpoint(),
            ))
        }
    }

    /// Execute and decode the whole body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// Execute and unwrap the envelope's `data`.
    pub(crate) async fn send_data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        let status = response.status;
        let envelope: Envelope<T> = response.json()?;

        if !envelope.success {
            return Err(Error::Api {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        envelope.data.ok_or_else(|| Error::Api {
            status,
            message: "response carried no data".to_string(),
        })
    }

    /// Execute a request whose envelope carries no payload.
    pub(crate) async fn send_ack(&self, request: ApiRequest) -> Result<Option<String>> {
        let response = self.execute(request).await?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        let status = response.status;
        let envelope: Envelope<serde_json::Value> = response.json()?;
        if !envelope.success {
            return Err(Error::Api {
                status,
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        Ok(envelope.message)
    }
}

/// Builder for creating a SalesDeskClient.
#[derive(Debug)]
pub struct ClientBuilder {
    accounts_url: Option<String>,
    catalog_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    login_path: String,
    storage: Option<SharedStorage>,
    host: Option<Arc<dyn SessionHost>>,
    transport: Option<Arc<dyn Transport>>,
    exchange: Option<Arc<dyn RefreshExchange>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            accounts_url: None,
            catalog_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            storage: None,
            host: None,
            transport: None,
            exchange: None,
        }
    }

    /// Set the accounts backend URL (auth, users, sales).
    pub fn accounts_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_url = Some(url.into());
        self
    }

    /// Set the catalog backend URL (products). Defaults to the accounts URL.
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the login entry point used after a session expires.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set the session storage. Defaults to in-memory.
    pub fn storage(mut self, storage: SharedStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the host that receives session-expired notifications.
    pub fn session_host(mut self, host: Arc<dyn SessionHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the refresh exchange.
    pub fn refresh_exchange(mut self, exchange: Arc<dyn RefreshExchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SalesDeskClient> {
        let accounts = self
            .accounts_url
            .ok_or_else(|| Error::Config("accounts_url is required".to_string()))?;
        let catalog = self.catalog_url.unwrap_or_else(|| accounts.clone());

        let accounts_url = normalize_base(&accounts)?;
        let catalog_url = normalize_base(&catalog)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let user_agent = self
                    .user_agent
                    .unwrap_or_else(|| format!("salesdesk-client/{}", env!("CARGO_PKG_VERSION")));
                Arc::new(HttpTransport::new(&user_agent, self.timeout)?)
            }
        };

        let exchange: Arc<dyn RefreshExchange> = match self.exchange {
            Some(exchange) => exchange,
            None => Arc::new(HttpRefreshExchange::new(transport.clone(), &accounts_url)?),
        };

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let tokens = TokenStore::new(storage);
        let host = self.host.unwrap_or_else(|| Arc::new(TracingHost));
        let bridge = SessionBridge::new(tokens.clone(), host, self.login_path);
        let coordinator = RefreshCoordinator::new(exchange, tokens.clone(), bridge);

        Ok(SalesDeskClient {
            inner: Arc::new(ClientInner {
                accounts_url,
                catalog_url,
                transport,
                tokens,
                coordinator,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a base URL and make sure it ends with `/` so joins keep its path.
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
