//! Auth API.

use crate::client::SalesDeskClient;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Backend};
use crate::store::{Session, clean_token};
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Auth API client.
///
/// Every path here is an auth endpoint: a 401 is reported as-is and never
/// triggers a refresh.
pub struct AuthApi {
    client: SalesDeskClient,
}

impl AuthApi {
    pub(crate) fn new(client: SalesDeskClient) -> Self {
        Self { client }
    }

    /// Sign in and store the resulting session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = ApiRequest::post(Backend::Accounts, "/api/auth/login").json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        let response: AuthResponse = self.client.send_json(request).await?;
        if !response.success {
            return Err(Error::AuthEndpoint(
                response
                    .message
                    .unwrap_or_else(|| "Login failed".to_string()),
            ));
        }

        let token = response
            .token
            .as_deref()
            .and_then(clean_token)
            .ok_or_else(|| Error::AuthEndpoint("No token received".to_string()))?;
        let user = response
            .into_user()
            .ok_or_else(|| Error::AuthEndpoint("No user received".to_string()))?;

        let session = Session::new(token, user);
        self.client.tokens().save(&session).await?;
        tracing::info!(user = %session.user.email, role = %session.user.role, "signed in");
        Ok(session)
    }

    /// Create a user account. The current session is left untouched.
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let request = ApiRequest::post(Backend::Accounts, "/api/auth/register").json(&request)?;
        let response: AuthResponse = self.client.send_json(request).await?;
        if !response.success {
            return Err(Error::AuthEndpoint(
                response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }
        response
            .into_user()
            .ok_or_else(|| Error::AuthEndpoint("No user received".to_string()))
    }

    /// Fetch the user the current token belongs to.
    pub async fn me(&self) -> Result<User> {
        let response: AuthResponse = self
            .client
            .send_json(ApiRequest::get(Backend::Accounts, "/api/auth/me"))
            .await?;
        response
            .into_user()
            .ok_or_else(|| Error::AuthEndpoint("No user received".to_string()))
    }

    /// Refresh the token now, through the shared coordinator.
    pub async fn refresh(&self) -> Result<String> {
        self.client.coordinator().recover().await
    }

    /// Forget the local session. No request is sent and no redirect happens.
    pub async fn logout(&self) -> Result<()> {
        self.client.tokens().clear().await?;
        tracing::info!("signed out");
        Ok(())
    }
}
