//! Users API.

use crate::client::SalesDeskClient;
use crate::error::Result;
use crate::request::{ApiRequest, Backend};
use crate::types::{UpdateUserRequest, User};

/// Users API client.
pub struct UsersApi {
    client: SalesDeskClient,
}

impl UsersApi {
    pub(crate) fn new(client: SalesDeskClient) -> Self {
        Self { client }
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.client
            .send_data(ApiRequest::get(Backend::Accounts, "/api/users"))
            .await
    }

    /// Update a user.
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User> {
        let request = ApiRequest::put(Backend::Accounts, format!("/api/users/{}", id)).json(&request)?;
        self.client.send_data(request).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .send_ack(ApiRequest::delete(Backend::Accounts, format!("/api/users/{}", id)))
            .await?;
        Ok(())
    }
}
