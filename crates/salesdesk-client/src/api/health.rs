//! Health API.

use crate::client::SalesDeskClient;
use crate::error::Result;
use crate::request::{ApiRequest, Backend};
use crate::types::HealthResponse;

/// Health API client.
///
/// The catalog's health endpoint does not require authentication.
pub struct HealthApi {
    client: SalesDeskClient,
}

impl HealthApi {
    pub(crate) fn new(client: SalesDeskClient) -> Self {
        Self { client }
    }

    /// Check catalog health.
    pub async fn check(&self) -> Result<HealthResponse> {
        self.client
            .send_json(ApiRequest::get(Backend::Catalog, "/health"))
            .await
    }

    /// Simple connectivity check - returns true if the catalog answers `OK`.
    pub async fn is_healthy(&self) -> bool {
        matches!(self.check().await, Ok(health) if health.status.eq_ignore_ascii_case("ok"))
    }
}
