//! Sales API.

use crate::client::SalesDeskClient;
use crate::error::Result;
use crate::request::{ApiRequest, Backend};
use crate::types::{NewSale, Sale};

/// Sales API client.
pub struct SalesApi {
    client: SalesDeskClient,
}

impl SalesApi {
    pub(crate) fn new(client: SalesDeskClient) -> Self {
        Self { client }
    }

    /// List all sales.
    pub async fn list(&self) -> Result<Vec<Sale>> {
        self.client
            .send_data(ApiRequest::get(Backend::Accounts, "/api/sales"))
            .await
    }

    /// Record a sale. Without an explicit seller, the signed-in user is used.
    pub async fn create(&self, mut sale: NewSale) -> Result<Sale> {
        if sale.user_id.is_none() {
            sale.user_id = self.client.tokens().user().await?.map(|user| user.id);
        }
        let request = ApiRequest::post(Backend::Accounts, "/api/sales").json(&sale)?;
        self.client.send_data(request).await
    }
}
