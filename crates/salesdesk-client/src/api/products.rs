//! Products API.

use crate::client::SalesDeskClient;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Backend};
use crate::types::{DecreaseStockRequest, Product, ProductInput};

/// Products API client (catalog backend).
pub struct ProductsApi {
    client: SalesDeskClient,
}

impl ProductsApi {
    pub(crate) fn new(client: SalesDeskClient) -> Self {
        Self { client }
    }

    /// List all products.
    pub async fn list(&self) -> Result<Vec<Product>> {
        self.client
            .send_data(ApiRequest::get(Backend::Catalog, "/api/products"))
            .await
    }

    /// Get a product by ID.
    pub async fn get(&self, id: i64) -> Result<Product> {
        self.client
            .send_data(ApiRequest::get(Backend::Catalog, format!("/api/products/{}", id)))
            .await
    }

    /// Create a product.
    pub async fn create(&self, product: ProductInput) -> Result<Product> {
        let request = ApiRequest::post(Backend::Catalog, "/api/products").json(&product)?;
        self.client.send_data(request).await
    }

    /// Replace a product's fields.
    pub async fn update(&self, id: i64, product: ProductInput) -> Result<Product> {
        let request =
            ApiRequest::put(Backend::Catalog, format!("/api/products/{}", id)).json(&product)?;
        self.client.send_data(request).await
    }

    /// Delete a product.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .send_ack(ApiRequest::delete(Backend::Catalog, format!("/api/products/{}", id)))
            .await?;
        Ok(())
    }

    /// Take `quantity` units out of stock. Returns the updated product.
    pub async fn decrease_stock(&self, id: i64, quantity: u32) -> Result<Product> {
        if quantity == 0 {
            return Err(Error::InvalidInput(
                "quantity must be greater than zero".to_string(),
            ));
        }
        let request = ApiRequest::patch(Backend::Catalog, format!("/api/products/{}/decrease-stock", id))
            .json(&DecreaseStockRequest { quantity })?;
        self.client.send_data(request).await
    }
}
