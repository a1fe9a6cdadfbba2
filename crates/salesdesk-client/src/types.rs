//! Request and response types for the SalesDesk backends.
//!
//! These types mirror the JSON the accounts and catalog services send.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Response envelope shared by both backends.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded. Absent on some plain endpoints.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    pub data: Option<T>,
    /// Item count for list responses.
    #[serde(default)]
    pub count: Option<usize>,
}

fn default_success() -> bool {
    true
}

/// Response from login, register and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Bearer token, present on login and refresh.
    #[serde(default)]
    pub token: Option<String>,
    /// Authenticated user, present on login.
    #[serde(default)]
    pub user: Option<User>,
    /// Some endpoints return the user under `data` instead.
    #[serde(default)]
    pub data: Option<User>,
}

impl AuthResponse {
    /// The user record, wherever the server put it.
    pub fn into_user(self) -> Option<User> {
        self.user.or(self.data)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users and roles
// ─────────────────────────────────────────────────────────────────────────────

/// Application role.
///
/// Role strings are normalized on the way in: `ADMINISTRADOR`,
/// `administrador` and `Administrador` are the same role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Administrador,
    Vendedor,
    Consultor,
    /// A role this client does not know about, normalized.
    Other(String),
}

impl Role {
    /// Normalize a role string: lowercase, then capitalize the first letter.
    pub fn normalize(raw: &str) -> String {
        let lower = raw.trim().to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Administrador => "Administrador",
            Role::Vendedor => "Vendedor",
            Role::Consultor => "Consultor",
            Role::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match Self::normalize(&raw).as_str() {
            "Administrador" => Role::Administrador,
            "Vendedor" => Role::Vendedor,
            "Consultor" => Role::Consultor,
            other => Role::Other(other.to_string()),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (`_id` in list responses).
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to register (create) a user.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Request to update a user. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Product fields for create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub description: String,
    pub category: String,
    pub image_url: String,
}

/// Body of a decrease-stock request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DecreaseStockRequest {
    pub quantity: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sales
// ─────────────────────────────────────────────────────────────────────────────

/// Sale lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// A line item of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProduct {
    pub product_id: i64,
    pub quantity: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub products: Vec<SaleProduct>,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: SaleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request to record a sale.
#[derive(Debug, Clone, Serialize)]
pub struct NewSale {
    /// Seller. Filled from the current session when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub products: Vec<SaleProduct>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SaleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewSale {
    /// Build a sale whose total is the sum of its line items.
    pub fn from_items(products: Vec<SaleProduct>) -> Self {
        let total = products.iter().map(|p| p.price * p.quantity as f64).sum();
        Self {
            user_id: None,
            products,
            total,
            status: None,
            client: None,
            notes: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Health
// ─────────────────────────────────────────────────────────────────────────────

/// Catalog health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_normalization() {
        assert_eq!(Role::from("ADMINISTRADOR"), Role::Administrador);
        assert_eq!(Role::from("vendedor"), Role::Vendedor);
        assert_eq!(Role::from(" Consultor "), Role::Consultor);
        assert_eq!(Role::from("auditor"), Role::Other("Auditor".to_string()));
        assert_eq!(Role::normalize(""), "");
    }

    #[test]
    fn test_user_accepts_object_id() {
        let json = r#"{"_id":"64f0","name":"Ana","email":"ana@consultoria.com","role":"consultor","createdAt":"2024-01-01"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "64f0");
        assert_eq!(user.role, Role::Consultor);
        assert_eq!(user.created_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn test_envelope_defaults() {
        let env: Envelope<Vec<Product>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.data.unwrap().len(), 0);

        let env: Envelope<Product> =
            serde_json::from_str(r#"{"success":false,"message":"Producto no encontrado"}"#)
                .unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
    }

    #[test]
    fn test_envelope_decodes_for_any_payload() {
        fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Envelope<T> {
            serde_json::from_str(json).unwrap()
        }

        let env: Envelope<User> = parse(r#"{"success":true}"#);
        assert!(env.data.is_none());

        let env: Envelope<Sale> = parse(r#"{"success":true,"count":0}"#);
        assert_eq!(env.count, Some(0));
        assert!(env.data.is_none());
    }

    #[test]
    fn test_sale_parsing() {
        let json = r#"{
            "_id": "s1",
            "user_id": "u1",
            "products": [{"productId": 3, "quantity": 2, "price": 9.5}],
            "total": 19.0,
            "createdAt": "2024-05-01T10:00:00Z",
            "status": "completed"
        }"#;
        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.id, "s1");
        assert_eq!(sale.products[0].product_id, 3);
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_new_sale_total() {
        let sale = NewSale::from_items(vec![
            SaleProduct {
                product_id: 1,
                quantity: 2,
                price: 10.0,
                name: None,
            },
            SaleProduct {
                product_id: 2,
                quantity: 1,
                price: 5.5,
                name: None,
            },
        ]);
        assert_eq!(sale.total, 25.5);
    }
}
