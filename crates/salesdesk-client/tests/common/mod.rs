//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::MockServer;

use salesdesk_client::{Role, SalesDeskClient, Session, SessionHost, User};

/// Host that records notifications and redirects.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub notes: Mutex<Vec<String>>,
    pub redirects: Mutex<Vec<String>>,
}

impl SessionHost for RecordingHost {
    fn notify(&self, message: &str) {
        self.notes.lock().push(message.to_string());
    }

    fn redirect(&self, location: &str) {
        self.redirects.lock().push(location.to_string());
    }
}

/// A mock server standing in for both backends, plus a client wired to it.
pub struct TestBackend {
    pub server: MockServer,
    pub host: Arc<RecordingHost>,
    pub client: SalesDeskClient,
}

impl TestBackend {
    /// Start a mock server with no stored session.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let host = Arc::new(RecordingHost::default());
        let client = SalesDeskClient::builder()
            .accounts_url(server.uri())
            .catalog_url(server.uri())
            .session_host(host.clone())
            .build()
            .unwrap();

        Self {
            server,
            host,
            client,
        }
    }

    /// Start a mock server with `token` already stored.
    pub async fn with_session(token: &str) -> Self {
        let backend = Self::start().await;
        backend
            .client
            .tokens()
            .save(&Session::new(token, admin()))
            .await
            .unwrap();
        backend
    }

    pub fn redirects(&self) -> Vec<String> {
        self.host.redirects.lock().clone()
    }

    pub fn notes(&self) -> Vec<String> {
        self.host.notes.lock().clone()
    }
}

pub fn admin() -> User {
    User {
        id: "64f0c0ffee".to_string(),
        name: "Admin".to_string(),
        email: "admin@example.com".to_string(),
        role: Role::Administrador,
        created_at: None,
        updated_at: None,
    }
}

pub fn admin_json() -> Value {
    json!({
        "_id": "64f0c0ffee",
        "name": "Admin",
        "email": "admin@example.com",
        "role": "administrador"
    })
}

pub fn product_json(id: i64, stock: i64) -> Value {
    json!({
        "id": id,
        "name": "Laptop",
        "price": 1299.99,
        "stock": stock,
        "description": "14 inch",
        "category": "Electronics",
        "image_url": ""
    })
}

/// `{"success": true, "data": ...}`
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Body of a successful refresh.
pub fn refreshed(token: &str) -> Value {
    json!({ "success": true, "token": token })
}
