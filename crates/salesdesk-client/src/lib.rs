//! HTTP client SDK for the SalesDesk accounts and catalog services.
//!
//! Every request passes through one pipeline: the stored bearer token is
//! attached, the request is sent, and a 401 on a resource endpoint is
//! recovered by a single coordinated token refresh before the request is
//! replayed. Requests that fail while a refresh is in flight wait for it
//! instead of starting their own. When the refresh fails the session is
//! cleared and the [`SessionHost`] is sent to the login page.
//!
//! # Example
//!
//! ```no_run
//! use salesdesk_client::{Result, SalesDeskClient};
//!
//! # async fn example() -> Result<()> {
//! let client = SalesDeskClient::builder()
//!     .accounts_url("http://localhost:3001")
//!     .catalog_url("http://localhost:5000")
//!     .build()?;
//!
//! if client.health().is_healthy().await {
//!     println!("Catalog is up");
//! }
//!
//! let session = client.auth().login("admin@example.com", "admin123").await?;
//! println!("Signed in as {} ({})", session.user.name, session.user.role);
//!
//! for product in client.products().list().await? {
//!     println!("{:>4}  {:<30} {:>8.2}  stock {}", product.id, product.name, product.price, product.stock);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Auth**: Login, register, current user, manual refresh, logout
//! - **Users**: List, update, delete
//! - **Sales**: List, create
//! - **Products**: CRUD plus stock decrease
//! - **Health**: Catalog health checks

pub mod api;
pub mod bridge;
pub mod classify;
pub mod client;
pub mod error;
pub mod refresh;
pub mod request;
pub mod store;
pub mod transport;
pub mod types;

pub use bridge::{SessionBridge, SessionHost, TracingHost};
pub use classify::{Classified, ErrorCategory, classify};
pub use client::{ClientBuilder, SalesDeskClient};
pub use error::{Error, Result};
pub use refresh::{RefreshCoordinator, RefreshExchange};
pub use request::{ApiRequest, Backend};
pub use store::{FileStorage, MemoryStorage, Session, SessionStorage, SharedStorage, TokenStore};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::*;
