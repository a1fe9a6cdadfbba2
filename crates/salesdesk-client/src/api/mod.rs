//! API endpoint implementations.

mod auth;
mod health;
mod products;
mod sales;
mod users;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use products::ProductsApi;
pub use sales::SalesApi;
pub use users::UsersApi;
