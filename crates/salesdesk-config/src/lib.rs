//! Configuration for SalesDesk clients.
//!
//! Client configuration is kubeconfig-style YAML:
//! - Named contexts, each pointing at an accounts and a catalog backend
//! - `current-context` for default selection
//! - Defaults for request timeout and login path
//!
//! Sessions and logs live next to the config file, one session file per
//! context.

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    ClientConfig, ClientDefaults, Context, ResolvedContext, client_config_path,
    load_client_config, load_client_config_from, save_client_config, save_client_config_to,
};
pub use discovery::{logs_dir, session_path, xdg_config_dir};
pub use error::{ConfigError, Result};
