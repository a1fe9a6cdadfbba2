//! Client construction for CLI commands.
//!
//! Resolves the selected context, opens its session file, and wires a
//! terminal [`SessionHost`] so an expired session is reported on stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use console::Style;
use salesdesk_client::{FileStorage, SalesDeskClient, SessionHost};
use salesdesk_config::ResolvedContext;

/// Session host for a terminal: messages go to stderr, and a redirect to
/// the login page becomes a hint to run `salesdesk login`.
#[derive(Debug, Default)]
pub struct TerminalHost;

impl SessionHost for TerminalHost {
    fn notify(&self, message: &str) {
        let yellow = Style::new().yellow();
        eprintln!("{} {}", yellow.apply_to("!"), message);
    }

    fn redirect(&self, location: &str) {
        let dim = Style::new().dim();
        eprintln!("  Run 'salesdesk login' to sign in again.");
        tracing::debug!(location, "login required");
        eprintln!("  {}", dim.apply_to(location));
    }
}

/// Build a client for `context` (or the current context).
pub fn connect(context: Option<&str>) -> Result<SalesDeskClient> {
    let config = salesdesk_config::load_client_config()?;
    let resolved = config.resolve(context)?;
    build_client(&resolved)
}

/// Where the session for `resolved` is stored.
pub fn session_file(resolved: &ResolvedContext) -> Result<PathBuf> {
    match &resolved.session_file {
        Some(path) => Ok(path.clone()),
        None => salesdesk_config::session_path(&resolved.name)
            .context("Could not determine config directory"),
    }
}

fn build_client(resolved: &ResolvedContext) -> Result<SalesDeskClient> {
    let storage = FileStorage::with_path(session_file(resolved)?);
    tracing::debug!(context = %resolved.name, session = %storage.path().display(), "using context");

    SalesDeskClient::builder()
        .accounts_url(&resolved.accounts_url)
        .catalog_url(&resolved.catalog_url)
        .timeout(resolved.timeout)
        .login_path(&resolved.login_path)
        .storage(Arc::new(storage))
        .session_host(Arc::new(TerminalHost))
        .build()
        .with_context(|| format!("Invalid backend URL in context '{}'", resolved.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn resolved(session_file: Option<PathBuf>) -> ResolvedContext {
        ResolvedContext {
            name: "local".to_string(),
            accounts_url: "http://localhost:3001".to_string(),
            catalog_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(15),
            login_path: "/login".to_string(),
            session_file,
        }
    }

    #[test]
    fn test_explicit_session_file_wins() {
        let path = PathBuf::from("/tmp/salesdesk-test/session.json");
        assert_eq!(session_file(&resolved(Some(path.clone()))).unwrap(), path);
    }

    #[test]
    fn test_build_client_from_context() {
        let dir = tempfile::tempdir().unwrap();
        let client = build_client(&resolved(Some(dir.path().join("s.json")))).unwrap();
        assert_eq!(
            client
                .base_url(salesdesk_client::Backend::Catalog)
                .as_str(),
            "http://localhost:5000/"
        );
    }

    #[test]
    fn test_bad_url_is_reported_with_context_name() {
        let mut ctx = resolved(Some(PathBuf::from("/tmp/x.json")));
        ctx.accounts_url = "not a url".to_string();
        let err = build_client(&ctx).unwrap_err();
        assert!(err.to_string().contains("local"));
    }
}
