//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod products;
pub mod sales;
pub mod status;
pub mod users;

use console::Style;
use salesdesk_client::{SalesDeskClient, classify};

use crate::session;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Context name from `--context`, overriding `current-context`.
    pub context_name: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Build a client for the selected context.
    pub fn client(&self) -> anyhow::Result<SalesDeskClient> {
        session::connect(self.context_name.as_deref())
    }
}

/// Turn a client error into the message shown to the user.
pub fn failure(err: salesdesk_client::Error) -> anyhow::Error {
    tracing::debug!(error = ?err, "command failed");
    let classified = classify(&err);
    anyhow::anyhow!("{}", classified.message)
}

/// Print a JSON value, pretty.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section header the way every command does.
pub fn header(title: &str) {
    let dim = Style::new().dim();
    println!();
    println!("{}", console::style(title).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
}

/// Shorten `s` to at most `max_len` characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer line", 10), "a much ...");
        assert_eq!(truncate("línea\ncon acentos", 8), "línea...");
    }

    #[test]
    fn test_failure_uses_classified_message() {
        let err = failure(salesdesk_client::Error::Server {
            status: 500,
            message: "db down".to_string(),
        });
        assert_eq!(err.to_string(), salesdesk_client::classify::SERVER_ERROR_MESSAGE);
    }
}
