//! Locations of the config directory and the files kept in it.
//!
//! ```text
//! <config dir>/
//!   client.yaml
//!   sessions/<context>.json
//!   logs/
//! ```

use std::path::PathBuf;

/// Application name for XDG directory resolution.
const APP_NAME: &str = "salesdesk";

/// Environment variable to override the config directory.
///
/// When set, this takes precedence over the platform default (XDG/Application Support).
const CONFIG_DIR_ENV: &str = "SALESDESK_CONFIG_DIR";

const SESSIONS_DIR: &str = "sessions";
const LOGS_DIR: &str = "logs";

/// Get the XDG config directory for salesdesk.
///
/// Checks `SALESDESK_CONFIG_DIR` env var first, then falls back to platform default
/// (`~/.config/salesdesk` on Linux, `~/Library/Application Support/salesdesk` on macOS).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Default session file for a context.
pub fn session_path(context: &str) -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(SESSIONS_DIR).join(format!("{}.json", sanitize(context))))
}

/// Directory for rolling log files.
pub fn logs_dir() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(LOGS_DIR))
}

/// Keep context names usable as file names.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
