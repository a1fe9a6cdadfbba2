//! Client configuration for connecting to SalesDesk backends.
//!
//! Implements a kubeconfig-style configuration with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: local
//!
//! contexts:
//!   - name: local
//!     accounts: http://localhost:3001
//!     catalog: http://localhost:5000
//!   - name: staging
//!     accounts: https://accounts.staging.example.com
//!     catalog: https://catalog.staging.example.com
//!     timeout: 30
//!     session-file: ~/.salesdesk/staging.json
//!
//! defaults:
//!   timeout: 15
//!   login-path: /login
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Default config filename.
const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root client configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ClientConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named connection contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty client config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get a mutable context by name.
    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context by name.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Set the current context by name.
    ///
    /// Returns an error if the context doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_some() {
            self.current_context = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ContextNotFound(name.to_string()))
        }
    }

    /// List all context names.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Resolve a context with defaults applied.
    ///
    /// `name` overrides `current-context`.
    pub fn resolve(&self, name: Option<&str>) -> Result<ResolvedContext> {
        let context = match name {
            Some(name) => self
                .get_context(name)
                .ok_or_else(|| ConfigError::ContextNotFound(name.to_string()))?,
            None => match &self.current_context {
                Some(current) => self
                    .get_context(current)
                    .ok_or_else(|| ConfigError::ContextNotFound(current.clone()))?,
                None => return Err(ConfigError::NoContext),
            },
        };

        Ok(ResolvedContext {
            name: context.name.clone(),
            accounts_url: context.accounts.clone(),
            catalog_url: context
                .catalog
                .clone()
                .unwrap_or_else(|| context.accounts.clone()),
            timeout: Duration::from_secs(context.timeout.unwrap_or(self.defaults.timeout)),
            login_path: context
                .login_path
                .clone()
                .unwrap_or_else(|| self.defaults.login_path.clone()),
            session_file: context.session_file.as_deref().map(expand_path),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection context: the two backend URLs plus overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context.
    pub name: String,

    /// Accounts backend URL (auth, users, sales).
    pub accounts: String,

    /// Catalog backend URL (products). Defaults to the accounts URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Request timeout override (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Login entry point override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_path: Option<String>,

    /// Session file override. `~/` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl Context {
    /// Create a new context with just a name and accounts URL.
    pub fn new(name: impl Into<String>, accounts: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accounts: accounts.into(),
            catalog: None,
            timeout: None,
            login_path: None,
            session_file: None,
        }
    }

    /// Set the catalog URL.
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the login path.
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Set the session file.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }
}

/// A context with every default applied, ready to build a client from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    pub name: String,
    pub accounts_url: String,
    pub catalog_url: String,
    pub timeout: Duration,
    pub login_path: String,
    /// Explicit session file, if the context names one.
    pub session_file: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Default request timeout in seconds.
    pub timeout: u64,

    /// Default login entry point.
    pub login_path: String,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout: 15,
            login_path: "/login".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Get the path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    crate::xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the client configuration.
///
/// Returns a default config if the file doesn't exist.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the client configuration.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    save_client_config_to(config, &path)
}

/// Save client config to a specific path.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Expand ~ to home directory in paths.
fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert!(config.contexts.is_empty());
        assert_eq!(config.defaults.timeout, 15);
    }

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
current-context: local
contexts:
  - name: local
    accounts: http://localhost:3001
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.current_context.as_deref(), Some("local"));
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].accounts, "http://localhost:3001");
        assert!(config.contexts[0].catalog.is_none());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
api-version: v1
kind: ClientConfig
current-context: staging

contexts:
  - name: local
    accounts: http://localhost:3001
    catalog: http://localhost:5000

  - name: staging
    accounts: https://accounts.staging.example.com
    catalog: https://catalog.staging.example.com
    timeout: 30
    login-path: /auth/signin
    session-file: /tmp/staging.json

defaults:
  timeout: 20
  login-path: /login
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.contexts.len(), 2);
        assert_eq!(config.current().unwrap().name, "staging");

        let local = config.get_context("local").unwrap();
        assert_eq!(local.catalog.as_deref(), Some("http://localhost:5000"));
        assert!(local.timeout.is_none());

        let staging = config.get_context("staging").unwrap();
        assert_eq!(staging.timeout, Some(30));
        assert_eq!(staging.login_path.as_deref(), Some("/auth/signin"));

        assert_eq!(config.defaults.timeout, 20);
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:3001"));
        config.use_context("local").unwrap();

        let resolved = config.resolve(None).unwrap();
        assert_eq!(resolved.name, "local");
        assert_eq!(resolved.catalog_url, "http://localhost:3001");
        assert_eq!(resolved.timeout, Duration::from_secs(15));
        assert_eq!(resolved.login_path, "/login");
        assert!(resolved.session_file.is_none());
    }

    #[test]
    fn test_resolve_prefers_context_overrides() {
        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("staging", "https://a.example.com")
                .with_catalog("https://c.example.com")
                .with_timeout(45)
                .with_login_path("/signin")
                .with_session_file("/var/lib/salesdesk/staging.json"),
        );

        let resolved = config.resolve(Some("staging")).unwrap();
        assert_eq!(resolved.catalog_url, "https://c.example.com");
        assert_eq!(resolved.timeout, Duration::from_secs(45));
        assert_eq!(resolved.login_path, "/signin");
        assert_eq!(
            resolved.session_file,
            Some(PathBuf::from("/var/lib/salesdesk/staging.json"))
        );
    }

    #[test]
    fn test_resolve_errors() {
        let mut config = ClientConfig::new();
        assert!(matches!(config.resolve(None), Err(ConfigError::NoContext)));
        assert!(matches!(
            config.resolve(Some("missing")),
            Err(ConfigError::ContextNotFound(_))
        ));

        // Dangling current-context
        config.current_context = Some("gone".to_string());
        assert!(matches!(
            config.resolve(None),
            Err(ConfigError::ContextNotFound(name)) if name == "gone"
        ));
    }

    #[test]
    fn test_set_context() {
        let mut config = ClientConfig::new();

        config.set_context(Context::new("local", "http://localhost:3001"));
        assert_eq!(config.contexts.len(), 1);

        config.set_context(Context::new("local", "http://localhost:4001"));
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].accounts, "http://localhost:4001");
    }

    #[test]
    fn test_remove_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:3001"));
        config.set_context(Context::new("remote", "https://remote.example.com"));
        config.current_context = Some("local".to_string());

        let removed = config.remove_context("remote").unwrap();
        assert_eq!(removed.name, "remote");
        assert_eq!(config.current_context.as_deref(), Some("local"));

        // Removing the current context clears it
        config.remove_context("local");
        assert!(config.current_context.is_none());
        assert!(config.remove_context("local").is_none());
    }

    #[test]
    fn test_use_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:3001"));

        config.use_context("local").unwrap();
        assert_eq!(config.current_context.as_deref(), Some("local"));

        let err = config.use_context("nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_context_names() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:3001"));
        config.set_context(Context::new("remote", "https://remote.example.com"));

        let names = config.context_names();
        assert_eq!(names, vec!["local", "remote"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.yaml");

        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("local", "http://localhost:3001").with_catalog("http://localhost:5000"),
        );
        config.current_context = Some("local".to_string());

        save_client_config_to(&config, &path).unwrap();
        let loaded = load_client_config_from(Some(&path)).unwrap();

        assert_eq!(loaded.current_context, config.current_context);
        assert_eq!(loaded.contexts.len(), 1);
        assert_eq!(
            loaded.contexts[0].catalog.as_deref(),
            Some("http://localhost:5000")
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("nope.yaml"))).unwrap();
        assert!(config.contexts.is_empty());

        let config = load_client_config_from(None).unwrap();
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.yaml");
        std::fs::write(&path, "contexts: [not: {valid").unwrap();

        let err = load_client_config_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseYaml(_)));
    }

    #[test]
    fn test_expand_path() {
        let path = PathBuf::from("~/test/session.json");
        let expanded = expand_path(&path);
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_str().unwrap().starts_with("~/"));
        }

        let path2 = PathBuf::from("/absolute/path");
        assert_eq!(expand_path(&path2), path2);
    }
}
