//! Session storage.
//!
//! [`SessionStorage`] is the durable string-keyed surface supplied by the
//! host. [`TokenStore`] layers the session rules on top of it: token and
//! user are written and cleared together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{Role, User};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the serialized user record.
pub const USER_KEY: &str = "user";

/// Default session file name within the salesdesk config directory.
pub const SESSION_FILE: &str = "session.json";

// ============================================================================
// SessionStorage Trait
// ============================================================================

/// Durable key-value storage for session state.
#[async_trait]
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Shared storage for use across clients.
pub type SharedStorage = Arc<dyn SessionStorage>;

// ============================================================================
// MemoryStorage
// ============================================================================

/// In-memory storage. Session state is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// FileStorage
// ============================================================================

/// JSON-file storage for CLI hosts.
///
/// The whole map is rewritten on every change; reads are served from a cache
/// populated on first access.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl FileStorage {
    /// Create storage at `data_dir/session.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self::with_path(data_dir.join(SESSION_FILE))
    }

    /// Create storage at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    /// Get the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Storage(format!("Failed to read session file: {}", e)))?;

        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse session file: {}", e)))
    }

    fn write_file(&self, entries: &HashMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| Error::Storage(format!("Failed to delete session file: {}", e)))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create session directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Storage(format!("Failed to serialize session: {}", e)))?;

        std::fs::write(&self.path, json)
            .map_err(|e| Error::Storage(format!("Failed to write session file: {}", e)))
    }

    /// Load the map into the cache if needed and apply `f` to it.
    async fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> Result<(R, HashMap<String, String>)> {
        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = Some(self.read_file()?);
        }
        let entries = cache.get_or_insert_with(HashMap::new);
        let out = f(entries);
        Ok((out, entries.clone()))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let cache = self.cache.read().await;
            if let Some(entries) = cache.as_ref() {
                return Ok(entries.get(key).cloned());
            }
        }
        let (value, _) = self.with_entries(|e| e.get(key).cloned()).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (_, entries) = self
            .with_entries(|e| e.insert(key.to_string(), value.to_string()))
            .await?;
        self.write_file(&entries)?;
        tracing::debug!(key, path = %self.path.display(), "session value saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let (removed, entries) = self.with_entries(|e| e.remove(key)).await?;
        if removed.is_some() {
            self.write_file(&entries)?;
        }
        Ok(())
    }
}

// ============================================================================
// Session + TokenStore
// ============================================================================

/// An authenticated session: bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Whether the session's user holds one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.user.role)
    }
}

/// Strip a legacy JSON-quoted wrapper and surrounding whitespace.
///
/// Returns `None` for empty tokens.
pub fn clean_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

/// Reads and writes the current session through a [`SessionStorage`].
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: SharedStorage,
}

impl TokenStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    /// Create a store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Current bearer token, cleaned.
    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(TOKEN_KEY)
            .await?
            .as_deref()
            .and_then(clean_token))
    }

    /// Current user record.
    pub async fn user(&self) -> Result<Option<User>> {
        match self.storage.get(USER_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::Storage(format!("Failed to parse stored user: {}", e))),
            None => Ok(None),
        }
    }

    /// The full session, or `None` unless both token and user are present.
    pub async fn session(&self) -> Result<Option<Session>> {
        match (self.token().await?, self.user().await?) {
            (Some(token), Some(user)) => Ok(Some(Session { token, user })),
            _ => Ok(None),
        }
    }

    /// Whether a token is currently stored.
    pub async fn has_token(&self) -> bool {
        matches!(self.token().await, Ok(Some(_)))
    }

    /// Store a new session, replacing token and user together.
    pub async fn save(&self, session: &Session) -> Result<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| Error::Storage(format!("Failed to serialize user: {}", e)))?;
        self.storage.set(TOKEN_KEY, &session.token).await?;
        if let Err(e) = self.storage.set(USER_KEY, &user).await {
            if let Err(undo) = self.storage.remove(TOKEN_KEY).await {
                tracing::warn!(error = %undo, "could not remove token after failed save");
            }
            return Err(e);
        }
        tracing::debug!(user = %session.user.email, "session stored");
        Ok(())
    }

    /// Replace only the token, as a refresh does.
    pub async fn replace_token(&self, token: &str) -> Result<()> {
        self.storage.set(TOKEN_KEY, token).await
    }

    /// Remove token and user.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await?;
        Ok(())
    }
}
