//! Client-local persistent storage
//!
//! The backend owns all domain data; the client persists exactly three
//! entries locally: the auth token, a cached copy of the signed-in user,
//! and the theme preference. Every operation is total — a storage fault
//! is logged and surfaces as `None` or a no-op, never as an error.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::auth::User;

/// Storage keys for the entries the client persists.
pub mod keys {
    /// Bearer token
    pub const TOKEN: &str = "taskmanager_token";
    /// Cached user object
    pub const USER: &str = "taskmanager_user";
    /// Theme preference
    pub const THEME: &str = "taskmanager_theme";
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// A total key/value store. Implementations must never fail the caller:
/// faults are logged and reads return `None`.
pub trait Store: Send + Sync {
    /// Read a value, or `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value; a write fault is a logged no-op
    fn set(&self, key: &str, value: Value);

    /// Remove a value; removing an absent key is a no-op
    fn remove(&self, key: &str);
}

/// In-memory store, the default for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Filesystem-backed store: one JSON file per key under a base directory.
/// Used to retain the session across process restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        let path = self.entry_path(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read storage entry");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "corrupt storage entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) {
        if let Err(err) = std::fs::create_dir_all(&self.base) {
            warn!(key, error = %err, "failed to create storage directory");
            return;
        }
        let serialized = match serde_json::to_string(&value) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize storage entry");
                return;
            }
        };
        if let Err(err) = std::fs::write(self.entry_path(key), serialized) {
            warn!(key, error = %err, "failed to write storage entry");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(key, error = %err, "failed to remove storage entry"),
        }
    }
}

/// Shared handle over a [`Store`] with typed accessors for the three
/// entries the client persists.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn Store>,
}

impl Storage {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { inner: store }
    }

    /// Storage backed by [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Storage backed by [`FileStore`] rooted at `base`
    pub fn on_disk(base: PathBuf) -> Self {
        Self::new(Arc::new(FileStore::new(base)))
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key)
    }

    pub fn set(&self, key: &str, value: Value) {
        self.inner.set(key, value);
    }

    pub fn remove(&self, key: &str) {
        self.inner.remove(key);
    }

    pub fn token(&self) -> Option<String> {
        match self.get(keys::TOKEN)? {
            Value::String(token) => Some(token),
            other => {
                warn!(?other, "unexpected token entry shape");
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) {
        self.set(keys::TOKEN, Value::String(token.to_string()));
    }

    pub fn remove_token(&self) {
        self.remove(keys::TOKEN);
    }

    pub fn user(&self) -> Option<User> {
        let value = self.get(keys::USER)?;
        match serde_json::from_value(value) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "corrupt cached user entry");
                None
            }
        }
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_value(user) {
            Ok(value) => self.set(keys::USER, value),
            Err(err) => warn!(error = %err, "failed to serialize user"),
        }
    }

    pub fn remove_user(&self) {
        self.remove(keys::USER);
    }

    pub fn theme(&self) -> Option<Theme> {
        serde_json::from_value(self.get(keys::THEME)?).ok()
    }

    pub fn set_theme(&self, theme: Theme) {
        match serde_json::to_value(theme) {
            Ok(value) => self.set(keys::THEME, value),
            Err(err) => warn!(error = %err, "failed to serialize theme"),
        }
    }

    /// Remove the token and cached user together. Idempotent.
    pub fn clear_session(&self) {
        self.remove_token();
        self.remove_user();
    }
}
