//! Read-through, write-through JSON store over a [`StorageBackend`].

use super::backend::StorageBackend;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// How far a write got.
///
/// Writes never fail from the caller's point of view; this only reports whether
/// the new value reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    /// Stored in the backend and the in-memory cache.
    Persisted,
    /// The backend rejected the write; only the in-memory cache holds it.
    MemoryOnly,
    /// The value could not be serialized and was dropped.
    Discarded,
}

impl Durability {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Durability::Persisted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Durability::Persisted => "persisted",
            Durability::MemoryOnly => "memory_only",
            Durability::Discarded => "discarded",
        }
    }
}

/// JSON values keyed by name, cached in memory and written through to a backend.
pub struct PersistedStore<B: StorageBackend> {
    backend: B,
    cache: HashMap<String, Value>,
}

impl<B: StorageBackend> PersistedStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drop the cache and hand back the backend, e.g. to reopen it later.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Read `key`, initializing it from `default` when nothing is stored.
    ///
    /// A missing value is persisted as soon as it is defaulted. Corrupt or
    /// unreadable data also yields `default()`, but is left on disk untouched
    /// until the next write replaces it.
    pub fn read<T, F>(&mut self, key: &str, default: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(cached) = self.cache.get(key) {
            match serde_json::from_value::<T>(cached.clone()) {
                Ok(value) => return value,
                Err(e) => warn!(key, error = %e, "Cached value has unexpected shape, reloading"),
            }
        }

        match self.backend.load(key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    self.cache_value(key, &value);
                    value
                }
                Err(e) => {
                    warn!(key, error = %e, "Stored value is corrupt, falling back to default");
                    let value = default();
                    self.cache_value(key, &value);
                    value
                }
            },
            Ok(None) => {
                debug!(key, "No stored value, initializing default");
                let value = default();
                self.write(key, &value);
                value
            }
            Err(e) => {
                warn!(key, error = %e, kind = e.kind(), "Failed to load stored value, falling back to default");
                let value = default();
                self.cache_value(key, &value);
                value
            }
        }
    }

    /// Replace the value under `key`.
    pub fn write<T: Serialize>(&mut self, key: &str, value: T) -> Durability {
        let json = match serde_json::to_value(&value) {
            Ok(json) => json,
            Err(e) => {
                error!(key, error = %e, "Failed to serialize value, write discarded");
                return Durability::Discarded;
            }
        };

        let durability = match serde_json::to_string(&json) {
            Ok(raw) => match self.backend.save(key, &raw) {
                Ok(()) => Durability::Persisted,
                Err(e) => {
                    error!(key, error = %e, kind = e.kind(), "Failed to persist value, keeping it in memory only");
                    Durability::MemoryOnly
                }
            },
            Err(e) => {
                error!(key, error = %e, "Failed to encode value, keeping it in memory only");
                Durability::MemoryOnly
            }
        };

        self.cache.insert(key.to_string(), json);
        durability
    }

    /// Replace the value under `key` with `update(latest)`, where `latest` is
    /// the most recently written value (or `default()` if there is none).
    pub fn write_with<T, D, F>(&mut self, key: &str, default: D, update: F) -> Durability
    where
        T: Serialize + DeserializeOwned,
        D: FnOnce() -> T,
        F: FnOnce(T) -> T,
    {
        let latest = self.read(key, default);
        self.write(key, update(latest))
    }

    fn cache_value<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.cache.insert(key.to_string(), json);
            }
            Err(e) => warn!(key, error = %e, "Failed to cache value"),
        }
    }
}
