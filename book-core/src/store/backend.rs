//! Raw key-value backends underneath [`PersistedStore`](super::PersistedStore).

use crate::error::AppError;
use std::collections::HashMap;

/// Durable string storage addressed by key.
///
/// Backends deal in serialized text only; decoding and fallback policy live in
/// the store above them.
pub trait StorageBackend {
    /// Load the raw value stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Durably replace the value stored under `key`.
    fn save(&mut self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

/// Reject values larger than `quota` bytes.
pub(crate) fn check_quota(key: &str, value: &str, quota: Option<usize>) -> Result<(), AppError> {
    match quota {
        Some(limit) if value.len() > limit => Err(AppError::QuotaExceeded(format!(
            "{} needs {} bytes, limit is {}",
            key,
            value.len(),
            limit
        ))),
        _ => Ok(()),
    }
}

/// In-process backend. Survives a store being dropped and rebuilt through
/// [`PersistedStore::into_backend`](super::PersistedStore::into_backend).
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Seed a raw value, bypassing the quota. Used to stage legacy or damaged data.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        check_quota(key, value, self.quota_bytes)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}
