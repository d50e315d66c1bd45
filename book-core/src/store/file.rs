//! Directory backend: one `<key>.json` file per key.

use super::backend::{check_quota, StorageBackend};
use crate::config::Config;
use crate::error::AppError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File-per-key backend rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
    quota_bytes: Option<usize>,
}

impl FileBackend {
    /// Open (creating if needed) the data directory.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::StorageError(anyhow::anyhow!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        info!("File storage opened");

        Ok(Self {
            dir,
            quota_bytes: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let backend = Self::open(&config.data_dir)?;
        Ok(match config.storage_quota_bytes {
            Some(quota) => backend.with_quota(quota),
            None => backend,
        })
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn validate_key(key: &str) -> Result<(), AppError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidKey(key.to_string()))
    }
}

impl StorageBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StorageError(anyhow::anyhow!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        check_quota(key, value, self.quota_bytes)?;

        // Write beside the target and rename over it so readers never see a partial value.
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        debug!(key, bytes = value.len(), "Value written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_from_a_reopened_backend() {
        let dir = tempfile::tempdir().unwrap();

        let mut backend = FileBackend::open(dir.path()).unwrap();
        backend.save("invoiceCounter", "7").unwrap();
        drop(backend);

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.load("invoiceCounter").unwrap().as_deref(), Some("7"));
        assert!(dir.path().join("invoiceCounter.json").exists());
        assert!(!dir.path().join("invoiceCounter.json.tmp").exists());
    }

    #[test]
    fn missing_key_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        assert_eq!(backend.load("invoices").unwrap(), None);
    }

    #[test]
    fn keys_with_path_characters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "dot.key"] {
            let err = backend.save(key, "1").unwrap_err();
            assert_eq!(err.kind(), "invalid_key", "key {:?}", key);
        }
    }

    #[test]
    fn quota_rejects_oversized_values_and_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).unwrap().with_quota(8);

        backend.save("invoices", "[]").unwrap();
        let err = backend.save("invoices", "[1,2,3,4,5]").unwrap_err();

        assert_eq!(err.kind(), "quota_exceeded");
        assert_eq!(backend.load("invoices").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::open(dir.path()).unwrap();

        backend.save("invoices", "[]").unwrap();
        backend.remove("invoices").unwrap();
        backend.remove("invoices").unwrap();

        assert_eq!(backend.load("invoices").unwrap(), None);
    }

    #[test]
    fn from_config_applies_quota() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().join("nested"),
            storage_quota_bytes: Some(1),
        };

        let mut backend = FileBackend::from_config(&config).unwrap();

        assert!(backend.dir().exists());
        assert!(backend.save("invoiceCounter", "12").is_err());
    }
}
