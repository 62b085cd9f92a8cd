use super::collection::KeyCollection;
use super::fs::{FileSystem, SECRET_FILE_MODE};
use super::record::StoreRecord;
use super::types::{ApiKey, KeyName};
use crate::error::{AppError, AppResult};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// JSON-file backed key store.
///
/// Every mutation reads the whole file, applies the change in memory and
/// rewrites the whole file. Two processes mutating the same file at once can
/// lose one of the writes; the tool is meant for a single local user.
#[derive(Clone)]
pub struct KeyStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl KeyStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_all(&self) -> AppResult<KeyCollection> {
        if !self.fs.exists(&self.path) {
            tracing::debug!(path = %self.path.display(), "key store absent, starting empty");
            return Ok(KeyCollection::new());
        }
        let raw = self.fs.read_to_string(&self.path).map_err(|e| {
            AppError::internal(format!("failed to read key store: {e:#}"))
                .with_details(json!({ "path": self.path.display().to_string() }))
        })?;
        let record: StoreRecord = serde_json::from_str(&raw)
            .map_err(|e| self.corrupt(format!("key store is not a valid record: {e}")))?;
        let collection = record
            .into_collection()
            .map_err(|e| self.corrupt(format!("key store contains invalid data: {e}")))?;
        tracing::debug!(path = %self.path.display(), keys = collection.len(), "loaded key store");
        Ok(collection)
    }

    pub fn save(&self, collection: &KeyCollection) -> AppResult<()> {
        let record = StoreRecord::from_collection(collection);
        let body = serde_json::to_string_pretty(&record)
            .map_err(|e| AppError::internal(format!("failed to serialize key store: {e}")))?;
        self.fs
            .write(&self.path, &body)
            .and_then(|_| self.fs.set_mode(&self.path, SECRET_FILE_MODE))
            .map_err(|e| {
                AppError::internal(format!("failed to write key store: {e:#}"))
                    .with_details(json!({ "path": self.path.display().to_string() }))
            })?;
        tracing::debug!(path = %self.path.display(), keys = collection.len(), "saved key store");
        Ok(())
    }

    pub fn find(&self, name: &KeyName) -> AppResult<Option<ApiKey>> {
        Ok(self.get_all()?.find(name).cloned())
    }

    pub fn add(&self, key: ApiKey) -> AppResult<()> {
        let mut collection = self.get_all()?;
        collection.add(key);
        self.save(&collection)
    }

    /// Replaces a key by removing and re-adding it under the same name. The
    /// default designation survives the replacement.
    pub fn update(&self, key: ApiKey) -> AppResult<()> {
        let mut collection = self.get_all()?;
        let was_default = collection.is_default(key.name());
        let name = key.name().clone();
        collection.remove(&name);
        collection.add(key);
        if was_default {
            collection.set_default(&name)?;
        }
        self.save(&collection)
    }

    pub fn remove(&self, name: &KeyName) -> AppResult<bool> {
        let mut collection = self.get_all()?;
        let removed = collection.remove(name);
        self.save(&collection)?;
        Ok(removed)
    }

    pub fn set_default(&self, name: &KeyName) -> AppResult<()> {
        let mut collection = self.get_all()?;
        collection.set_default(name)?;
        self.save(&collection)
    }

    pub fn get_default(&self) -> AppResult<Option<ApiKey>> {
        Ok(self.get_all()?.get_default().cloned())
    }

    fn corrupt(&self, message: String) -> AppError {
        AppError::corrupt_store(message)
            .with_details(json!({ "path": self.path.display().to_string() }))
    }
}
