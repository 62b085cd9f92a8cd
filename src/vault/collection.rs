use super::types::{ApiKey, KeyName};
use crate::error::{AppError, AppResult};

/// In-memory set of key profiles plus the default designation.
///
/// Built from the store for a single operation and discarded after it is
/// written back. Keys keep insertion order for display; an upsert of an
/// existing name keeps its position.
#[derive(Debug, Clone, Default)]
pub struct KeyCollection {
    keys: Vec<ApiKey>,
    default_name: Option<KeyName>,
}

impl KeyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from persisted parts. A default that does not
    /// reference a present key is rejected.
    pub fn from_parts(keys: Vec<ApiKey>, default_name: Option<KeyName>) -> AppResult<Self> {
        let mut collection = Self::new();
        for key in keys {
            if collection.find(key.name()).is_some() {
                return Err(AppError::validation(format!(
                    "duplicate key name '{}'",
                    key.name()
                )));
            }
            collection.keys.push(key);
        }
        if let Some(name) = default_name {
            collection.set_default(&name)?;
        }
        Ok(collection)
    }

    /// Inserts or replaces by name. The first key added to an empty
    /// collection becomes the default.
    pub fn add(&mut self, key: ApiKey) {
        let was_empty = self.keys.is_empty();
        match self.position(key.name()) {
            Some(idx) => self.keys[idx] = key,
            None => self.keys.push(key),
        }
        if was_empty {
            self.default_name = self.keys.first().map(|k| k.name().clone());
        }
    }

    /// Removes by name. Clears the default when it pointed at the removed key;
    /// no other key is promoted.
    pub fn remove(&mut self, name: &KeyName) -> bool {
        let Some(idx) = self.position(name) else {
            return false;
        };
        self.keys.remove(idx);
        if self.default_name.as_ref() == Some(name) {
            self.default_name = None;
        }
        true
    }

    pub fn find(&self, name: &KeyName) -> Option<&ApiKey> {
        self.keys.iter().find(|k| k.name() == name)
    }

    pub fn get_default(&self) -> Option<&ApiKey> {
        self.default_name.as_ref().and_then(|name| self.find(name))
    }

    pub fn default_name(&self) -> Option<&KeyName> {
        self.default_name.as_ref()
    }

    pub fn set_default(&mut self, name: &KeyName) -> AppResult<()> {
        if self.find(name).is_none() {
            return Err(AppError::key_not_found(name.value()));
        }
        self.default_name = Some(name.clone());
        Ok(())
    }

    pub fn is_default(&self, name: &KeyName) -> bool {
        self.default_name.as_ref() == Some(name)
    }

    pub fn get_all(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn position(&self, name: &KeyName) -> Option<usize> {
        self.keys.iter().position(|k| k.name() == name)
    }
}
