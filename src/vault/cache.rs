use super::fs::FileSystem;
use super::types::KeyName;
use std::path::PathBuf;
use std::sync::Arc;

/// Remembers the most recently selected key name as a hint for the
/// interactive menu. Reads never fail; a missing or garbled file is no hint.
#[derive(Clone)]
pub struct LastUsedCache {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl LastUsedCache {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    pub fn get_last_used(&self) -> Option<KeyName> {
        if !self.fs.exists(&self.path) {
            return None;
        }
        let raw = match self.fs.read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), "ignoring unreadable last-used file: {err:#}");
                return None;
            }
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        KeyName::create(trimmed).ok()
    }

    pub fn set_last_used(&self, name: &KeyName) -> anyhow::Result<()> {
        self.fs.write(&self.path, name.value())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        if self.fs.exists(&self.path) {
            self.fs.remove(&self.path)?;
        }
        Ok(())
    }
}
