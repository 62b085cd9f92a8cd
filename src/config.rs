//! Optional JSON configuration file and data directory resolution.

use crate::error::{AppError, AppResult};
use crate::selector::FzfOptions;
use crate::vault::project_dirs;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "KEYSWITCH_CONFIG";
pub const HOME_ENV: &str = "KEYSWITCH_HOME";

const KEYS_FILE: &str = "keys.json";
const LAST_USED_FILE: &str = "last_used";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AppConfig {
    /// Key store location; relative paths are taken from the data directory.
    pub keys_file: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub log_level: String,
    /// Program launched by `run`.
    pub command: String,
    pub env_prefix: String,
    pub selector: SelectorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keys_file: None,
            cache_file: None,
            log_level: "warn".to_string(),
            command: "claude".to_string(),
            env_prefix: "ANTHROPIC_".to_string(),
            selector: SelectorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// External fuzzy finder, falling back to the numbered menu.
    #[default]
    Fzf,
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SelectorConfig {
    pub kind: SelectorKind,
    pub fzf_binary: String,
    pub height: String,
    pub border: bool,
    pub reverse: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let fzf = FzfOptions::default();
        Self {
            kind: SelectorKind::default(),
            fzf_binary: fzf.binary,
            height: fzf.height,
            border: fzf.border,
            reverse: fzf.reverse,
        }
    }
}

impl SelectorConfig {
    pub fn fzf_options(&self) -> FzfOptions {
        FzfOptions {
            binary: self.fzf_binary.clone(),
            height: self.height.clone(),
            border: self.border,
            reverse: self.reverse,
        }
    }
}

impl AppConfig {
    /// `--config` wins, then `KEYSWITCH_CONFIG`, then the per-user config dir.
    pub fn locate(flag: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
        flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
            .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.json")))
    }

    /// A missing file is the default configuration, not an error.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn store_paths(&self, data_dir: &Path) -> StorePaths {
        let under_data = |custom: &Option<PathBuf>, fallback: &str| match custom {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(fallback),
        };
        StorePaths {
            keys: under_data(&self.keys_file, KEYS_FILE),
            last_used: under_data(&self.cache_file, LAST_USED_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub keys: PathBuf,
    pub last_used: PathBuf,
}

/// `--data-dir` wins, then `KEYSWITCH_HOME`, then the platform data dir.
pub fn resolve_data_dir(flag: Option<PathBuf>, env: Option<OsString>) -> AppResult<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(home) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    crate::vault::default_data_dir().ok_or_else(|| {
        AppError::internal(format!(
            "could not determine a data directory; pass --data-dir or set {HOME_ENV}"
        ))
    })
}
