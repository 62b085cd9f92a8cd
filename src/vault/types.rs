use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;
use time::OffsetDateTime;

const MASK_VISIBLE_LIMIT: usize = 12;
const MASK_HEAD: usize = 8;
const MASK_TAIL: usize = 4;

/// Validated key profile name: non-empty, `[A-Za-z0-9_-]+` after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyName(String);

impl KeyName {
    pub fn create(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("key name cannot be empty"));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::validation(format!(
                "invalid key name '{trimmed}': only letters, digits, '-' and '_' are allowed"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional endpoint override. The empty string means "unset".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn create(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            url::Url::parse(trimmed).map_err(|e| {
                AppError::validation(format!("invalid base URL '{trimmed}': {e}"))
            })?;
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored credential profile. Never mutated in place; edits build a new
/// value that keeps the original `created_at`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    name: KeyName,
    secret: String,
    base_url: Option<BaseUrl>,
    note: Option<String>,
    created_at: OffsetDateTime,
}

impl ApiKey {
    /// New profile stamped with the current time (millisecond precision, UTC).
    pub fn create(
        name: KeyName,
        secret: String,
        base_url: Option<BaseUrl>,
        note: Option<String>,
    ) -> Self {
        Self::reconstitute(name, secret, base_url, note, super::helpers::now_utc())
    }

    pub fn reconstitute(
        name: KeyName,
        secret: String,
        base_url: Option<BaseUrl>,
        note: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            name,
            secret,
            base_url: base_url.filter(|url| !url.is_empty()),
            note,
            created_at,
        }
    }

    pub fn name(&self) -> &KeyName {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Display form of the secret: short secrets are shown as-is, longer ones
    /// keep the first 8 and last 4 characters.
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }

    pub fn with_secret(&self, secret: String) -> Self {
        Self {
            secret,
            ..self.clone()
        }
    }

    pub fn with_base_url(&self, base_url: Option<BaseUrl>) -> Self {
        Self {
            base_url: base_url.filter(|url| !url.is_empty()),
            ..self.clone()
        }
    }

    pub fn with_note(&self, note: Option<String>) -> Self {
        Self {
            note,
            ..self.clone()
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("name", &self.name)
            .field("secret", &self.masked_secret())
            .field("base_url", &self.base_url)
            .field("note", &self.note)
            .field("created_at", &self.created_at)
            .finish()
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= MASK_VISIBLE_LIMIT {
        return secret.to_string();
    }
    let head: String = chars[..MASK_HEAD].iter().collect();
    let tail: String = chars[chars.len() - MASK_TAIL..].iter().collect();
    format!("{head}\u{2026}{tail}")
}
