use crate::vault::ApiKey;
use std::collections::BTreeMap;

pub const AUTH_TOKEN: &str = "AUTH_TOKEN";
pub const BASE_URL: &str = "BASE_URL";

/// Names of the variables handed to the launched process. The prefix lets
/// the same store drive tools that expect e.g. `ANTHROPIC_AUTH_TOKEN`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvNames {
    prefix: String,
}

impl EnvNames {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn auth_token(&self) -> String {
        format!("{}{AUTH_TOKEN}", self.prefix)
    }

    pub fn base_url(&self) -> String {
        format!("{}{BASE_URL}", self.prefix)
    }
}

/// The token is always present; the base URL only when one is configured.
pub fn launch_env(key: &ApiKey, names: &EnvNames) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(names.auth_token(), key.secret().to_string());
    if let Some(url) = key.base_url().filter(|url| !url.is_empty()) {
        env.insert(names.base_url(), url.value().to_string());
    }
    env
}
