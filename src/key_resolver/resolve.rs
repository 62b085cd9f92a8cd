use super::env::{launch_env, EnvNames};
use crate::error::{AppError, AppResult};
use crate::selector::SelectorChain;
use crate::vault::{ApiKey, KeyName, KeyStore, LastUsedCache};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Explicit key name; wins over everything else.
    pub key: Option<String>,
    pub use_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    Default,
    Interactive,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Explicit => "explicit",
            KeySource::Default => "default",
            KeySource::Interactive => "interactive",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub key: ApiKey,
    pub source: KeySource,
    pub env: BTreeMap<String, String>,
}

/// Picks the credential for a launch: explicit name, then the stored default
/// when requested, then the interactive selector chain hinted with the last
/// used key. Nothing is launched from here; callers get the full result or
/// an error.
pub fn resolve_key(
    store: &KeyStore,
    cache: &LastUsedCache,
    selectors: &SelectorChain,
    request: &ResolveRequest,
    names: &EnvNames,
) -> AppResult<ResolvedKey> {
    let collection = store.get_all()?;

    let (name, source) = if let Some(raw) = &request.key {
        (KeyName::create(raw)?, KeySource::Explicit)
    } else if request.use_default {
        let default = collection.get_default().ok_or_else(AppError::no_default)?;
        (default.name().clone(), KeySource::Default)
    } else {
        if collection.is_empty() {
            return Err(AppError::no_keys());
        }
        // The hint is advisory; drop it if the key has since been removed.
        let hint = cache
            .get_last_used()
            .filter(|hint| collection.find(hint).is_some());
        (
            selectors.select(&collection, hint.as_ref())?,
            KeySource::Interactive,
        )
    };

    let key = collection
        .find(&name)
        .cloned()
        .ok_or_else(|| AppError::key_not_found(name.value()))?;

    if source != KeySource::Default {
        if let Err(err) = cache.set_last_used(&name) {
            tracing::warn!(key = %name, "could not record last used key: {err:#}");
        }
    }

    tracing::debug!(key = %name, source = source.as_str(), "resolved key");
    let env = launch_env(&key, names);
    Ok(ResolvedKey { key, source, env })
}

#[cfg(test)]
mod tests {
    use super::{resolve_key, KeySource, ResolveRequest, ResolvedKey};
    use crate::error::{AppError, AppResult, ErrorKind};
    use crate::key_resolver::EnvNames;
    use crate::selector::{KeySelector, Selection, SelectorChain};
    use crate::vault::{
        ApiKey, BaseUrl, KeyCollection, KeyName, KeyStore, LastUsedCache, MemoryFileSystem,
    };
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    const CACHE_PATH: &str = "/data/last_used";

    /// Records every call and answers with a fixed key name.
    struct Recording {
        answer: Option<&'static str>,
        hints: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl KeySelector for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn select(&self, _keys: &KeyCollection, hint: Option<&KeyName>) -> AppResult<Selection> {
            self.hints
                .lock()
                .unwrap()
                .push(hint.map(|h| h.value().to_string()));
            match self.answer {
                Some(name) => Ok(Selection::Chosen(KeyName::create(name)?)),
                None => Err(AppError::selection_cancelled()),
            }
        }
    }

    struct Harness {
        fs: Arc<MemoryFileSystem>,
        store: KeyStore,
        cache: LastUsedCache,
        chain: SelectorChain,
        hints: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl Harness {
        fn new(answer: Option<&'static str>) -> Self {
            let fs = Arc::new(MemoryFileSystem::new());
            let store = KeyStore::new(fs.clone(), PathBuf::from("/data/keys.json"));
            let cache = LastUsedCache::new(fs.clone(), PathBuf::from(CACHE_PATH));
            let hints = Arc::new(Mutex::new(Vec::new()));
            let chain = SelectorChain::new(vec![Box::new(Recording {
                answer,
                hints: hints.clone(),
            })]);
            Self {
                fs,
                store,
                cache,
                chain,
                hints,
            }
        }

        fn seeded(answer: Option<&'static str>) -> Self {
            let harness = Self::new(answer);
            harness
                .store
                .add(ApiKey::create(
                    KeyName::create("prod").unwrap(),
                    "sk-prod-xxxx".to_string(),
                    None,
                    None,
                ))
                .unwrap();
            harness
                .store
                .add(ApiKey::create(
                    KeyName::create("dev").unwrap(),
                    "sk-dev-yyyy".to_string(),
                    Some(BaseUrl::create("http://localhost:8080").unwrap()),
                    None,
                ))
                .unwrap();
            harness
        }

        fn resolve(&self, key: Option<&str>, use_default: bool) -> AppResult<ResolvedKey> {
            resolve_key(
                &self.store,
                &self.cache,
                &self.chain,
                &ResolveRequest {
                    key: key.map(str::to_string),
                    use_default,
                },
                &EnvNames::default(),
            )
        }

        fn last_used(&self) -> Option<String> {
            self.fs.contents(Path::new(CACHE_PATH))
        }

        fn selector_calls(&self) -> usize {
            self.hints.lock().unwrap().len()
        }
    }

    #[test]
    fn default_flag_yields_token_without_base_url() {
        let h = Harness::seeded(Some("dev"));
        let resolved = h.resolve(None, true).expect("resolve default");
        assert_eq!(resolved.source, KeySource::Default);
        assert_eq!(resolved.env.len(), 1);
        assert_eq!(resolved.env["AUTH_TOKEN"], "sk-prod-xxxx");
        assert!(!resolved.env.contains_key("BASE_URL"));
        assert_eq!(h.selector_calls(), 0);
        assert_eq!(h.last_used(), None);
    }

    #[test]
    fn explicit_name_yields_token_and_base_url() {
        let h = Harness::seeded(Some("prod"));
        let resolved = h.resolve(Some("dev"), false).expect("resolve explicit");
        assert_eq!(resolved.source, KeySource::Explicit);
        assert_eq!(resolved.env["AUTH_TOKEN"], "sk-dev-yyyy");
        assert_eq!(resolved.env["BASE_URL"], "http://localhost:8080");
        assert_eq!(h.last_used().as_deref(), Some("dev"));
    }

    #[test]
    fn explicit_name_wins_over_default_flag() {
        let h = Harness::seeded(Some("prod"));
        let resolved = h.resolve(Some("dev"), true).expect("resolve");
        assert_eq!(resolved.key.name().value(), "dev");
        assert_eq!(h.selector_calls(), 0);
    }

    #[test]
    fn default_flag_ignores_selector() {
        let h = Harness::seeded(None);
        let resolved = h.resolve(None, true).expect("resolve");
        assert_eq!(resolved.key.name().value(), "prod");
        assert_eq!(h.selector_calls(), 0);
    }

    #[test]
    fn explicit_unknown_name_is_not_found() {
        let h = Harness::seeded(None);
        let err = h.resolve(Some("staging"), false).expect_err("missing");
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
        assert_eq!(h.last_used(), None);
    }

    #[test]
    fn explicit_invalid_name_is_validation_error() {
        let h = Harness::seeded(None);
        let err = h.resolve(Some("bad name"), false).expect_err("invalid");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn empty_store_default_flag_has_no_default() {
        let h = Harness::new(Some("prod"));
        let err = h.resolve(None, true).expect_err("no default");
        assert_eq!(err.kind, ErrorKind::NoDefault);
    }

    #[test]
    fn empty_store_interactive_fails_before_prompting() {
        let h = Harness::new(Some("prod"));
        let err = h.resolve(None, false).expect_err("no keys");
        assert_eq!(err.kind, ErrorKind::NoKeys);
        assert_eq!(h.selector_calls(), 0);
    }

    #[test]
    fn default_flag_without_default_set() {
        let h = Harness::seeded(None);
        h.store.remove(&KeyName::create("prod").unwrap()).unwrap();
        let err = h.resolve(None, true).expect_err("no default");
        assert_eq!(err.kind, ErrorKind::NoDefault);
    }

    #[test]
    fn interactive_uses_last_used_hint_and_records_choice() {
        let h = Harness::seeded(Some("prod"));
        h.fs.put(Path::new(CACHE_PATH), "dev\n");

        let resolved = h.resolve(None, false).expect("interactive");
        assert_eq!(resolved.source, KeySource::Interactive);
        assert_eq!(resolved.key.name().value(), "prod");
        assert_eq!(
            h.hints.lock().unwrap().as_slice(),
            &[Some("dev".to_string())]
        );
        assert_eq!(h.last_used().as_deref(), Some("prod"));
    }

    #[test]
    fn stale_hint_is_dropped() {
        let h = Harness::seeded(Some("dev"));
        h.fs.put(Path::new(CACHE_PATH), "removed-key");
        h.resolve(None, false).expect("interactive");
        assert_eq!(h.hints.lock().unwrap().as_slice(), &[None]);
    }

    #[test]
    fn cancelled_selection_records_nothing() {
        let h = Harness::seeded(None);
        h.fs.put(Path::new(CACHE_PATH), "dev");
        let err = h.resolve(None, false).expect_err("cancelled");
        assert_eq!(err.kind, ErrorKind::SelectionCancelled);
        assert_eq!(h.last_used().as_deref(), Some("dev"));
    }

    #[test]
    fn selector_naming_unknown_key_is_not_found() {
        let h = Harness::seeded(Some("ghost"));
        let err = h.resolve(None, false).expect_err("ghost");
        assert_eq!(err.kind, ErrorKind::KeyNotFound);
    }

    #[test]
    fn single_key_store_skips_selector() {
        let h = Harness::new(None);
        h.store
            .add(ApiKey::create(
                KeyName::create("solo").unwrap(),
                "sk-solo".to_string(),
                None,
                None,
            ))
            .unwrap();
        let resolved = h.resolve(None, false).expect("single");
        assert_eq!(resolved.key.name().value(), "solo");
        assert_eq!(h.selector_calls(), 0);
    }

    #[test]
    fn corrupt_store_aborts_resolution() {
        let h = Harness::new(Some("prod"));
        h.fs.put(Path::new("/data/keys.json"), "[]");
        let err = h.resolve(Some("prod"), false).expect_err("corrupt");
        assert_eq!(err.kind, ErrorKind::CorruptStore);
    }
}
