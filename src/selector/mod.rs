mod builtin;
mod format;
mod fzf;

pub use builtin::BuiltinSelector;
pub use fzf::{FzfOptions, FzfSelector};

use crate::error::{AppError, AppResult};
use crate::vault::{KeyCollection, KeyName};

/// Outcome of one selector attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(KeyName),
    /// The selector cannot run on this host; the chain moves on.
    Unavailable(String),
}

pub trait KeySelector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Picks one key from a collection. `hint` pre-selects an entry when it
    /// names a key in the collection.
    fn select(&self, keys: &KeyCollection, hint: Option<&KeyName>) -> AppResult<Selection>;
}

/// Shared by every selector: empty collections are an error and a single key
/// is returned without prompting.
pub(crate) fn trivial_choice(keys: &KeyCollection) -> AppResult<Option<KeyName>> {
    match keys.get_all() {
        [] => Err(AppError::no_keys()),
        [only] => Ok(Some(only.name().clone())),
        _ => Ok(None),
    }
}

/// Ordered list of selectors tried until one produces a choice. Errors other
/// than "unavailable" (cancellation, bad input) stop the chain.
pub struct SelectorChain {
    selectors: Vec<Box<dyn KeySelector>>,
}

impl SelectorChain {
    pub fn new(selectors: Vec<Box<dyn KeySelector>>) -> Self {
        Self { selectors }
    }

    pub fn select(&self, keys: &KeyCollection, hint: Option<&KeyName>) -> AppResult<KeyName> {
        if let Some(name) = trivial_choice(keys)? {
            return Ok(name);
        }
        for selector in &self.selectors {
            match selector.select(keys, hint)? {
                Selection::Chosen(name) => {
                    tracing::debug!(selector = selector.name(), key = %name, "key selected");
                    return Ok(name);
                }
                Selection::Unavailable(reason) => {
                    tracing::warn!(
                        selector = selector.name(),
                        "{reason}; falling back to the next selector"
                    );
                }
            }
        }
        Err(AppError::internal("no key selector is available"))
    }
}
