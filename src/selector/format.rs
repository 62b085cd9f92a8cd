use crate::error::{AppError, AppResult};
use crate::vault::{KeyCollection, KeyName};

const HINT_MARKER: &str = "* ";
const PLAIN_MARKER: &str = "  ";

/// One line per key: `<marker><name>\t<masked>\t<note>`.
pub(super) fn menu_lines(keys: &KeyCollection, hint: Option<&KeyName>) -> Vec<String> {
    keys.get_all()
        .iter()
        .map(|key| {
            let marker = if Some(key.name()) == hint {
                HINT_MARKER
            } else {
                PLAIN_MARKER
            };
            format!(
                "{marker}{}\t{}\t{}",
                key.name(),
                key.masked_secret(),
                key.note().unwrap_or_default()
            )
        })
        .collect()
}

/// Extracts the key name from a line echoed back by the picker.
pub(super) fn parse_choice(output: &str) -> AppResult<KeyName> {
    let line = output.trim().lines().next().unwrap_or_default();
    let field = line.split('\t').next().unwrap_or_default().trim();
    let name = field
        .strip_prefix('*')
        .map(str::trim_start)
        .unwrap_or(field);
    if name.is_empty() {
        return Err(AppError::invalid_selection("selector returned no key"));
    }
    KeyName::create(name)
        .map_err(|e| AppError::invalid_selection(format!("selector returned an invalid key: {e}")))
}
