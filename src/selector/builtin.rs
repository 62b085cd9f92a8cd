use super::{trivial_choice, KeySelector, Selection};
use crate::error::{AppError, AppResult};
use crate::prompt::Prompt;
use crate::vault::{KeyCollection, KeyName};
use std::sync::Arc;

/// Numbered menu read from the terminal. Always available, so it closes the
/// selector chain.
pub struct BuiltinSelector {
    prompt: Arc<dyn Prompt>,
}

impl BuiltinSelector {
    pub fn new(prompt: Arc<dyn Prompt>) -> Self {
        Self { prompt }
    }
}

impl KeySelector for BuiltinSelector {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn select(&self, keys: &KeyCollection, hint: Option<&KeyName>) -> AppResult<Selection> {
        if let Some(name) = trivial_choice(keys)? {
            return Ok(Selection::Chosen(name));
        }

        let all = keys.get_all();
        let default_index = hint
            .and_then(|hint| all.iter().position(|k| k.name() == hint))
            .map(|idx| idx + 1)
            .unwrap_or(1);

        let mut menu = vec!["Select an API key:".to_string(), String::new()];
        for (idx, key) in all.iter().enumerate() {
            let hinted = Some(key.name()) == hint;
            menu.push(format!(
                "{}{}) {} ({}){}",
                if hinted { "> " } else { "  " },
                idx + 1,
                key.name(),
                key.masked_secret(),
                if hinted { " [last used]" } else { "" }
            ));
        }
        self.prompt.show(&menu.join("\n"));

        let answer = self
            .prompt
            .ask(&format!(
                "Enter number (1-{}, default: {default_index}): ",
                all.len()
            ))
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::Interrupted => {
                    AppError::selection_cancelled()
                }
                _ => AppError::internal(format!("failed to read selection: {err}")),
            })?;

        let answer = answer.trim();
        let choice = if answer.is_empty() {
            default_index
        } else {
            answer.parse::<usize>().map_err(|_| {
                AppError::invalid_selection(format!(
                    "invalid selection '{answer}': expected a number between 1 and {}",
                    all.len()
                ))
            })?
        };
        if choice == 0 || choice > all.len() {
            return Err(AppError::invalid_selection(format!(
                "invalid selection {choice}: expected a number between 1 and {}",
                all.len()
            )));
        }
        Ok(Selection::Chosen(all[choice - 1].name().clone()))
    }
}
