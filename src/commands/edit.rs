use super::{key_json, AppContext};
use crate::cli::EditArgs;
use crate::error::{AppError, AppResult};
use crate::io_utils::read_secret;
use crate::output::CommandOutput;
use crate::vault::{normalize_opt_string, BaseUrl, KeyName};
use serde_json::json;

/// Passing this instead of a value clears the field.
const CLEAR: &str = "-";

pub fn run(ctx: &AppContext, args: EditArgs) -> AppResult<CommandOutput> {
    let name = KeyName::create(&args.name)?;
    if args.secret.is_none() && args.base_url.is_none() && args.note.is_none() {
        return Err(AppError::validation(
            "nothing to change; pass --secret, --base-url or --note",
        ));
    }

    let mut key = ctx
        .store
        .find(&name)?
        .ok_or_else(|| AppError::key_not_found(name.value()))?;

    let mut changed = Vec::new();
    if let Some(raw) = args.base_url.as_deref() {
        let base_url = if raw.trim() == CLEAR {
            None
        } else {
            Some(BaseUrl::create(raw)?)
        };
        key = key.with_base_url(base_url);
        changed.push("baseUrl");
    }
    if let Some(raw) = args.note {
        let note = if raw.trim() == CLEAR {
            None
        } else {
            normalize_opt_string(Some(raw))
        };
        key = key.with_note(note);
        changed.push("note");
    }
    if let Some(spec) = args.secret.as_deref() {
        key = key.with_secret(read_secret(spec)?);
        changed.push("key");
    }

    ctx.store.update(key.clone())?;
    let is_default = ctx
        .store
        .get_default()?
        .is_some_and(|default| default.name() == &name);
    tracing::info!(key = %name, fields = ?changed, "key updated");

    Ok(CommandOutput::notice(
        json!({
            "key": key_json(&key, is_default),
            "changed": changed,
        }),
        format!("Updated key '{name}' ({})", changed.join(", ")),
    ))
}
