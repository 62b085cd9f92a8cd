use super::{key_json, AppContext};
use crate::cli::AddArgs;
use crate::error::{AppError, AppResult};
use crate::io_utils::read_secret;
use crate::output::CommandOutput;
use crate::vault::{normalize_opt_string, ApiKey, BaseUrl, KeyName};
use serde_json::json;

pub fn run(ctx: &AppContext, args: AddArgs) -> AppResult<CommandOutput> {
    let name = KeyName::create(&args.name)?;
    let base_url = args.base_url.as_deref().map(BaseUrl::create).transpose()?;
    let note = normalize_opt_string(args.note);

    let collection = ctx.store.get_all()?;
    let exists = collection.find(&name).is_some();
    if exists && !args.overwrite {
        return Err(AppError::validation(format!(
            "key '{name}' already exists; pass --overwrite to replace it"
        ))
        .with_details(json!({ "name": name })));
    }

    // Ask for the secret only once the name is known to be usable.
    let secret = read_secret(args.secret.as_deref().unwrap_or("prompt"))?;
    let key = ApiKey::create(name.clone(), secret, base_url, note);

    if exists {
        ctx.store.update(key.clone())?;
    } else {
        ctx.store.add(key.clone())?;
    }
    let is_default = collection.is_empty() || collection.is_default(&name);
    tracing::info!(key = %name, replaced = exists, "key stored");

    let verb = if exists { "Replaced" } else { "Added" };
    let mut text = format!("{verb} key '{name}' ({})", key.masked_secret());
    if collection.is_empty() {
        text.push_str("\nSet as default (first key)");
    }
    Ok(CommandOutput::notice(
        json!({ "key": key_json(&key, is_default), "replaced": exists }),
        text,
    ))
}
