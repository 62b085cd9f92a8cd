use super::AppContext;
use crate::cli::RemoveArgs;
use crate::error::{AppError, AppResult};
use crate::output::CommandOutput;
use crate::vault::KeyName;
use serde_json::json;

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn run(ctx: &AppContext, args: RemoveArgs) -> AppResult<CommandOutput> {
    let name = KeyName::create(&args.name)?;
    let collection = ctx.store.get_all()?;
    if collection.find(&name).is_none() {
        return Err(AppError::key_not_found(name.value()));
    }
    let was_default = collection.is_default(&name);

    if !args.yes {
        let question = if was_default {
            format!("Remove key '{name}'? It is the current default. [y/N]: ")
        } else {
            format!("Remove key '{name}'? [y/N]: ")
        };
        // Closed stdin counts as "no".
        let answer = ctx.prompt.ask(&question).unwrap_or_default();
        if !confirmed(&answer) {
            return Ok(CommandOutput::notice(
                json!({ "removed": false, "name": name }),
                "Cancelled",
            ));
        }
    }

    ctx.store.remove(&name)?;
    if ctx.cache.get_last_used().as_ref() == Some(&name) {
        if let Err(err) = ctx.cache.clear() {
            tracing::warn!(key = %name, "could not clear last used key: {err:#}");
        }
    }
    tracing::info!(key = %name, was_default, "key removed");

    let mut text = format!("Removed key '{name}'");
    if was_default {
        text.push_str("\nNo default key is set now; run 'keyswitch use <name>' to pick one");
    }
    Ok(CommandOutput::notice(
        json!({ "removed": true, "name": name, "wasDefault": was_default }),
        text,
    ))
}
