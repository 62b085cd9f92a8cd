use super::AppContext;
use crate::cli::UseArgs;
use crate::error::AppResult;
use crate::output::CommandOutput;
use crate::vault::KeyName;
use serde_json::json;

pub fn run(ctx: &AppContext, args: UseArgs) -> AppResult<CommandOutput> {
    let name = KeyName::create(&args.name)?;
    ctx.store.set_default(&name)?;
    tracing::info!(key = %name, "default key changed");
    Ok(CommandOutput::notice(
        json!({ "default": name }),
        format!("Default key set to '{name}'"),
    ))
}
