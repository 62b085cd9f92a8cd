use super::AppContext;
use crate::cli::RunArgs;
use crate::error::AppResult;
use crate::key_resolver::{resolve_key, EnvNames, ResolveRequest};
use crate::output::CommandOutput;
use serde_json::json;

/// Resolves a key and hands its environment to the configured command. The
/// launcher is only reached once resolution has fully succeeded.
pub fn run(ctx: &AppContext, args: RunArgs) -> AppResult<CommandOutput> {
    let request = ResolveRequest {
        key: args.key,
        use_default: args.use_default,
    };
    let names = EnvNames::with_prefix(ctx.config.env_prefix.clone());
    let resolved = resolve_key(&ctx.store, &ctx.cache, &ctx.selectors, &request, &names)?;

    let command = ctx.config.command.as_str();
    tracing::info!(
        key = %resolved.key.name(),
        source = resolved.source.as_str(),
        command,
        "launching with selected key"
    );
    ctx.launcher.launch(command, &args.args, &resolved.env)?;

    Ok(CommandOutput::silent(json!({
        "key": resolved.key.name(),
        "source": resolved.source.as_str(),
        "command": command,
    })))
}
