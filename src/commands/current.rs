use super::{key_json, key_summary, AppContext};
use crate::error::AppResult;
use crate::output::CommandOutput;
use serde_json::json;

/// A missing default is reported, not treated as a failure.
pub fn run(ctx: &AppContext) -> AppResult<CommandOutput> {
    match ctx.store.get_default()? {
        Some(key) => Ok(CommandOutput::new(
            json!({ "default": key_json(&key, true) }),
            format!("Current default: {}", key_summary(&key)),
        )),
        None => Ok(CommandOutput::new(
            json!({ "default": null }),
            "No default key set. Run 'keyswitch use <name>' to choose one.",
        )),
    }
}
