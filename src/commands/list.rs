use super::{key_json, key_summary, AppContext};
use crate::error::AppResult;
use crate::output::CommandOutput;
use serde_json::json;

pub fn run(ctx: &AppContext) -> AppResult<CommandOutput> {
    let collection = ctx.store.get_all()?;
    let keys: Vec<_> = collection
        .get_all()
        .iter()
        .map(|key| key_json(key, collection.is_default(key.name())))
        .collect();
    let data = json!({
        "keys": keys,
        "default": collection.default_name(),
        "count": collection.len(),
    });

    if collection.is_empty() {
        return Ok(CommandOutput::new(
            data,
            "No API keys stored. Run 'keyswitch add <name>' to add one.",
        ));
    }

    let mut lines: Vec<String> = collection
        .get_all()
        .iter()
        .map(|key| {
            let marker = if collection.is_default(key.name()) {
                "*"
            } else {
                " "
            };
            format!("{marker} {}", key_summary(key))
        })
        .collect();
    lines.push(String::new());
    lines.push(match collection.default_name() {
        Some(name) => format!("{} key(s), default: {name}", collection.len()),
        None => format!("{} key(s), no default set", collection.len()),
    });
    Ok(CommandOutput::new(data, lines.join("\n")))
}
