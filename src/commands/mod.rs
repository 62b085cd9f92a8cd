pub mod add;
pub mod completion;
pub mod current;
pub mod edit;
pub mod list;
pub mod remove;
pub mod run;
pub mod use_key;

use crate::cli::Command;
use crate::config::{AppConfig, SelectorKind, StorePaths};
use crate::error::AppResult;
use crate::launcher::{ProcessLauncher, StdLauncher};
use crate::output::{emit_err, emit_ok, CommandOutput, OutputConfig};
use crate::prompt::{Prompt, TerminalPrompt};
use crate::selector::{BuiltinSelector, FzfSelector, KeySelector, SelectorChain};
use crate::vault::{
    display_timestamp, format_timestamp, ApiKey, FileSystem, KeyStore, LastUsedCache, OsFileSystem,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub store: KeyStore,
    pub cache: LastUsedCache,
    pub selectors: SelectorChain,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub prompt: Arc<dyn Prompt>,
    pub config: AppConfig,
}

impl AppContext {
    pub fn new(config: AppConfig, paths: StorePaths) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());
        let prompt: Arc<dyn Prompt> = Arc::new(TerminalPrompt::new());
        Self {
            store: KeyStore::new(fs.clone(), paths.keys),
            cache: LastUsedCache::new(fs, paths.last_used),
            selectors: selector_chain(&config, prompt.clone()),
            launcher: Arc::new(StdLauncher::new()),
            prompt,
            config,
        }
    }
}

/// The external picker first (unless disabled), then the numbered menu.
pub fn selector_chain(config: &AppConfig, prompt: Arc<dyn Prompt>) -> SelectorChain {
    let mut selectors: Vec<Box<dyn KeySelector>> = Vec::new();
    if config.selector.kind == SelectorKind::Fzf {
        selectors.push(Box::new(FzfSelector::new(config.selector.fzf_options())));
    }
    selectors.push(Box::new(BuiltinSelector::new(prompt)));
    SelectorChain::new(selectors)
}

pub fn execute(ctx: &AppContext, command: Command) -> AppResult<CommandOutput> {
    match command {
        Command::Run(args) => run::run(ctx, args),
        Command::List => list::run(ctx),
        Command::Add(args) => add::run(ctx, args),
        Command::Edit(args) => edit::run(ctx, args),
        Command::Remove(args) => remove::run(ctx, args),
        Command::Current => current::run(ctx),
        Command::Use(args) => use_key::run(ctx, args),
        Command::Completion(args) => completion::run(args),
    }
}

/// Runs a command and renders its result; returns the process exit code.
pub fn dispatch(ctx: &AppContext, command: Command, cfg: OutputConfig) -> i32 {
    match execute(ctx, command) {
        Ok(out) => {
            emit_ok(cfg, out);
            0
        }
        Err(err) => {
            let code = err.exit_code();
            emit_err(cfg, err);
            code
        }
    }
}

pub(crate) fn key_json(key: &ApiKey, is_default: bool) -> Value {
    json!({
        "name": key.name(),
        "maskedKey": key.masked_secret(),
        "baseUrl": key.base_url().map(|url| url.value()),
        "note": key.note(),
        "createdAt": format_timestamp(key.created_at()),
        "isDefault": is_default,
    })
}

pub(crate) fn key_summary(key: &ApiKey) -> String {
    format!(
        "{}  {}  base_url={} note={} created={}",
        key.name(),
        key.masked_secret(),
        key.base_url().map(|url| url.value()).unwrap_or("-"),
        key.note().unwrap_or("-"),
        display_timestamp(key.created_at())
    )
}
