use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "keyswitch")]
#[command(
    about = "Switch between named API keys and launch a CLI with the chosen one",
    long_about = None
)]
#[command(version)]
pub struct App {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable ANSI color output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Verbose diagnostics (no secrets)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Override the directory holding keys.json and the last-used marker.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to a JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Launch options used when no subcommand is given.
    #[command(flatten)]
    pub launch: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl App {
    /// The subcommand to run; a bare invocation launches with the top-level
    /// `--key`/`--use-default` and pass-through arguments.
    pub fn into_command(self) -> Result<Command, clap::Error> {
        match self.command {
            None => Ok(Command::Run(self.launch)),
            Some(command) if self.launch.is_empty() => Ok(command),
            Some(_) => Err(App::command().error(
                clap::error::ErrorKind::ArgumentConflict,
                "launch options cannot be combined with a subcommand",
            )),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored keys (secrets masked).
    #[command(visible_alias = "ls")]
    List,

    /// Store a new key.
    Add(AddArgs),

    /// Change the secret, base URL or note of a stored key.
    Edit(EditArgs),

    /// Delete a stored key.
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    /// Show the default key.
    Current,

    /// Make a key the default.
    Use(UseArgs),

    /// Resolve a key and launch the configured command with it.
    #[command(visible_alias = "launch")]
    Run(RunArgs),

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Key name (letters, digits, '-' and '_').
    pub name: String,

    /// Secret source: literal, prompt[:LABEL], '-' (stdin), @file, env:NAME.
    /// Prompts when omitted.
    #[arg(long)]
    pub secret: Option<String>,

    /// Base URL exported alongside the secret.
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub note: Option<String>,

    /// Replace an existing key with the same name.
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    pub name: String,

    /// New secret source (same forms as `add --secret`).
    #[arg(long)]
    pub secret: Option<String>,

    /// New base URL, or '-' to clear it.
    #[arg(long, allow_hyphen_values = true)]
    pub base_url: Option<String>,

    /// New note, or '-' to clear it.
    #[arg(long, allow_hyphen_values = true)]
    pub note: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RemoveArgs {
    pub name: String,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct UseArgs {
    pub name: String,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Use this key instead of asking.
    #[arg(long)]
    pub key: Option<String>,

    /// Use the default key instead of asking.
    #[arg(long)]
    pub use_default: bool,

    /// Arguments passed through to the launched command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl RunArgs {
    fn is_empty(&self) -> bool {
        self.key.is_none() && !self.use_default && self.args.is_empty()
    }
}

#[derive(Parser, Debug)]
pub struct CompletionArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CompletionShell {
    #[value(name = "bash")]
    Bash,
    #[value(name = "zsh")]
    Zsh,
    #[value(name = "fish")]
    Fish,
    #[value(name = "powershell")]
    Powershell,
    #[value(name = "elvish")]
    Elvish,
    #[value(name = "nushell")]
    Nushell,
}
