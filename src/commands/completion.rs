use crate::cli::{CompletionArgs, CompletionShell};
use crate::error::{AppError, AppResult};
use crate::output::CommandOutput;
use clap::CommandFactory;
use serde_json::json;

const BIN_NAME: &str = "keyswitch";

pub fn run(args: CompletionArgs) -> AppResult<CommandOutput> {
    let mut cmd = crate::cli::App::command();
    let mut buf = Vec::new();
    match args.shell {
        CompletionShell::Nushell => {
            clap_complete::generate(clap_complete_nushell::Nushell, &mut cmd, BIN_NAME, &mut buf);
        }
        other => {
            let shell = match other {
                CompletionShell::Bash => clap_complete::Shell::Bash,
                CompletionShell::Zsh => clap_complete::Shell::Zsh,
                CompletionShell::Fish => clap_complete::Shell::Fish,
                CompletionShell::Powershell => clap_complete::Shell::PowerShell,
                CompletionShell::Elvish => clap_complete::Shell::Elvish,
                CompletionShell::Nushell => unreachable!("handled above"),
            };
            clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
        }
    }
    let script = String::from_utf8(buf)
        .map_err(|e| AppError::internal(format!("completion script is not UTF-8: {e}")))?;
    let text = script.trim_end().to_string();
    Ok(CommandOutput::new(
        json!({ "shell": format!("{:?}", args.shell).to_lowercase(), "script": script }),
        text,
    ))
}
