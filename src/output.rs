use crate::error::AppError;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub quiet: bool,
    pub no_color: bool,
    pub verbose: bool,
}

/// What the text of a successful command is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// The answer the user asked for: a listing, the current key, a script.
    Report,
    /// Confirmation of a change to the store; `--quiet` hides it.
    Notice,
    /// The launched command already owned the terminal.
    Silent,
}

#[derive(Debug)]
pub struct CommandOutput {
    pub data: Value,
    pub text: String,
    pub kind: TextKind,
}

impl CommandOutput {
    pub fn new(data: Value, text: impl Into<String>) -> Self {
        Self {
            data,
            text: text.into(),
            kind: TextKind::Report,
        }
    }

    pub fn notice(data: Value, text: impl Into<String>) -> Self {
        Self {
            data,
            text: text.into(),
            kind: TextKind::Notice,
        }
    }

    pub fn silent(data: Value) -> Self {
        Self {
            data,
            text: String::new(),
            kind: TextKind::Silent,
        }
    }
}

const RED: &str = "\u{1b}[1;31m";
const RESET: &str = "\u{1b}[0m";

/// The stdout line for a success, if anything is printed at all.
pub fn render_ok(cfg: OutputConfig, output: &CommandOutput) -> Option<String> {
    match cfg.mode {
        OutputMode::Json => Some(json!({ "ok": true, "data": output.data }).to_string()),
        OutputMode::Text => match output.kind {
            TextKind::Silent => None,
            TextKind::Notice if cfg.quiet => None,
            _ if output.text.is_empty() => None,
            _ => Some(output.text.clone()),
        },
    }
}

/// Error body: JSON for stdout, or `error[CODE]: message` text for stderr.
pub fn render_err(cfg: OutputConfig, err: &AppError) -> String {
    if let OutputMode::Json = cfg.mode {
        return err.as_json().to_string();
    }
    let label = if cfg.verbose {
        format!("error[{}]", err.code())
    } else {
        "error".to_string()
    };
    let mut text = if cfg.no_color {
        format!("{label}: {}", err.message)
    } else {
        format!("{RED}{label}{RESET}: {}", err.message)
    };
    if cfg.verbose {
        if let Some(details) = &err.details {
            text.push_str(&format!("\n  details: {details}"));
        }
    }
    text
}

pub fn emit_ok(cfg: OutputConfig, output: CommandOutput) {
    if let Some(line) = render_ok(cfg, &output) {
        println!("{line}");
    }
}

pub fn emit_err(cfg: OutputConfig, err: AppError) {
    if err.is_operational() {
        tracing::debug!(code = err.code(), details = ?err.details, "command failed");
    } else {
        tracing::error!(code = err.code(), details = ?err.details, "{}", err.message);
    }

    let body = render_err(cfg, &err);
    match cfg.mode {
        OutputMode::Json => println!("{body}"),
        OutputMode::Text => eprintln!("{body}"),
    }
}
