use super::format::{menu_lines, parse_choice};
use super::{trivial_choice, KeySelector, Selection};
use crate::error::{AppError, AppResult};
use crate::vault::{KeyCollection, KeyName};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct FzfOptions {
    pub binary: String,
    pub height: String,
    pub border: bool,
    pub reverse: bool,
}

impl Default for FzfOptions {
    fn default() -> Self {
        Self {
            binary: "fzf".to_string(),
            height: "40%".to_string(),
            border: true,
            reverse: true,
        }
    }
}

/// Delegates the choice to an external fuzzy finder. Lines go in on stdin,
/// the chosen line comes back on stdout, and a non-zero exit means the user
/// backed out.
pub struct FzfSelector {
    options: FzfOptions,
}

impl FzfSelector {
    pub fn new(options: FzfOptions) -> Self {
        Self { options }
    }

    fn is_available(&self) -> bool {
        let binary = Path::new(&self.options.binary);
        if binary.components().count() > 1 {
            return binary.is_file();
        }
        which::which(&self.options.binary).is_ok()
    }

    fn args(&self, query: &str) -> Vec<String> {
        let mut args = vec![
            "--prompt=Select API key > ".to_string(),
            "--header=Up/Down: navigate | Enter: select | Esc: cancel".to_string(),
            format!("--height={}", self.options.height),
            "--ansi".to_string(),
            format!("--query={query}"),
        ];
        if self.options.border {
            args.push("--border".to_string());
        }
        if self.options.reverse {
            args.push("--reverse".to_string());
        }
        args
    }
}

impl KeySelector for FzfSelector {
    fn name(&self) -> &'static str {
        "fzf"
    }

    fn select(&self, keys: &KeyCollection, hint: Option<&KeyName>) -> AppResult<Selection> {
        if let Some(name) = trivial_choice(keys)? {
            return Ok(Selection::Chosen(name));
        }
        if !self.is_available() {
            return Ok(Selection::Unavailable(format!(
                "{} is not available",
                self.options.binary
            )));
        }

        let input = menu_lines(keys, hint).join("\n");
        let query = hint.map(KeyName::value).unwrap_or_default();

        let mut child = match Command::new(&self.options.binary)
            .args(self.args(query))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                return Ok(Selection::Unavailable(format!(
                    "failed to start {}: {err}",
                    self.options.binary
                )))
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // The picker may exit before reading everything (e.g. Esc); a
            // broken pipe here is reported through the exit status instead.
            if let Err(err) = stdin.write_all(input.as_bytes()) {
                tracing::debug!("writing selector input failed: {err}");
            }
        }

        let output = child.wait_with_output().map_err(|e| {
            AppError::internal(format!("failed to wait for {}: {e}", self.options.binary))
        })?;
        if !output.status.success() {
            tracing::debug!(status = ?output.status.code(), "external selector exited without a choice");
            return Err(AppError::selection_cancelled());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_choice(&stdout).map(Selection::Chosen)
    }
}
