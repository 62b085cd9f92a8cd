use crate::error::{AppError, AppResult};
use std::io::IsTerminal;
use std::io::{Read, Write};

fn prompt_label(spec: &str) -> Option<&str> {
    if spec == "prompt" {
        Some("")
    } else {
        spec.strip_prefix("prompt:")
    }
}

fn read_prompt_value(prompt: &str) -> std::io::Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    rpassword::read_password()
}

/// Reads a secret from a literal, `prompt[:LABEL]`, `-` (stdin), `@file`
/// or `env:NAME`.
pub fn read_input(spec: &str) -> AppResult<String> {
    if let Some(label) = prompt_label(spec) {
        if !std::io::stdin().is_terminal() {
            return Err(AppError::validation(
                "prompt input requires a TTY; use '-', '@file', or env:NAME".to_string(),
            ));
        }
        let prompt = if label.trim().is_empty() {
            "Enter API key: "
        } else {
            label
        };
        let value = read_prompt_value(prompt)
            .map_err(|e| AppError::validation(format!("failed to read prompt: {e}")))?;
        return Ok(value.trim().to_string());
    }
    if spec == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::validation(format!("failed to read stdin: {e}")))?;
        return Ok(buf.trim().to_string());
    }
    if let Some(rest) = spec.strip_prefix('@') {
        let data = std::fs::read_to_string(rest)
            .map_err(|e| AppError::validation(format!("failed to read file {rest}: {e}")))?;
        return Ok(data.trim().to_string());
    }
    if let Some(env) = spec.strip_prefix("env:") {
        return std::env::var(env)
            .map(|value| value.trim().to_string())
            .map_err(|_| AppError::validation(format!("env var {env} not set")));
    }
    Ok(spec.trim().to_string())
}

/// Like `read_input`, but an empty result is a validation error.
pub fn read_secret(spec: &str) -> AppResult<String> {
    let value = read_input(spec)?;
    if value.is_empty() {
        return Err(AppError::validation("API key cannot be empty"));
    }
    Ok(value)
}
