use crate::error::{AppError, AppResult};
use serde_json::json;
use std::collections::BTreeMap;
use std::process::Command;

/// Starts the downstream tool with the resolved credential in its
/// environment and waits for it to finish.
pub trait ProcessLauncher: Send + Sync {
    fn launch(&self, command: &str, args: &[String], env: &BTreeMap<String, String>)
        -> AppResult<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StdLauncher;

impl StdLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for StdLauncher {
    fn launch(
        &self,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> AppResult<()> {
        tracing::debug!(
            command,
            args = args.len(),
            vars = ?env.keys().collect::<Vec<_>>(),
            "launching"
        );

        let status = Command::new(command)
            .args(args)
            .envs(env)
            .status()
            .map_err(|err| {
                AppError::launch(format!("failed to start {command}: {err}"))
                    .with_details(json!({ "command": command }))
            })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(AppError::launch(format!(
                "{command} exited with code {code}"
            ))
            .with_details(json!({ "command": command, "code": code }))),
            // Terminated by a signal (e.g. Ctrl-C reaching the child); the user
            // ended the session, nothing failed on our side.
            None => {
                tracing::debug!(command, "child terminated by signal");
                Ok(())
            }
        }
    }
}

/// Records launches instead of spawning anything.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingLauncher {
    calls: std::sync::Mutex<Vec<(String, Vec<String>, BTreeMap<String, String>)>>,
    exit_code: Option<i32>,
}

#[cfg(test)]
impl RecordingLauncher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<String>, BTreeMap<String, String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ProcessLauncher for RecordingLauncher {
    fn launch(
        &self,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec(), env.clone()));
        match self.exit_code {
            Some(code) => Err(AppError::launch(format!("{command} exited with code {code}"))
                .with_details(json!({ "command": command, "code": code }))),
            None => Ok(()),
        }
    }
}
