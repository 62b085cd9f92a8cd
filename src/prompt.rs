use std::io::{BufRead, Write};

/// Line-based terminal interaction used by the builtin selector and by
/// confirmations.
pub trait Prompt: Send + Sync {
    /// Writes informational text (menus, banners).
    fn show(&self, text: &str);
    /// Prints `prompt` and reads one line, without the trailing newline.
    fn ask(&self, prompt: &str) -> std::io::Result<String>;
}

/// Reads from stdin and writes to stderr so stdout stays free for command
/// output.
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for TerminalPrompt {
    fn show(&self, text: &str) {
        eprintln!("{text}");
    }

    fn ask(&self, prompt: &str) -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no input",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Answers questions from a fixed script and records everything shown.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    answers: std::sync::Mutex<std::collections::VecDeque<String>>,
    shown: std::sync::Mutex<Vec<String>>,
    asked: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: std::sync::Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub(crate) fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }

    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn show(&self, text: &str) {
        self.shown.lock().unwrap().push(text.to_string());
    }

    fn ask(&self, prompt: &str) -> std::io::Result<String> {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.answers.lock().unwrap().pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted")
        })
    }
}
