use serde_json::{json, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    KeyNotFound,
    CorruptStore,
    SelectionCancelled,
    InvalidSelection,
    NoKeys,
    NoDefault,
    Launch,
    Internal,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<Value>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn key_not_found(name: &str) -> Self {
        Self::new(ErrorKind::KeyNotFound, format!("API key not found: {name}"))
            .with_details(json!({ "name": name }))
    }

    pub fn corrupt_store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptStore, message)
    }

    pub fn selection_cancelled() -> Self {
        Self::new(ErrorKind::SelectionCancelled, "selection cancelled")
    }

    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSelection, message)
    }

    pub fn no_keys() -> Self {
        Self::new(
            ErrorKind::NoKeys,
            "no API keys available; run 'keyswitch add <name>' first",
        )
    }

    pub fn no_default() -> Self {
        Self::new(
            ErrorKind::NoDefault,
            "no default key set; run 'keyswitch use <name>' first",
        )
    }

    pub fn launch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Launch, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::KeyNotFound => "KEY_NOT_FOUND",
            ErrorKind::CorruptStore => "CORRUPT_STORE",
            ErrorKind::SelectionCancelled => "SELECTION_CANCELLED",
            ErrorKind::InvalidSelection => "INVALID_SELECTION",
            ErrorKind::NoKeys => "NO_KEYS",
            ErrorKind::NoDefault => "NO_DEFAULT",
            ErrorKind::Launch => "LAUNCH_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::Internal => 1,
            ErrorKind::KeyNotFound => 2,
            ErrorKind::Validation => 3,
            ErrorKind::Launch => 4,
            ErrorKind::CorruptStore => 5,
            ErrorKind::SelectionCancelled => 6,
            ErrorKind::InvalidSelection => 7,
            ErrorKind::NoKeys => 8,
            ErrorKind::NoDefault => 9,
        }
    }

    /// Operational errors come from user input and are reported with a short
    /// message only. The rest point at the environment and are logged in full.
    pub fn is_operational(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::CorruptStore | ErrorKind::Launch | ErrorKind::Internal
        )
    }

    pub fn as_json(&self) -> Value {
        let mut error = json!({
            "code": self.code(),
            "message": self.message,
        });
        if let Some(details) = &self.details {
            error["details"] = details.clone();
        }
        json!({ "ok": false, "error": error })
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}
