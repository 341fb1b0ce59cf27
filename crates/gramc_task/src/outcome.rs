use std::fmt::{Display, Formatter};

/// Terminal result of a single task. Produced exactly once per task by the
/// completion of that task's action.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    Success,
    Failure { error: TaskError },
}

#[derive(Debug, Clone, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TaskError {
    #[error("{message}")]
    Message { message: String },
    #[error("exited with code {code}")]
    ExitStatus { code: i32 },
    #[error("timed out")]
    TimedOut,
}

impl Outcome {
    pub fn success() -> Self {
        Self::Success
    }
    pub fn failed(error: TaskError) -> Self {
        Self::Failure { error }
    }
    pub fn failed_message(message: impl Into<String>) -> Self {
        Self::Failure {
            error: TaskError::Message {
                message: message.into(),
            },
        }
    }
    pub fn failed_code(code: i32) -> Self {
        Self::Failure {
            error: TaskError::ExitStatus { code },
        }
    }
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success)
    }
    /// Human-readable failure reason, when this outcome is a failure.
    pub fn reason(&self) -> Option<String> {
        match self {
            Outcome::Success => None,
            Outcome::Failure { error } => Some(error.to_string()),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "✅"),
            Outcome::Failure { error } => write!(f, "❌ {error}"),
        }
    }
}
