//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a judge backend when it cannot produce a verdict.
///
/// A verdict that *describes* a failure (compile error, judge error text) is not a
/// `JudgeError`; it is a successful [`crate::Verdict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgeError {
    /// The judge could not be reached.
    #[error("{0}")]
    Transport(String),
    /// The judge refused the request.
    #[error("{0}")]
    Rejected(String),
    /// Failure without a message.
    #[error("unknown judge failure")]
    Unknown,
}

impl JudgeError {
    /// The error message, if the failure carried one.
    pub fn message(&self) -> Option<&str> {
        match self {
            JudgeError::Transport(message) | JudgeError::Rejected(message)
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// Submission failures surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    /// The ticket does not belong to the in-flight submission.
    #[error("submission ticket {0} is not the active submission")]
    StaleTicket(u64),
    /// The backend failed; carries the backend's own error unchanged.
    #[error(transparent)]
    Judge(#[from] JudgeError),
}

/// Edits refused by a text surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// No buffer at this index.
    #[error("no buffer at index {0}")]
    BufferNotFound(usize),
    /// The whole file is locked.
    #[error("{0} is locked")]
    Locked(String),
    /// The edit touches a read-only line (1-based in the message).
    #[error("line {line} of {filename} is read-only")]
    ReadOnlyLine {
        /// File name.
        filename: String,
        /// 1-based line number.
        line: usize,
    },
}

/// Configuration and contest definition loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// TOML parse error.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
