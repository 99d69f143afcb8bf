use std::borrow::Cow;
use std::fmt::{self, Display};

use serde::Serialize;

/// The kind of error that occurred.
///
/// The set is closed, so callers can branch on it exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The input provided to the tool was invalid.
    InvalidInput,
    /// A required configuration value is missing or malformed.
    Configuration,
    /// The external program could not be found or refused to start.
    ToolUnavailable,
    /// The external program ran but exited with a failure.
    ExecutionFailure,
    /// The remote resource does not exist.
    NotFound,
    /// The remote resource already exists.
    AlreadyExists,
    /// The network or the client library failed.
    Transport,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "Invalid input"),
            ErrorKind::Configuration => write!(f, "Configuration error"),
            ErrorKind::ToolUnavailable => write!(f, "Tool unavailable"),
            ErrorKind::ExecutionFailure => write!(f, "Execution failure"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::AlreadyExists => write!(f, "Already exists"),
            ErrorKind::Transport => write!(f, "Transport error"),
        }
    }
}

/// Describes a tool call error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
    exit_code: Option<i32>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            reason: None,
            exit_code: None,
        }
    }

    /// Creates a new error with the `InvalidInput` kind.
    #[inline]
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new error with the `Configuration` kind.
    #[inline]
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new error with the `ToolUnavailable` kind.
    #[inline]
    pub fn tool_unavailable() -> Self {
        Self::new(ErrorKind::ToolUnavailable)
    }

    /// Creates a new error with the `ExecutionFailure` kind.
    #[inline]
    pub fn execution_failure() -> Self {
        Self::new(ErrorKind::ExecutionFailure)
    }

    /// Creates a new error with the `NotFound` kind.
    #[inline]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new error with the `AlreadyExists` kind.
    #[inline]
    pub fn already_exists() -> Self {
        Self::new(ErrorKind::AlreadyExists)
    }

    /// Creates a new error with the `Transport` kind.
    #[inline]
    pub fn transport() -> Self {
        Self::new(ErrorKind::Transport)
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            reason: Some(reason.into()),
            ..self
        }
    }

    /// Attaches the exit code of a failed process.
    #[inline]
    pub fn with_exit_code(self, exit_code: i32) -> Self {
        Self {
            exit_code: Some(exit_code),
            ..self
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the exit code, if the error came from a finished process.
    #[inline]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {reason}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_defaults_to_kind() {
        let err = Error::not_found();
        assert_eq!(err.reason(), "Not found");

        let err = Error::not_found().with_reason("Index 'books' does not exist.");
        assert_eq!(err.reason(), "Index 'books' does not exist.");
        assert_eq!(err.to_string(), "Not found: Index 'books' does not exist.");
    }

    #[test]
    fn test_exit_code_survives_reason() {
        let err = Error::execution_failure()
            .with_exit_code(2)
            .with_reason("boom");
        assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
        assert_eq!(err.exit_code(), Some(2));
    }
}
