use std::path::PathBuf;

use thiserror::Error;

/// Message carried by the application error that replaces a masked
/// unexpected failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Error in getting eligible customers list";

/// Failures this crate names and raises itself
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configurations provided: {0}")]
    InvalidConfiguration(String),

    #[error("The provided file is not present at {}.", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Error in reading customer data at line {line}")]
    StrictIngestion { line: usize },

    #[error("Error in processing customer {name}")]
    RecordProcessing { user_id: i64, name: String },

    #[error("{0}")]
    Generic(String),
}

/// Fault found while evaluating a single customer record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("field `{field}` is missing")]
    MissingField { field: &'static str },

    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },
}

/// Anything that is not an [`AppError`]
#[derive(Debug, Error)]
pub enum UnexpectedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid customer record: {0}")]
    Record(#[from] RecordError),
}

/// Whether unexpected errors reach the caller verbatim
///
/// Fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPosture {
    /// Unexpected errors are logged and replaced by an application error
    #[default]
    Production,
    /// Unexpected errors are surfaced unchanged
    Debug,
}

impl ErrorPosture {
    pub fn from_show_unhandled(show_unhandled_errors: bool) -> Self {
        if show_unhandled_errors {
            Self::Debug
        } else {
            Self::Production
        }
    }

    pub fn surfaces_unexpected(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Error returned by a pipeline run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Application(#[from] AppError),

    #[error(transparent)]
    Unexpected(#[from] UnexpectedError),
}

impl Error {
    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Apply the propagation rule for this error
    ///
    /// Application errors pass through untouched so the most specific
    /// context wins. Unexpected errors pass through in debug posture;
    /// in production posture they are logged and replaced by `wrap()`.
    pub fn classify<F>(self, posture: ErrorPosture, wrap: F) -> Self
    where
        F: FnOnce() -> AppError,
    {
        match self {
            Self::Application(_) => self,
            Self::Unexpected(_) if posture.surfaces_unexpected() => self,
            Self::Unexpected(cause) => {
                let replacement = wrap();
                tracing::error!(error = %cause, "{}", replacement);
                Self::Application(replacement)
            }
        }
    }

    /// [`Error::classify`] with the generic top-level message
    pub fn classify_generic(self, posture: ErrorPosture) -> Self {
        self.classify(posture, || {
            AppError::Generic(GENERIC_FAILURE_MESSAGE.to_string())
        })
    }
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        Self::Unexpected(UnexpectedError::Record(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Unexpected(UnexpectedError::Io(err))
    }
}
