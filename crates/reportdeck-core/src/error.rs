//! Error types and exit codes for reportdeck
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (IO, unavailable run-control service, bundle failures)
//! - 2: Usage error (bad flags/args, rejected report names)
//! - 3: Data error (missing report, malformed report, bad config)

mod macros;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for the reportdeck binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing or malformed report (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// A single report that could not be written into a static bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFailure {
    /// Source report the failure belongs to
    pub source: PathBuf,
    /// Rendered cause
    pub reason: String,
}

impl fmt::Display for BundleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.display(), self.reason)
    }
}

fn join_failures(failures: &[BundleFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur during reportdeck operations
#[derive(Error, Debug)]
pub enum DeckError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid report name: {name} ({reason})")]
    InvalidName { name: String, reason: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to {operation} {path:?}: {reason}")]
    IoAt {
        operation: String,
        path: PathBuf,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("run-control service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("{} report(s) failed to render: {}", failures.len(), join_failures(failures))]
    Bundle { failures: Vec<BundleFailure> },

    #[error("{0}")]
    Other(String),
}

impl DeckError {
    /// Create an error for a rejected report or run identifier
    pub fn invalid_name(name: impl fmt::Display, reason: impl fmt::Display) -> Self {
        DeckError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl fmt::Display) -> Self {
        DeckError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl fmt::Display) -> Self {
        DeckError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed IO operation on a specific path
    pub fn io_at(operation: &str, path: impl Into<PathBuf>, error: impl fmt::Display) -> Self {
        DeckError::IoAt {
            operation: operation.to_string(),
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Whether this error is the "file vanished" condition
    pub fn is_not_found(&self) -> bool {
        match self {
            DeckError::NotFound { .. } => true,
            DeckError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            DeckError::UsageError(_)
            | DeckError::InvalidName { .. }
            | DeckError::InvalidValue { .. } => ExitCode::Usage,

            DeckError::NotFound { .. } | DeckError::Parse { .. } | DeckError::Config { .. } => {
                ExitCode::Data
            }

            DeckError::Io(_)
            | DeckError::IoAt { .. }
            | DeckError::Json(_)
            | DeckError::ServiceUnavailable(_)
            | DeckError::Bundle { .. }
            | DeckError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            DeckError::UsageError(_) => "usage_error",
            DeckError::InvalidName { .. } => "invalid_name",
            DeckError::InvalidValue { .. } => "invalid_value",
            DeckError::NotFound { .. } => "not_found",
            DeckError::Parse { .. } => "parse_error",
            DeckError::Config { .. } => "config_error",
            DeckError::Io(_) | DeckError::IoAt { .. } => "io_error",
            DeckError::Json(_) => "json_error",
            DeckError::ServiceUnavailable(_) => "service_unavailable",
            DeckError::Bundle { .. } => "bundle_failed",
            DeckError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let DeckError::Bundle { failures } = self {
            error_obj["failures"] = failures
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "source": f.source.display().to_string(),
                        "reason": f.reason,
                    })
                })
                .collect();
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for reportdeck operations
pub type Result<T> = std::result::Result<T, DeckError>;
