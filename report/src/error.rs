//! Error types for motion-bench-report

use thiserror::Error;

/// Report error type
#[derive(Error, Debug)]
pub enum ReportError {
    /// The text report does not follow the expected layout
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// The report ended before a section was complete
    #[error("unexpected end of report: expected {0}")]
    UnexpectedEof(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Create a parse error at a line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias using ReportError
pub type ReportResult<T> = Result<T, ReportError>;
