//! Error types for motion-bench-core

use thiserror::Error;

use crate::trial::TrialState;

/// Core error type
#[derive(Error, Debug)]
pub enum BenchError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A required builder input was never provided
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// No planner survived candidate resolution
    #[error("there are no planning interfaces to benchmark")]
    NoCandidates,

    /// Orchestration failure not tied to a single trial
    #[error("orchestration error: {0}")]
    Orchestration(String),

    /// A trial was driven through an invalid state change
    #[error("invalid trial transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// State the trial was in
        from: TrialState,
        /// State that was requested
        to: TrialState,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        BenchError::Config(msg.into())
    }

    /// Create a missing-configuration error
    pub fn missing_config(what: impl Into<String>) -> Self {
        BenchError::MissingConfig(what.into())
    }

    /// Create an orchestration error
    pub fn orchestration(msg: impl Into<String>) -> Self {
        BenchError::Orchestration(msg.into())
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
