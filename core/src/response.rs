//! Response types returned to benchmark callers

use serde::{Deserialize, Serialize};

use crate::results::{BenchmarkRun, PlannerSolution};

/// Classification of a failed benchmark invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request failed validation
    InvalidRequest,
    /// No planner was left to benchmark
    NoPlanners,
    /// The report file could not be written
    ReportWriteFailed,
    /// Any other failure
    Internal,
}

/// Overall status of a benchmark invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    /// Report written
    Success,
    /// No report written
    Error(ErrorKind),
}

impl ResponseStatus {
    /// Check if this status indicates success
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

/// Response to a benchmark request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResponse {
    /// Overall status
    pub status: ResponseStatus,

    /// Path of the written report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// First solution per tested planner, in execution order
    pub responses: Vec<PlannerSolution>,

    /// Error description for failed invocations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BenchmarkResponse {
    /// Successful response for a completed run written to `filename`
    pub fn success(run: BenchmarkRun, filename: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            filename: Some(filename.into()),
            responses: run.solutions,
            message: None,
        }
    }

    /// Failed response; no report was written
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error(kind),
            filename: None,
            responses: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Check if the response was successful
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the error kind if this is an error response
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.status {
            ResponseStatus::Error(kind) => Some(kind),
            ResponseStatus::Success => None,
        }
    }

    /// Names of the tested planners
    pub fn planner_interfaces(&self) -> Vec<&str> {
        self.responses.iter().map(|r| r.planner_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_response() {
        let response = BenchmarkResponse::failure(ErrorKind::NoPlanners, "nothing to run");
        assert!(!response.is_success());
        assert_eq!(response.error_kind(), Some(ErrorKind::NoPlanners));
        assert!(response.filename.is_none());
        assert!(response.responses.is_empty());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ResponseStatus::Error(ErrorKind::ReportWriteFailed)).unwrap();
        assert_eq!(json, "{\"Error\":\"report_write_failed\"}");
        let back: ResponseStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ResponseStatus::Error(ErrorKind::ReportWriteFailed));
    }
}
