//! Orchestrator configuration types

use serde::{Deserialize, Serialize};

/// Orchestrator configuration
///
/// Controls presentation of a benchmark run. What is benchmarked, and how
/// often, comes from the `BenchmarkRequest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Show a progress bar over the trial matrix
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// Host name written to the report; looked up from the OS when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

fn default_show_progress() -> bool {
    true
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            show_progress: default_show_progress(),
            host: None,
        }
    }
}

impl OrchestratorConfig {
    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Override the host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.host {
            if host.contains('\n') {
                return Err(ConfigError::InvalidHost(
                    "host name must be a single line".into(),
                ));
            }
        }
        Ok(())
    }

    /// Host name to record, empty when it cannot be determined
    pub fn resolve_host(&self) -> String {
        match &self.host {
            Some(host) => host.clone(),
            None => gethostname::gethostname()
                .into_string()
                .unwrap_or_default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid time budget
    #[error("Invalid time budget: {0}")]
    InvalidTimeBudget(String),

    /// Invalid repetition settings
    #[error("Invalid repetitions: {0}")]
    InvalidRepetitions(String),

    /// Invalid host override
    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert!(config.show_progress);
        assert!(config.host.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_host_override() {
        let config = OrchestratorConfig::default().with_host("bench-01");
        assert_eq!(config.resolve_host(), "bench-01");
    }

    #[test]
    fn test_multiline_host_rejected() {
        let config = OrchestratorConfig::default().with_host("a\nb");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_empty_json() {
        let config: OrchestratorConfig = serde_json::from_str("{}").unwrap();
        assert!(config.show_progress);
    }
}
