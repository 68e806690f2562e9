//! Builder pattern for Orchestrator construction

use crate::config::OrchestratorConfig;
use crate::error::{BenchError, BenchResult};
use crate::registry::PlannerRegistry;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .registry(&registry)
///     .host("bench-01")
///     .show_progress(false)
///     .build()?;
/// ```
pub struct OrchestratorBuilder<'r> {
    config: OrchestratorConfig,
    registry: Option<&'r PlannerRegistry>,
}

impl<'r> OrchestratorBuilder<'r> {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: OrchestratorConfig::default(),
            registry: None,
        }
    }

    /// Set the full orchestrator configuration
    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the planner registry
    pub fn registry(mut self, registry: &'r PlannerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Enable or disable the progress bar
    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Override the host name written to the report
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is not set, or if configuration
    /// validation fails.
    pub fn build(self) -> BenchResult<Orchestrator<'r>> {
        let registry = self
            .registry
            .ok_or_else(|| BenchError::missing_config("registry"))?;

        self.config
            .validate()
            .map_err(|e| BenchError::config(e.to_string()))?;

        Ok(Orchestrator::new(self.config, registry))
    }
}

impl Default for OrchestratorBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
