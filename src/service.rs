//! Benchmark request handling
//!
//! The service owns the loaded planners and the scene. Requests may arrive
//! concurrently; each benchmark holds the state lock on a blocking thread from
//! its first trial until its report is on disk.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use motion_bench_core::{
    BenchError, BenchmarkRequest, BenchmarkResponse, BenchmarkRun, ErrorKind, OrchestratorBuilder,
    OrchestratorConfig, PlannerInterfaceDescription, PlannerRegistry, PlanningScene,
};
use motion_bench_report::{ReportError, ReportWriter, DEFAULT_FILE_PREFIX};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix of generated report names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Orchestrator settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Set the report directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.file_prefix.is_empty() || self.file_prefix.contains(std::path::is_separator) {
            return Err(ServiceError::Config(format!(
                "file prefix must be a non-empty file name component, got '{}'",
                self.file_prefix
            )));
        }
        self.orchestrator
            .validate()
            .map_err(|e| ServiceError::Config(e.to_string()))
    }
}

/// Service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Invalid service configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Request failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Orchestration failed
    #[error(transparent)]
    Bench(#[from] BenchError),

    /// Report could not be written
    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),

    /// A previous benchmark panicked while holding the state
    #[error("service state is poisoned")]
    Poisoned,

    /// The blocking task could not be joined
    #[error("benchmark task failed: {0}")]
    Join(String),
}

impl ServiceError {
    /// Response error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidRequest(_) | ServiceError::Config(_) => ErrorKind::InvalidRequest,
            ServiceError::Bench(BenchError::NoCandidates) => ErrorKind::NoPlanners,
            ServiceError::Report(_) => ErrorKind::ReportWriteFailed,
            _ => ErrorKind::Internal,
        }
    }
}

struct ServiceState {
    registry: PlannerRegistry,
    scene: Box<dyn PlanningScene + Send>,
}

/// Answers planner queries and benchmark requests
#[derive(Clone)]
pub struct BenchmarkService {
    config: ServiceConfig,
    state: Arc<Mutex<ServiceState>>,
}

impl BenchmarkService {
    /// Create a service over loaded planners and a scene
    pub fn new(
        config: ServiceConfig,
        registry: PlannerRegistry,
        scene: Box<dyn PlanningScene + Send>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        tracing::info!(planners = registry.len(), output_dir = %config.output_dir.display(), "Benchmark service ready");
        Ok(Self {
            config,
            state: Arc::new(Mutex::new(ServiceState { registry, scene })),
        })
    }

    /// Get the service configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Every loaded planner with the algorithm ids it declares
    ///
    /// Waits for a running benchmark to release the state, off the async
    /// worker threads.
    pub async fn query_interfaces(
        &self,
    ) -> Result<Vec<PlannerInterfaceDescription>, ServiceError> {
        let state = Arc::clone(&self.state);

        tokio::task::spawn_blocking(move || {
            let state = state.lock().map_err(|_| ServiceError::Poisoned)?;
            Ok(state.registry.query())
        })
        .await
        .map_err(|e| ServiceError::Join(e.to_string()))?
    }

    /// Run a benchmark and write its report
    ///
    /// Never fails outright; problems are reported through the response
    /// status, and no file is written for a failed invocation.
    pub async fn compute_benchmark(&self, request: BenchmarkRequest) -> BenchmarkResponse {
        match self.try_compute(request).await {
            Ok((run, filename)) => BenchmarkResponse::success(run, filename),
            Err(e) => {
                tracing::error!(error = %e, "Benchmark failed");
                BenchmarkResponse::failure(e.kind(), e.to_string())
            }
        }
    }

    async fn try_compute(
        &self,
        request: BenchmarkRequest,
    ) -> Result<(BenchmarkRun, String), ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;

        let state = Arc::clone(&self.state);
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || run_blocking(&state, &config, &request))
            .await
            .map_err(|e| ServiceError::Join(e.to_string()))?
    }
}

fn run_blocking(
    state: &Mutex<ServiceState>,
    config: &ServiceConfig,
    request: &BenchmarkRequest,
) -> Result<(BenchmarkRun, String), ServiceError> {
    let mut guard = state.lock().map_err(|_| ServiceError::Poisoned)?;
    let state = &mut *guard;

    let orchestrator = OrchestratorBuilder::new()
        .registry(&state.registry)
        .config(config.orchestrator.clone())
        .build()?;
    let run = orchestrator.run(request, state.scene.as_mut())?;

    let filename = request
        .filename
        .clone()
        .unwrap_or_else(|| ReportWriter::default_filename(&config.file_prefix, &run.report.metadata));
    let path = config.output_dir.join(filename);
    ReportWriter::write_to_path(&run.report, &path)?;

    Ok((run, path.display().to_string()))
}

impl std::fmt::Debug for BenchmarkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
