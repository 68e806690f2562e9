//! Orchestrator execution logic

use std::time::Instant;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::OrchestratorConfig;
use crate::error::{BenchError, BenchResult};
use crate::metrics::MetricsCollector;
use crate::registry::PlannerRegistry;
use crate::request::BenchmarkRequest;
use crate::results::{BenchmarkReport, BenchmarkRun, PlannerSolution, ReportMetadata};
use crate::traits::PlanningScene;
use crate::trial::Trial;

use super::aggregator::ResultAggregator;
use super::matrix::TrialMatrix;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Orchestrator manages one benchmark invocation
///
/// Responsible for resolving candidates, running every trial in order, and
/// collecting the scored records into a report.
pub struct Orchestrator<'r> {
    /// Orchestrator configuration
    pub(crate) config: OrchestratorConfig,

    /// Loaded planners
    pub(crate) registry: &'r PlannerRegistry,
}

impl<'r> Orchestrator<'r> {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a more ergonomic construction.
    pub fn new(config: OrchestratorConfig, registry: &'r PlannerRegistry) -> Self {
        Self { config, registry }
    }

    /// Get the orchestrator configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run the benchmark
    ///
    /// Trials run one at a time, planner by planner in id order, then
    /// algorithm by algorithm in the resolved order. The scene diff is
    /// applied once before the first trial.
    ///
    /// # Errors
    ///
    /// Returns `BenchError::NoCandidates` when no planner is left after
    /// resolution; no trial runs in that case.
    pub fn run(
        &self,
        request: &BenchmarkRequest,
        scene: &mut dyn PlanningScene,
    ) -> BenchResult<BenchmarkRun> {
        let matrix = TrialMatrix::resolve(self.registry, request);
        if matrix.is_empty() {
            tracing::error!("There are no planning interfaces to benchmark");
            return Err(BenchError::NoCandidates);
        }

        tracing::info!(
            "Benchmarking planning interfaces:\n{}",
            matrix.describe()
        );

        scene.apply_diff(&request.scene);
        let scene: &dyn PlanningScene = scene;

        let request_echo = serde_json::to_string_pretty(&request.motion_plan_request)?;
        let progress = self.progress_bar(matrix.total_runs());
        let collector = MetricsCollector::new(scene);
        let mut aggregator = ResultAggregator::new();
        let mut solutions = Vec::with_capacity(matrix.candidates().len());

        let start_time = Utc::now();
        let start = Instant::now();

        for candidate in matrix.candidates() {
            let handle = self.registry.get(&candidate.planner_id).ok_or_else(|| {
                BenchError::orchestration(format!(
                    "planner '{}' disappeared from the registry",
                    candidate.planner_id
                ))
            })?;

            let mut solution = PlannerSolution {
                planner_id: candidate.planner_id.clone(),
                first_solution: None,
            };
            let mut problem = request.motion_plan_request.clone();

            for algorithm in &candidate.algorithms {
                problem.planner_id = algorithm.clone();

                for repetition in 0..candidate.repetitions {
                    let mut trial = Trial::new(&candidate.planner_id, algorithm, repetition);
                    trial.start()?;
                    let outcome = handle.planner().solve(scene, &problem);
                    let total_time = trial.finish(outcome.is_ok())?;

                    if let Err(e) = &outcome {
                        tracing::debug!(
                            planner = %candidate.planner_id,
                            algorithm = %algorithm,
                            repetition,
                            error = %e,
                            "Trial did not produce a plan"
                        );
                    }

                    let record = collector.collect(outcome.as_ref().ok(), total_time);
                    trial.record()?;
                    aggregator.push(&candidate.planner_id, &candidate.description, algorithm, record);

                    if solution.first_solution.is_none() {
                        solution.first_solution = outcome.ok();
                    }
                    progress.inc(1);
                }
            }

            solutions.push(solution);
        }

        let total_duration = start.elapsed();
        progress.finish_with_message("Benchmark complete");

        let groups = aggregator.finish();
        let host = self.config.resolve_host();
        let metadata = ReportMetadata {
            experiment: Some(scene.name().to_string()).filter(|n| !n.is_empty()),
            host: Some(host).filter(|h| !h.is_empty()),
            start_time,
            total_duration,
            time_budget: request.motion_plan_request.allowed_planning_time,
            planner_count: matrix.group_count(),
            request_echo,
        };

        tracing::info!(
            elapsed_secs = total_duration.as_secs_f64(),
            groups = groups.len(),
            runs = matrix.total_runs(),
            "Benchmark completed"
        );

        Ok(BenchmarkRun {
            report: BenchmarkReport { metadata, groups },
            solutions,
        })
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::warn!(error = %e, "Invalid progress template"),
        }
        pb
    }
}

impl std::fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("planners", &self.registry.len())
            .finish()
    }
}
