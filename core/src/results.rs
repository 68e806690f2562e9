//! Aggregated benchmark results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::metrics::{PropertyKey, TrialRecord};
use crate::trajectory::DetailedPlan;

/// Format used for the report start time: ISO 8601 extended, microseconds
pub const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Run metadata written at the top of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Experiment name; the scene name, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment: Option<String>,

    /// Host the benchmark ran on, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// When the first trial started
    pub start_time: DateTime<Utc>,

    /// Wall time spent running all trials
    pub total_duration: Duration,

    /// Per-solve time budget, seconds
    pub time_budget: f64,

    /// Number of (planner, algorithm) pairs benchmarked
    pub planner_count: usize,

    /// Textual echo of the problem that was benchmarked
    pub request_echo: String,
}

impl ReportMetadata {
    /// Start time in the report's timestamp format
    pub fn start_time_string(&self) -> String {
        self.start_time.format(START_TIME_FORMAT).to_string()
    }
}

/// All trials of one (planner, algorithm) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportGroup {
    /// Registry id of the planner
    pub planner_id: String,

    /// Planner description, used in the group name
    pub planner_description: String,

    /// Algorithm id
    pub algorithm: String,

    /// Column schema: union of the record keys, sorted by label
    pub properties: Vec<PropertyKey>,

    /// Records in repetition order
    pub runs: Vec<TrialRecord>,
}

impl ReportGroup {
    /// Group name, `<description>_<algorithm>`
    pub fn name(&self) -> String {
        format!("{}_{}", self.planner_description, self.algorithm)
    }

    /// Number of runs
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of solved runs
    pub fn solved_count(&self) -> usize {
        self.runs.iter().filter(|r| r.is_solved()).count()
    }
}

/// Aggregated results of one benchmark invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Run metadata
    pub metadata: ReportMetadata,

    /// Groups in planner -> algorithm execution order
    pub groups: Vec<ReportGroup>,
}

impl BenchmarkReport {
    /// Total number of trials across all groups
    pub fn total_runs(&self) -> usize {
        self.groups.iter().map(ReportGroup::run_count).sum()
    }

    /// Find a group by planner id and algorithm
    pub fn group(&self, planner_id: &str, algorithm: &str) -> Option<&ReportGroup> {
        self.groups
            .iter()
            .find(|g| g.planner_id == planner_id && g.algorithm == algorithm)
    }
}

/// First solution a tested planner produced, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSolution {
    /// Registry id of the planner
    pub planner_id: String,

    /// First solved trajectory across all its trials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_solution: Option<DetailedPlan>,
}

/// Everything an orchestrator run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRun {
    /// Aggregated report
    pub report: BenchmarkReport,

    /// One entry per tested planner, in execution order
    pub solutions: Vec<PlannerSolution>,
}

impl BenchmarkRun {
    /// Ids of the tested planners
    pub fn tested_planners(&self) -> Vec<String> {
        self.solutions.iter().map(|s| s.planner_id.clone()).collect()
    }
}
