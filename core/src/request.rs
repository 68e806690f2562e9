//! Request types for benchmark operations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ConfigError;
use crate::trajectory::RobotState;

/// The planning problem every planner is benchmarked against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionPlanRequest {
    /// Joint group being planned for
    pub group_name: String,

    /// Algorithm id within the planner; set by the orchestrator per trial
    #[serde(default)]
    pub planner_id: String,

    /// Time budget for one solve, in seconds
    pub allowed_planning_time: f64,

    /// Number of attempts the planner may make internally
    #[serde(default = "default_planning_attempts")]
    pub num_planning_attempts: u32,

    /// Start state; joints not listed come from the scene's current state
    #[serde(default)]
    pub start_state: RobotState,

    /// Goal state in joint space
    #[serde(default)]
    pub goal_state: RobotState,

    /// Planner-specific parameters passed through untouched
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_planning_attempts() -> u32 {
    1
}

impl MotionPlanRequest {
    /// Create a request for a group with a time budget in seconds
    pub fn new(group_name: impl Into<String>, allowed_planning_time: f64) -> Self {
        Self {
            group_name: group_name.into(),
            allowed_planning_time,
            num_planning_attempts: default_planning_attempts(),
            ..Default::default()
        }
    }

    /// Set the goal state
    pub fn with_goal(mut self, goal: RobotState) -> Self {
        self.goal_state = goal;
        self
    }

    /// Set the start state
    pub fn with_start(mut self, start: RobotState) -> Self {
        self.start_state = start;
        self
    }

    /// Name an algorithm id may take when qualified by this request's group,
    /// e.g. `arm[RRTConnect]`
    pub fn qualified_algorithm(&self, algorithm: &str) -> String {
        format!("{}[{}]", self.group_name, algorithm)
    }
}

/// Changes applied to the planning scene before any trial runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningSceneDiff {
    /// Scene name; becomes the experiment name in the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Scene content, interpreted by the scene implementation
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub world: serde_json::Value,
}

impl PlanningSceneDiff {
    /// Create a diff that only renames the scene
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            world: serde_json::Value::Null,
        }
    }
}

/// Restricts a benchmark to one planner and, optionally, some of its algorithms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerRestriction {
    /// Planner id as reported by the registry
    pub name: String,

    /// Algorithm ids to run; empty means all declared ids
    #[serde(default)]
    pub planner_ids: Vec<String>,
}

impl PlannerRestriction {
    /// Restrict to a planner, running all its algorithms
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planner_ids: Vec::new(),
        }
    }

    /// Restrict to a planner and the given algorithms
    pub fn with_algorithms<I, S>(name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            planner_ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A complete benchmark request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkRequest {
    /// Problem every trial solves
    pub motion_plan_request: MotionPlanRequest,

    /// Scene changes applied before the first trial
    #[serde(default)]
    pub scene: PlanningSceneDiff,

    /// Planners to benchmark; empty means every loaded planner
    #[serde(default)]
    pub planner_interfaces: Vec<PlannerRestriction>,

    /// Repetitions per (planner, algorithm) pair
    #[serde(default = "default_average_count")]
    pub default_average_count: usize,

    /// Per-restriction repetition overrides, by index into `planner_interfaces`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub average_count: Vec<usize>,

    /// Report file name; generated from host and start time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

fn default_average_count() -> usize {
    1
}

impl BenchmarkRequest {
    /// Create a request for a problem with default settings
    pub fn new(motion_plan_request: MotionPlanRequest) -> Self {
        Self {
            motion_plan_request,
            default_average_count: default_average_count(),
            ..Default::default()
        }
    }

    /// Set the default repetition count
    pub fn with_average_count(mut self, count: usize) -> Self {
        self.default_average_count = count;
        self
    }

    /// Add a planner restriction without a repetition override
    pub fn with_planner(mut self, restriction: PlannerRestriction) -> Self {
        self.planner_interfaces.push(restriction);
        self
    }

    /// Add a planner restriction with its own repetition count
    ///
    /// Earlier restrictions without an override are padded with the default.
    pub fn with_planner_repeated(mut self, restriction: PlannerRestriction, count: usize) -> Self {
        let index = self.planner_interfaces.len();
        self.planner_interfaces.push(restriction);
        while self.average_count.len() < index {
            self.average_count.push(self.default_average_count);
        }
        self.average_count.push(count);
        self
    }

    /// Set the scene diff
    pub fn with_scene(mut self, scene: PlanningSceneDiff) -> Self {
        self.scene = scene;
        self
    }

    /// Set the output file name
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Repetition count for the restriction at `index`, never below 1
    pub fn repetitions_for(&self, index: Option<usize>) -> usize {
        let count = index
            .and_then(|i| self.average_count.get(i).copied())
            .unwrap_or(self.default_average_count);
        count.max(1)
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budget = self.motion_plan_request.allowed_planning_time;
        if !budget.is_finite() || budget < 0.0 {
            return Err(ConfigError::InvalidTimeBudget(format!(
                "allowed planning time must be a non-negative number of seconds, got {}",
                budget
            )));
        }

        if self.average_count.len() > self.planner_interfaces.len() {
            return Err(ConfigError::InvalidRepetitions(format!(
                "{} repetition overrides given for {} planner restrictions",
                self.average_count.len(),
                self.planner_interfaces.len()
            )));
        }

        Ok(())
    }
}
