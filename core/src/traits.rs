//! Contracts for the collaborators the benchmark drives
//!
//! Planning algorithms, the scene model with its collision checker, and the
//! way planner implementations are discovered all live outside this crate.
//! These traits are the seams they plug into.

use std::time::Duration;

use crate::request::{MotionPlanRequest, PlanningSceneDiff};
use crate::trajectory::{DetailedPlan, KinematicModel, RobotState};

// ============================================================================
// Planning Scene
// ============================================================================

/// World model shared by all trials of a benchmark
///
/// One scene instance is reused for every trial of an invocation, and trials
/// run one after another. Implementations do not need to be thread-safe for
/// a single run.
pub trait PlanningScene {
    /// Scene name, empty if unnamed
    fn name(&self) -> &str;

    /// Apply a scene diff before benchmarking
    fn apply_diff(&mut self, diff: &PlanningSceneDiff);

    /// Current robot state; partial trajectory states are completed from it
    fn current_state(&self) -> RobotState;

    /// Whether a state collides, without collision padding
    fn check_collision_unpadded(&self, state: &RobotState) -> bool;

    /// Distance from a state to the nearest collision, without padding
    fn distance_to_collision_unpadded(&self, state: &RobotState) -> f64;

    /// Distance between two states
    fn distance(&self, a: &RobotState, b: &RobotState) -> f64;
}

// ============================================================================
// Planner
// ============================================================================

/// A motion planner implementation under benchmark
pub trait Planner: Send {
    /// Initialize against the robot's kinematic model
    fn init(&mut self, model: &KinematicModel) -> Result<(), PlannerError>;

    /// Human-readable description; prefixes report group names
    fn description(&self) -> &str;

    /// Algorithm ids this planner offers
    fn planning_algorithms(&self) -> Vec<String>;

    /// Capability probe checked before any trial is scheduled
    fn can_service_request(&self, request: &MotionPlanRequest) -> bool;

    /// Solve the request with the algorithm named in `request.planner_id`
    fn solve(
        &self,
        scene: &dyn PlanningScene,
        request: &MotionPlanRequest,
    ) -> Result<DetailedPlan, PlannerError>;
}

/// Planner-specific errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    /// No solution was found
    #[error("no solution found")]
    NoSolution,

    /// The time budget ran out
    #[error("planning timed out after {0:?}")]
    Timeout(Duration),

    /// The request cannot be handled by this planner
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The algorithm id is not offered by this planner
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Initialization against the kinematic model failed
    #[error("initialization failed: {0}")]
    Init(String),

    /// Any other planner failure
    #[error("planner failure: {0}")]
    Internal(String),
}

// ============================================================================
// Discovery
// ============================================================================

/// Source of planner implementations
pub trait PlannerDiscovery {
    /// Identifiers of every declared planner implementation
    fn declared_planners(&self) -> Result<Vec<String>, DiscoveryError>;

    /// Create an uninitialized instance of a declared planner
    fn create_instance(&self, id: &str) -> Result<Box<dyn Planner>, DiscoveryError>;
}

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// Discovery itself is not available
    #[error("planner discovery unavailable: {0}")]
    Unavailable(String),

    /// No implementation is declared under this id
    #[error("no planner declared as '{0}'")]
    NotDeclared(String),

    /// The factory failed to build an instance
    #[error("failed to create planner '{id}': {reason}")]
    Instantiation {
        /// Planner id
        id: String,
        /// Failure reason
        reason: String,
    },
}
