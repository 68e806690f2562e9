//! Mock scene and planners shared by the unit tests

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::request::{MotionPlanRequest, PlanningSceneDiff};
use crate::traits::{Planner, PlannerError, PlanningScene};
use crate::trajectory::{DetailedPlan, KinematicModel, RobotState, TrajectorySegment};

// ============================================================================
// Mock Scene
// ============================================================================

/// Euclidean joint space; any joint beyond `limit` in magnitude is in collision
#[derive(Debug, Clone)]
pub struct GridScene {
    pub name: String,
    pub limit: f64,
    pub current: RobotState,
    pub diffs_applied: usize,
}

impl Default for GridScene {
    fn default() -> Self {
        Self::with_limit(100.0)
    }
}

impl GridScene {
    pub fn with_limit(limit: f64) -> Self {
        Self {
            name: String::new(),
            limit,
            current: RobotState::from_pairs([("x", 0.0), ("y", 0.0)]),
            diffs_applied: 0,
        }
    }
}

impl PlanningScene for GridScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_diff(&mut self, diff: &PlanningSceneDiff) {
        if let Some(name) = &diff.name {
            self.name = name.clone();
        }
        self.diffs_applied += 1;
    }

    fn current_state(&self) -> RobotState {
        self.current.clone()
    }

    fn check_collision_unpadded(&self, state: &RobotState) -> bool {
        state.iter().any(|(_, v)| v.abs() > self.limit)
    }

    fn distance_to_collision_unpadded(&self, state: &RobotState) -> f64 {
        let furthest = state.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        (self.limit - furthest).max(0.0)
    }

    fn distance(&self, a: &RobotState, b: &RobotState) -> f64 {
        let mut sum = 0.0;
        for (joint, va) in a.iter() {
            let vb = b.get(joint).unwrap_or(0.0);
            sum += (va - vb) * (va - vb);
        }
        for (joint, vb) in b.iter() {
            if a.get(joint).is_none() {
                sum += vb * vb;
            }
        }
        sum.sqrt()
    }
}

// ============================================================================
// Mock Planner
// ============================================================================

/// Planner that solves a fixed set of algorithms with an L-shaped path
pub struct ScriptedPlanner {
    description: String,
    algorithms: Vec<String>,
    solvable: HashSet<String>,
    accepts: bool,
    calls: Arc<Mutex<Vec<String>>>,
    solves: AtomicUsize,
}

impl ScriptedPlanner {
    pub fn new(description: &str, algorithms: &[&str]) -> Self {
        Self {
            description: description.to_string(),
            algorithms: algorithms.iter().map(|s| s.to_string()).collect(),
            solvable: HashSet::new(),
            accepts: true,
            calls: Arc::new(Mutex::new(Vec::new())),
            solves: AtomicUsize::new(0),
        }
    }

    /// Algorithms that produce a solution; all others fail
    pub fn solving(mut self, algorithms: &[&str]) -> Self {
        self.solvable = algorithms.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Make the capability probe decline every request
    pub fn declining(mut self) -> Self {
        self.accepts = false;
        self
    }

    /// Share a log of `<description>:<algorithm>` entries, one per solve call
    pub fn with_call_log(mut self, calls: Arc<Mutex<Vec<String>>>) -> Self {
        self.calls = calls;
        self
    }

    pub fn boxed(self) -> Box<dyn Planner> {
        Box::new(self)
    }
}

impl Planner for ScriptedPlanner {
    fn init(&mut self, _model: &KinematicModel) -> Result<(), PlannerError> {
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn planning_algorithms(&self) -> Vec<String> {
        self.algorithms.clone()
    }

    fn can_service_request(&self, _request: &MotionPlanRequest) -> bool {
        self.accepts
    }

    fn solve(
        &self,
        _scene: &dyn PlanningScene,
        request: &MotionPlanRequest,
    ) -> Result<DetailedPlan, PlannerError> {
        let attempt = self.solves.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}", self.description, request.planner_id));
        }

        let algorithm = request
            .planner_id
            .rsplit_once('[')
            .map(|(_, rest)| rest.trim_end_matches(']'))
            .unwrap_or(&request.planner_id);

        if !self.solvable.contains(algorithm) {
            return Err(PlannerError::NoSolution);
        }

        let offset = attempt as f64;
        let waypoints = vec![
            RobotState::from_pairs([("x", 0.0), ("y", 0.0)]),
            RobotState::from_pairs([("x", 1.0), ("y", 0.0)]),
            RobotState::from_pairs([("x", 1.0), ("y", 1.0 + offset)]),
        ];
        Ok(DetailedPlan::new(
            RobotState::new(),
            vec![TrajectorySegment::new(
                "plan",
                waypoints,
                Duration::from_micros(10),
            )],
        ))
    }
}
