//! Robot states and planned trajectories

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// A robot configuration, keyed by joint name
///
/// States may be partial. A partial state is completed by overlaying it on a
/// full one, which is how trajectory waypoints become complete states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RobotState {
    joints: BTreeMap<String, f64>,
}

impl RobotState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from `(joint, position)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            joints: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Set one joint position
    pub fn set(&mut self, joint: impl Into<String>, position: f64) {
        self.joints.insert(joint.into(), position);
    }

    /// Position of a joint, if present
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.joints.get(joint).copied()
    }

    /// Copy every joint of `other` over this state
    pub fn overlay(&mut self, other: &RobotState) {
        for (joint, position) in &other.joints {
            self.joints.insert(joint.clone(), *position);
        }
    }

    /// Iterate over `(joint, position)` in joint-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.joints.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of joints in this state
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Check if the state has no joints
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// One segment of a planned trajectory
///
/// Planners that post-process their output (shortcutting, smoothing, time
/// parameterization) report each stage as its own segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectorySegment {
    /// Short label for the stage that produced this segment, e.g. "plan"
    pub description: String,

    /// Waypoints in execution order
    pub waypoints: Vec<RobotState>,

    /// Time the planner spent producing this segment
    pub processing_time: Duration,
}

impl TrajectorySegment {
    /// Create a segment
    pub fn new(
        description: impl Into<String>,
        waypoints: Vec<RobotState>,
        processing_time: Duration,
    ) -> Self {
        Self {
            description: description.into(),
            waypoints,
            processing_time,
        }
    }
}

/// A solved plan, possibly split into several segments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedPlan {
    /// State the trajectory starts from
    pub trajectory_start: RobotState,

    /// Trajectory segments
    pub segments: Vec<TrajectorySegment>,
}

impl DetailedPlan {
    /// Create a plan from a start state and its segments
    pub fn new(trajectory_start: RobotState, segments: Vec<TrajectorySegment>) -> Self {
        Self {
            trajectory_start,
            segments,
        }
    }

    /// Sum of the per-segment processing times
    pub fn total_processing_time(&self) -> Duration {
        self.segments.iter().map(|s| s.processing_time).sum()
    }

    /// Expand one segment into complete robot states
    ///
    /// Each waypoint is laid over `base`, which has the trajectory start
    /// already applied.
    pub fn segment_states(&self, segment: &TrajectorySegment, base: &RobotState) -> Vec<RobotState> {
        let mut start = base.clone();
        start.overlay(&self.trajectory_start);

        segment
            .waypoints
            .iter()
            .map(|waypoint| {
                let mut state = start.clone();
                state.overlay(waypoint);
                state
            })
            .collect()
    }
}

/// Kinematic description of the robot that planners are initialized against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KinematicModel {
    /// Robot name
    pub name: String,

    /// All joints of the robot
    pub joint_names: Vec<String>,

    /// Named joint groups
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl KinematicModel {
    /// Create a model with the given joints and no groups
    pub fn new(name: impl Into<String>, joint_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            joint_names,
            groups: BTreeMap::new(),
        }
    }

    /// Add a named joint group
    pub fn with_group(mut self, name: impl Into<String>, joints: Vec<String>) -> Self {
        self.groups.insert(name.into(), joints);
        self
    }

    /// Check whether a group exists
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_replaces_and_extends() {
        let mut base = RobotState::from_pairs([("a", 0.0), ("b", 1.0)]);
        base.overlay(&RobotState::from_pairs([("b", 5.0), ("c", 2.0)]));

        assert_eq!(base.get("a"), Some(0.0));
        assert_eq!(base.get("b"), Some(5.0));
        assert_eq!(base.get("c"), Some(2.0));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn test_segment_states_apply_start_then_waypoint() {
        let plan = DetailedPlan::new(
            RobotState::from_pairs([("a", 1.0)]),
            vec![TrajectorySegment::new(
                "plan",
                vec![
                    RobotState::from_pairs([("b", 2.0)]),
                    RobotState::from_pairs([("a", 3.0), ("b", 4.0)]),
                ],
                Duration::from_millis(5),
            )],
        );
        let base = RobotState::from_pairs([("a", 0.0), ("b", 0.0), ("c", 9.0)]);

        let states = plan.segment_states(&plan.segments[0], &base);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].get("a"), Some(1.0));
        assert_eq!(states[0].get("b"), Some(2.0));
        assert_eq!(states[0].get("c"), Some(9.0));
        assert_eq!(states[1].get("a"), Some(3.0));
    }

    #[test]
    fn test_total_processing_time() {
        let plan = DetailedPlan::new(
            RobotState::new(),
            vec![
                TrajectorySegment::new("plan", vec![], Duration::from_millis(10)),
                TrajectorySegment::new("simplify", vec![], Duration::from_millis(5)),
            ],
        );
        assert_eq!(plan.total_processing_time(), Duration::from_millis(15));
    }

    #[test]
    fn test_robot_state_serializes_as_map() {
        let state = RobotState::from_pairs([("j1", 0.5)]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "{\"j1\":0.5}");
    }
}
