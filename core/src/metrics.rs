//! Trajectory quality metrics and trial records
//!
//! Every trial is scored into a [`TrialRecord`]: an ordered map from property
//! name to a tagged value. Records are sparse. A solved trial
//! carries one set of `path_*` properties per trajectory segment, while an
//! unsolved one carries only timing and the `solved` flag, so the columns of a
//! report group are whatever its own records happen to contain.
//!
//! The scores themselves are computed against the planning scene:
//!
//! - **length**: sum of distances between consecutive states
//! - **correctness**: no state is in collision (unpadded)
//! - **clearance**: mean unpadded distance to the nearest collision
//! - **smoothness**: mean squared turning penalty over consecutive triples

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::time::Duration;

use crate::traits::PlanningScene;
use crate::trajectory::{DetailedPlan, RobotState};

/// Wall time of the whole solve call, seconds
pub const TOTAL_TIME: &str = "total_time";
/// Whether the planner reported a solution
pub const SOLVED: &str = "solved";
/// Wall time not accounted for by any segment, seconds
pub const PROCESS_TIME: &str = "process_time";

// ============================================================================
// Property values
// ============================================================================

/// Column type of a recorded property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Floating point value
    Real,
    /// Boolean flag
    Boolean,
    /// Free text
    Text,
}

impl PropertyKind {
    /// Type name used as the column label suffix
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Real => "REAL",
            PropertyKind::Boolean => "BOOLEAN",
            PropertyKind::Text => "VARCHAR(128)",
        }
    }

    /// Parse a type name back into a kind
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "REAL" => Some(PropertyKind::Real),
            "BOOLEAN" => Some(PropertyKind::Boolean),
            "VARCHAR(128)" => Some(PropertyKind::Text),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A recorded value together with its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Floating point value
    Real(f64),
    /// Boolean flag
    Boolean(bool),
    /// Free text
    Text(String),
}

impl PropertyValue {
    /// Type of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Real(_) => PropertyKind::Real,
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }

    /// Numeric value, if this is a real
    pub fn as_real(&self) -> Option<f64> {
        match self {
            PropertyValue::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Flag value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// Booleans render as `1`/`0` so report columns load directly as SQL booleans
impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Real(v) => write!(f, "{}", v),
            PropertyValue::Boolean(v) => f.write_str(if *v { "1" } else { "0" }),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

/// Report column: property name plus type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyKey {
    /// Property name
    pub name: String,
    /// Property type
    pub kind: PropertyKind,
}

impl PropertyKey {
    /// Create a key
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Column label, e.g. `total_time REAL`
    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.kind)
    }
}

// ============================================================================
// Trial record
// ============================================================================

/// Properties recorded for one trial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrialRecord {
    properties: BTreeMap<String, PropertyValue>,
}

impl TrialRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Set a real-valued property
    pub fn insert_real(&mut self, name: impl Into<String>, value: f64) {
        self.insert(name, PropertyValue::Real(value));
    }

    /// Set a boolean property
    pub fn insert_bool(&mut self, name: impl Into<String>, value: bool) {
        self.insert(name, PropertyValue::Boolean(value));
    }

    /// Look up a property
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Look up a real-valued property
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropertyValue::as_real)
    }

    /// Look up a boolean property
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    /// Whether the trial was solved; records without the flag count as unsolved
    pub fn is_solved(&self) -> bool {
        self.flag(SOLVED).unwrap_or(false)
    }

    /// Keys of all recorded properties, in name order
    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.properties
            .iter()
            .map(|(name, value)| PropertyKey::new(name.clone(), value.kind()))
    }

    /// Iterate over `(name, value)` in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of recorded properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Name of a per-segment property, e.g. `path_plan_length`
pub fn path_property(description: &str, metric: &str) -> String {
    format!("path_{}_{}", description, metric)
}

// ============================================================================
// Trajectory metrics
// ============================================================================

/// Quality scores for one trajectory segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetrics {
    /// Segment description
    pub description: String,
    /// Path length under the scene's distance
    pub length: f64,
    /// Mean distance to the nearest collision
    pub clearance: f64,
    /// Turning penalty
    pub smoothness: f64,
    /// No state is in collision
    pub correct: bool,
    /// Time the planner reported for this segment, seconds
    pub solve_time: f64,
}

/// Quality scores for a whole trajectory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryMetrics {
    /// Per-segment scores, in segment order
    pub segments: Vec<SegmentMetrics>,
    /// Wall time not attributed to any segment, seconds, never negative
    pub process_time: f64,
}

/// Scores trial outcomes against a planning scene
pub struct MetricsCollector<'a> {
    scene: &'a dyn PlanningScene,
}

impl<'a> MetricsCollector<'a> {
    /// Create a collector bound to the scene trials ran against
    pub fn new(scene: &'a dyn PlanningScene) -> Self {
        Self { scene }
    }

    /// Turn one trial outcome into a record
    ///
    /// `plan` is `None` for an unsolved trial; its record holds the wall time,
    /// `solved = false` and a zero residual time.
    pub fn collect(&self, plan: Option<&DetailedPlan>, total_time: Duration) -> TrialRecord {
        let mut record = TrialRecord::new();
        record.insert_real(TOTAL_TIME, total_time.as_secs_f64());
        record.insert_bool(SOLVED, plan.is_some());

        let Some(plan) = plan else {
            record.insert_real(PROCESS_TIME, 0.0);
            return record;
        };

        let metrics = self.measure(plan, total_time);
        for segment in &metrics.segments {
            let d = &segment.description;
            record.insert_bool(path_property(d, "correct"), segment.correct);
            record.insert_real(path_property(d, "length"), segment.length);
            record.insert_real(path_property(d, "clearance"), segment.clearance);
            record.insert_real(path_property(d, "smoothness"), segment.smoothness);
            record.insert_real(path_property(d, "time"), segment.solve_time);
        }
        record.insert_real(PROCESS_TIME, metrics.process_time);

        record
    }

    /// Score every segment of a solved plan
    pub fn measure(&self, plan: &DetailedPlan, total_time: Duration) -> TrajectoryMetrics {
        let base = self.scene.current_state();

        let segments = plan
            .segments
            .iter()
            .map(|segment| {
                let states = plan.segment_states(segment, &base);
                SegmentMetrics {
                    description: segment.description.clone(),
                    length: self.path_length(&states),
                    clearance: self.clearance(&states),
                    smoothness: self.smoothness(&states),
                    correct: self.is_collision_free(&states),
                    solve_time: segment.processing_time.as_secs_f64(),
                }
            })
            .collect();

        let segment_time: f64 = plan
            .segments
            .iter()
            .map(|s| s.processing_time.as_secs_f64())
            .sum();

        TrajectoryMetrics {
            segments,
            process_time: residual_time(total_time.as_secs_f64(), segment_time),
        }
    }

    /// Sum of distances between consecutive states
    pub fn path_length(&self, states: &[RobotState]) -> f64 {
        states
            .windows(2)
            .map(|pair| self.scene.distance(&pair[0], &pair[1]))
            .sum()
    }

    /// True when no state is in collision
    pub fn is_collision_free(&self, states: &[RobotState]) -> bool {
        !states
            .iter()
            .any(|s| self.scene.check_collision_unpadded(s))
    }

    /// Mean distance to the nearest collision; 0 for an empty path
    pub fn clearance(&self, states: &[RobotState]) -> f64 {
        if states.is_empty() {
            return 0.0;
        }
        let total: f64 = states
            .iter()
            .map(|s| self.scene.distance_to_collision_unpadded(s))
            .sum();
        total / states.len() as f64
    }

    /// Turning penalty of a path
    ///
    /// Each consecutive triple `(s0, s1, s2)` is treated as a triangle with
    /// sides `a = |s0 s1|`, `b = |s1 s2|` and `c = |s0 s2|`. The law of
    /// cosines gives the angle at `s1`; its supplement is the turn. Each turn
    /// contributes `(2 * turn)^2`, and the total is divided by the number of
    /// states. Triples whose cosine is not strictly inside `(-1, 1)`,
    /// including degenerate ones with a zero-length side, are skipped.
    pub fn smoothness(&self, states: &[RobotState]) -> f64 {
        if states.len() < 3 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut a = self.scene.distance(&states[0], &states[1]);
        for k in 2..states.len() {
            let b = self.scene.distance(&states[k - 1], &states[k]);
            let c = self.scene.distance(&states[k - 2], &states[k]);
            if let Some(turn) = turn_angle(a, b, c) {
                let u = 2.0 * turn;
                total += u * u;
            }
            a = b;
        }

        total / states.len() as f64
    }
}

impl std::fmt::Debug for MetricsCollector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("scene", &self.scene.name())
            .finish()
    }
}

/// Turn angle at the middle vertex of a triangle with sides `a`, `b`
/// adjacent to it and `c` opposite
///
/// `None` when the cosine falls outside the open interval `(-1, 1)`.
pub fn turn_angle(a: f64, b: f64, c: f64) -> Option<f64> {
    let cos = (a * a + b * b - c * c) / (2.0 * a * b);
    if cos > -1.0 && cos < 1.0 {
        Some(PI - cos.acos())
    } else {
        None
    }
}

/// Wall time left after the segment times, floored at zero
pub fn residual_time(total: f64, segments: f64) -> f64 {
    let residual = total - segments;
    if residual > 0.0 {
        residual
    } else {
        0.0
    }
}
