//! Candidate resolution and the trial matrix

use std::collections::HashSet;

use crate::registry::{PlannerHandle, PlannerRegistry};
use crate::request::{BenchmarkRequest, PlannerRestriction};

/// One planner that will be benchmarked, with its algorithms and repetitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePlan {
    /// Registry id
    pub planner_id: String,

    /// Planner description
    pub description: String,

    /// Algorithm ids in run order, as named in the request
    pub algorithms: Vec<String>,

    /// Repetitions per algorithm, at least 1
    pub repetitions: usize,
}

impl CandidatePlan {
    /// Number of trials this candidate contributes
    pub fn trial_count(&self) -> usize {
        self.algorithms.len() * self.repetitions
    }
}

/// Every (planner, algorithm, repetition) a benchmark will run, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialMatrix {
    candidates: Vec<CandidatePlan>,
}

impl TrialMatrix {
    /// Resolve the request against the loaded planners
    ///
    /// Unknown planner names and unknown algorithm ids are logged and dropped,
    /// as are planners whose capability probe declines the problem. An
    /// algorithm id listed more than once runs once. The result may be empty.
    pub fn resolve(registry: &PlannerRegistry, request: &BenchmarkRequest) -> Self {
        let restrictions = &request.planner_interfaces;

        for restriction in restrictions {
            if !registry.contains(&restriction.name) {
                tracing::error!(
                    planner = %restriction.name,
                    "Planning interface was not found"
                );
            }
        }

        let mut candidates = Vec::new();
        for handle in registry.iter() {
            let found = if restrictions.is_empty() {
                None
            } else {
                match restrictions.iter().position(|r| r.name == handle.id()) {
                    Some(index) => Some(index),
                    None => continue,
                }
            };

            if !handle.can_service(&request.motion_plan_request) {
                tracing::warn!(
                    planner = %handle.id(),
                    description = %handle.description(),
                    "Planning interface is not able to solve the specified benchmark problem"
                );
                continue;
            }

            let algorithms = match found.map(|i| &restrictions[i]) {
                Some(restriction) if !restriction.planner_ids.is_empty() => {
                    select_algorithms(handle, restriction, request)
                }
                _ => handle.algorithms(),
            };
            let algorithms = drop_duplicates(handle.id(), algorithms);

            candidates.push(CandidatePlan {
                planner_id: handle.id().to_string(),
                description: handle.description().to_string(),
                algorithms,
                repetitions: request.repetitions_for(found),
            });
        }

        Self { candidates }
    }

    /// Resolved candidates in execution order
    pub fn candidates(&self) -> &[CandidatePlan] {
        &self.candidates
    }

    /// Check if nothing is left to benchmark
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of (planner, algorithm) pairs
    pub fn group_count(&self) -> usize {
        self.candidates.iter().map(|c| c.algorithms.len()).sum()
    }

    /// Total number of trials
    pub fn total_runs(&self) -> usize {
        self.candidates.iter().map(CandidatePlan::trial_count).sum()
    }

    /// One line per candidate: `* <description> [ <ids> ]`
    pub fn describe(&self) -> String {
        self.candidates
            .iter()
            .map(|c| format!("  * {} [ {} ]", c.description, c.algorithms.join(" ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Keep the first occurrence of each algorithm id, so every group name is unique
fn drop_duplicates(planner: &str, algorithms: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    algorithms
        .into_iter()
        .filter(|algorithm| {
            let first = seen.insert(algorithm.clone());
            if !first {
                tracing::warn!(
                    planner = %planner,
                    algorithm = %algorithm,
                    "Algorithm requested more than once; running it once"
                );
            }
            first
        })
        .collect()
}

/// Keep the requested algorithm ids the planner declares, in request order
///
/// A requested id also matches a declared one when it is that id qualified by
/// the request's group, `<group>[<id>]`. The requested spelling is kept.
fn select_algorithms(
    handle: &PlannerHandle,
    restriction: &PlannerRestriction,
    request: &BenchmarkRequest,
) -> Vec<String> {
    let declared = handle.algorithms();
    let problem = &request.motion_plan_request;

    restriction
        .planner_ids
        .iter()
        .filter(|requested| {
            let known = declared
                .iter()
                .any(|d| d == *requested || problem.qualified_algorithm(d) == **requested);
            if !known {
                tracing::error!(
                    planner = %handle.id(),
                    algorithm = %requested,
                    "The planner id is not known to the planning interface"
                );
            }
            known
        })
        .cloned()
        .collect()
}
