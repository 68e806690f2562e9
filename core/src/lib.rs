//! motion-bench-core: Core data structures for benchmarking motion planners
//!
//! This crate provides the foundational types used across all motion-bench
//! components, including:
//!
//! - Request and trajectory data structures
//! - Core traits (Planner, PlanningScene, PlannerDiscovery)
//! - The planner registry and trial orchestration
//! - Trajectory quality metrics and trial records
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod request;
pub mod response;
pub mod results;
pub mod traits;
pub mod trajectory;
pub mod trial;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use error::*;
pub use metrics::*;
pub use orchestrator::{
    property_schema, CandidatePlan, Orchestrator, OrchestratorBuilder, ResultAggregator,
    TrialMatrix,
};
pub use registry::*;
pub use request::*;
pub use response::*;
pub use results::*;
pub use traits::*;
pub use trajectory::*;
pub use trial::{Trial, TrialState};
