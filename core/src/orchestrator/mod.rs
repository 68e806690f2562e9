//! Orchestrator for benchmark invocations
//!
//! The Orchestrator coordinates one complete benchmark:
//! - Resolving which planners and algorithms to test
//! - Building the trial matrix with per-planner repetition counts
//! - Running every trial in order against one shared scene
//! - Scoring each outcome and grouping the records for the report
//!
//! # Example
//!
//! ```ignore
//! use motion_bench_core::OrchestratorBuilder;
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .registry(&registry)
//!     .show_progress(false)
//!     .build()?;
//!
//! let run = orchestrator.run(&request, &mut scene)?;
//! println!("{} trials", run.report.total_runs());
//! ```

mod aggregator;
mod builder;
mod executor;
mod matrix;

pub use aggregator::{property_schema, ResultAggregator};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
pub use matrix::{CandidatePlan, TrialMatrix};
