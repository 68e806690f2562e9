//! motion-bench: benchmark interchangeable motion planners on one problem
//!
//! The core crate runs trials and scores trajectories, the report crate
//! writes and reads the text report; this crate wires them into a service and
//! a command line tool.

pub mod cli;
pub mod service;

pub use service::{BenchmarkService, ServiceConfig, ServiceError};
