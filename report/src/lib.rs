//! Report generation for benchmark results
//!
//! This crate provides:
//!
//! - The line-oriented text report writer
//! - A reader that parses text reports back into cells
//! - Per-group summaries for offline comparison
//! - JSON export of reports and summaries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json_export;
pub mod reader;
pub mod summary;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use error::{ReportError, ReportResult};
pub use json_export::JsonExporter;
pub use reader::{ParsedGroup, ParsedReport, ReportReader};
pub use summary::{render_table, ColumnStats, ColumnSummary, GroupSummary, Percentiles};
pub use writer::{ReportWriter, DEFAULT_FILE_PREFIX, NO_NAME, UNKNOWN_HOST};
