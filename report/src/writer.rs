//! Text report writer
//!
//! One file per invocation: a metadata header followed by one section per
//! (planner, algorithm) group. Every row has one cell per column of its own
//! group, each cell followed by `"; "`; a missing value leaves the cell empty.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use motion_bench_core::{BenchmarkReport, ReportGroup, ReportMetadata};

use crate::error::ReportResult;

/// Prefix of generated report file names
pub const DEFAULT_FILE_PREFIX: &str = "motion_benchmarks";

/// Experiment name written when the scene has none
pub const NO_NAME: &str = "NO_NAME";

/// Host name written when the host is unknown
pub const UNKNOWN_HOST: &str = "UNKNOWN";

/// Writes a `BenchmarkReport` in the line-oriented text layout
pub struct ReportWriter;

impl ReportWriter {
    /// Render the full report into `out`
    pub fn render<W: Write>(report: &BenchmarkReport, out: &mut W) -> ReportResult<()> {
        Self::render_header(&report.metadata, out)?;
        for group in &report.groups {
            Self::render_group(group, out)?;
        }
        Ok(())
    }

    /// Render the full report into a string
    pub fn render_to_string(report: &BenchmarkReport) -> ReportResult<String> {
        let mut buf = Vec::new();
        Self::render(report, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the report to `path` in one pass
    pub fn write_to_path(report: &BenchmarkReport, path: &Path) -> ReportResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        Self::render(report, &mut out)?;
        out.flush()?;

        tracing::info!(path = %path.display(), groups = report.groups.len(), "Results saved");
        Ok(())
    }

    /// `<prefix>_<host>_<start time>.log`
    pub fn default_filename(prefix: &str, metadata: &ReportMetadata) -> String {
        format!(
            "{}_{}_{}.log",
            prefix,
            metadata.host.as_deref().unwrap_or_default(),
            metadata.start_time_string()
        )
    }

    fn render_header<W: Write>(metadata: &ReportMetadata, out: &mut W) -> ReportResult<()> {
        writeln!(out, "Experiment {}", metadata.experiment.as_deref().unwrap_or(NO_NAME))?;
        writeln!(out, "Running on {}", metadata.host.as_deref().unwrap_or(UNKNOWN_HOST))?;
        writeln!(out, "Starting at {}", metadata.start_time_string())?;
        writeln!(out, "<<<|")?;
        writeln!(out, "ROS")?;
        writeln!(out, "{}", metadata.request_echo)?;
        writeln!(out, "|>>>")?;
        writeln!(out, "{} seconds per run", metadata.time_budget)?;
        writeln!(
            out,
            "{} seconds spent to collect the data",
            metadata.total_duration.as_secs_f64()
        )?;
        writeln!(out, "{} planners", metadata.planner_count)?;
        Ok(())
    }

    fn render_group<W: Write>(group: &ReportGroup, out: &mut W) -> ReportResult<()> {
        writeln!(out, "{}", group.name())?;
        writeln!(out, "0 common properties")?;
        writeln!(out, "{} properties for each run", group.properties.len())?;
        for key in &group.properties {
            writeln!(out, "{}", key.label())?;
        }

        writeln!(out, "{} runs", group.runs.len())?;
        for record in &group.runs {
            for key in &group.properties {
                if let Some(value) = record.get(&key.name) {
                    write!(out, "{}", value)?;
                }
                write!(out, "; ")?;
            }
            writeln!(out)?;
        }
        writeln!(out, ".")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn test_header_layout() {
        let text = ReportWriter::render_to_string(&sample_report()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Experiment kitchen");
        assert_eq!(lines[1], "Running on bench-01");
        assert_eq!(lines[2], "Starting at 2024-03-09T14:05:07.250000");
        assert_eq!(lines[3], "<<<|");
        assert_eq!(lines[4], "ROS");
        assert_eq!(lines[5], "{");
        assert_eq!(lines[8], "|>>>");
        assert_eq!(lines[9], "1.5 seconds per run");
        assert_eq!(lines[10], "0.75 seconds spent to collect the data");
        assert_eq!(lines[11], "2 planners");
    }

    #[test]
    fn test_group_sections() {
        let text = ReportWriter::render_to_string(&sample_report()).unwrap();
        let body: Vec<&str> = text.lines().skip(12).collect();

        assert_eq!(
            body,
            vec![
                "PA_x",
                "0 common properties",
                "4 properties for each run",
                "path_plan_length REAL",
                "process_time REAL",
                "solved BOOLEAN",
                "total_time REAL",
                "2 runs",
                "2; 0.001; 1; 0.5; ",
                "; 0; 0; 0.25; ",
                ".",
                "PA_y",
                "0 common properties",
                "3 properties for each run",
                "process_time REAL",
                "solved BOOLEAN",
                "total_time REAL",
                "1 runs",
                "0; 0; 1; ",
                ".",
            ]
        );
    }

    #[test]
    fn test_missing_metadata_placeholders() {
        let mut report = sample_report();
        report.metadata.experiment = None;
        report.metadata.host = None;

        let text = ReportWriter::render_to_string(&report).unwrap();
        assert!(text.starts_with("Experiment NO_NAME\nRunning on UNKNOWN\n"));
    }

    #[test]
    fn test_default_filename() {
        let report = sample_report();
        assert_eq!(
            ReportWriter::default_filename(DEFAULT_FILE_PREFIX, &report.metadata),
            "motion_benchmarks_bench-01_2024-03-09T14:05:07.250000.log"
        );
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let report = sample_report();

        ReportWriter::write_to_path(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, ReportWriter::render_to_string(&report).unwrap());
        assert!(written.ends_with(".\n"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");
        assert!(ReportWriter::write_to_path(&sample_report(), &path).is_err());
    }
}
