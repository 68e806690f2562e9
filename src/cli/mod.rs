//! CLI argument parsing and command dispatch

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motion_bench_core::BenchmarkRequest;
use motion_bench_report::{render_table, GroupSummary, JsonExporter, ReportReader};

#[derive(Parser)]
#[command(name = "motion-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a benchmark request file
    Validate {
        /// Path to the JSON request
        #[arg(short, long)]
        request: PathBuf,
    },
    /// Summarize a text report per planner and algorithm
    Summarize {
        /// Path to the report
        #[arg(short, long)]
        input: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Convert a text report to JSON
    Convert {
        /// Path to the report
        #[arg(short, long)]
        input: PathBuf,
        /// Path of the JSON file to write
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Cli {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Validate { request } => {
                let request = load_request(request)?;
                println!("{}", describe_request(&request));
            }
            Commands::Summarize { input, json } => {
                let report = ReportReader::read_path(input)
                    .with_context(|| format!("failed to read report {}", input.display()))?;
                let summaries = GroupSummary::from_report(&report);
                if *json {
                    println!("{}", JsonExporter::to_string(&summaries)?);
                } else {
                    print!("{}", render_table(&summaries));
                }
            }
            Commands::Convert { input, output } => {
                let report = ReportReader::read_path(input)
                    .with_context(|| format!("failed to read report {}", input.display()))?;
                JsonExporter::export_parsed(&report, output)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                tracing::info!(output = %output.display(), groups = report.groups.len(), "Report converted");
            }
        }
        Ok(())
    }
}

/// Read and validate a JSON benchmark request
pub fn load_request(path: &Path) -> Result<BenchmarkRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    let request: BenchmarkRequest = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse request {}", path.display()))?;
    request
        .validate()
        .with_context(|| format!("invalid request {}", path.display()))?;
    Ok(request)
}

/// Human-readable outline of what a request would benchmark
pub fn describe_request(request: &BenchmarkRequest) -> String {
    let problem = &request.motion_plan_request;
    let mut lines = vec![format!(
        "group '{}', {} seconds per run, {} repetitions by default",
        problem.group_name,
        problem.allowed_planning_time,
        request.repetitions_for(None)
    )];

    if request.planner_interfaces.is_empty() {
        lines.push("  * every loaded planner, all algorithms".to_string());
    }
    for (index, restriction) in request.planner_interfaces.iter().enumerate() {
        let ids = if restriction.planner_ids.is_empty() {
            "all".to_string()
        } else {
            restriction.planner_ids.join(" ")
        };
        lines.push(format!(
            "  * {} [ {} ] x{}",
            restriction.name,
            ids,
            request.repetitions_for(Some(index))
        ));
    }

    if let Some(filename) = &request.filename {
        lines.push(format!("report: {}", filename));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_bench_core::{MotionPlanRequest, PlannerRestriction};

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["motion-bench", "-v", "summarize", "--input", "r.log", "--json"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Summarize { input, json } => {
                assert_eq!(input, PathBuf::from("r.log"));
                assert!(json);
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn test_describe_request() {
        let request = BenchmarkRequest::new(MotionPlanRequest::new("arm", 2.0))
            .with_average_count(3)
            .with_planner_repeated(PlannerRestriction::with_algorithms("ompl", ["RRT", "PRM"]), 5)
            .with_planner(PlannerRestriction::new("chomp"));

        assert_eq!(
            describe_request(&request),
            "group 'arm', 2 seconds per run, 3 repetitions by default\n  * ompl [ RRT PRM ] x5\n  * chomp [ all ] x3"
        );
    }

    #[test]
    fn test_load_request_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("req.json");
        std::fs::write(
            &path,
            r#"{"motion_plan_request": {"group_name": "arm", "allowed_planning_time": -1.0}}"#,
        )
        .unwrap();

        assert!(load_request(&path).is_err());
    }

    #[test]
    fn test_load_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("req.json");
        std::fs::write(
            &path,
            r#"{"motion_plan_request": {"group_name": "arm", "allowed_planning_time": 1.0}, "filename": "x.log"}"#,
        )
        .unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(request.filename.as_deref(), Some("x.log"));
    }
}
