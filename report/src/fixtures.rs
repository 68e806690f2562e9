//! Report fixtures shared by the unit tests

use std::time::Duration;

use chrono::{TimeZone, Utc};
use motion_bench_core::{
    property_schema, BenchmarkReport, ReportGroup, ReportMetadata, TrialRecord, PROCESS_TIME,
    SOLVED, TOTAL_TIME,
};

pub fn record(solved: bool, total: f64, length: Option<f64>, process: f64) -> TrialRecord {
    let mut r = TrialRecord::new();
    r.insert_real(TOTAL_TIME, total);
    r.insert_bool(SOLVED, solved);
    r.insert_real(PROCESS_TIME, process);
    if let Some(length) = length {
        r.insert_real("path_plan_length", length);
    }
    r
}

pub fn group(description: &str, algorithm: &str, runs: Vec<TrialRecord>) -> ReportGroup {
    ReportGroup {
        planner_id: description.to_lowercase(),
        planner_description: description.to_string(),
        algorithm: algorithm.to_string(),
        properties: property_schema(&runs),
        runs,
    }
}

/// Two groups: `PA_x` (one solved, one unsolved run) and `PA_y` (one unsolved run)
pub fn sample_report() -> BenchmarkReport {
    let start_time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
        + chrono::Duration::milliseconds(250);

    BenchmarkReport {
        metadata: ReportMetadata {
            experiment: Some("kitchen".into()),
            host: Some("bench-01".into()),
            start_time,
            total_duration: Duration::from_millis(750),
            time_budget: 1.5,
            planner_count: 2,
            request_echo: "{\n  \"group_name\": \"arm\"\n}".into(),
        },
        groups: vec![
            group(
                "PA",
                "x",
                vec![
                    record(true, 0.5, Some(2.0), 0.001),
                    record(false, 0.25, None, 0.0),
                ],
            ),
            group("PA", "y", vec![record(false, 1.0, None, 0.0)]),
        ],
    }
}
