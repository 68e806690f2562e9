//! JSON export functionality

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use motion_bench_core::BenchmarkReport;
use serde::Serialize;
use serde_json::json;

use crate::error::ReportResult;
use crate::reader::ParsedReport;
use crate::summary::GroupSummary;

/// Writes reports and summaries as pretty JSON
pub struct JsonExporter;

impl JsonExporter {
    /// Export an in-memory report with its summaries
    pub fn export_report(report: &BenchmarkReport, path: &Path) -> ReportResult<()> {
        Self::export_parsed(&ParsedReport::from_report(report), path)
    }

    /// Export a parsed report with its summaries
    pub fn export_parsed(report: &ParsedReport, path: &Path) -> ReportResult<()> {
        let output = json!({
            "summary": GroupSummary::from_report(report),
            "report": report,
        });
        Self::write(&output, path)
    }

    /// Export summaries only (smaller file)
    pub fn export_summaries(summaries: &[GroupSummary], path: &Path) -> ReportResult<()> {
        Self::write(&summaries, path)
    }

    /// Pretty JSON string for any serializable value
    pub fn to_string<T: Serialize + ?Sized>(value: &T) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn write<T: Serialize + ?Sized>(value: &T, path: &Path) -> ReportResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, value)?;
        out.flush()?;
        tracing::debug!(path = %path.display(), "JSON written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn test_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.json");

        JsonExporter::export_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["report"]["host"], "bench-01");
        assert_eq!(value["report"]["groups"][0]["name"], "PA_x");
        assert_eq!(value["summary"][0]["solved"], 1);
        assert_eq!(value["summary"][1]["runs"], 1);
    }

    #[test]
    fn test_parsed_report_roundtrip() {
        let parsed = ParsedReport::from_report(&sample_report());
        let json = JsonExporter::to_string(&parsed).unwrap();
        let back: ParsedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }

    #[test]
    fn test_export_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summaries = GroupSummary::from_report(&ParsedReport::from_report(&sample_report()));

        JsonExporter::export_summaries(&summaries, &path).unwrap();

        let back: Vec<GroupSummary> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), summaries.len());
        assert_eq!(back[0].name, "PA_x");
        assert_eq!(back[0].columns.len(), summaries[0].columns.len());
    }
}
