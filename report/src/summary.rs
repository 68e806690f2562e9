//! Per-group statistics for comparing planners offline

use motion_bench_core::{PropertyKind, SOLVED};
use serde::{Deserialize, Serialize};

use crate::reader::{ParsedGroup, ParsedReport};

/// Distribution of a REAL column
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Percentiles {
    /// Number of non-empty cells
    pub count: usize,
    /// Minimum value
    pub min: f64,
    /// 50th percentile (median)
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
    /// Maximum value
    pub max: f64,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation
    pub stddev: f64,
}

impl Percentiles {
    /// Calculate percentiles from a slice of values
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<f64> = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let len = sorted.len();
        let mean = sorted.iter().sum::<f64>() / len as f64;

        let variance = if len > 1 {
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (len - 1) as f64
        } else {
            0.0
        };

        Self {
            count: len,
            min: sorted[0],
            p50: percentile(&sorted, 0.50),
            p95: percentile(&sorted, 0.95),
            max: sorted[len - 1],
            mean,
            stddev: variance.sqrt(),
        }
    }
}

/// Calculate percentile from sorted values using linear interpolation
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let idx = p * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Statistics of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    /// REAL column
    Real(Percentiles),
    /// BOOLEAN column
    Boolean {
        /// Number of non-empty cells
        count: usize,
        /// Share of those cells that are true
        fraction_true: f64,
    },
}

/// Summary of one column of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Property name
    pub name: String,
    /// Statistics for the column
    pub stats: ColumnStats,
}

/// Summary of one (planner, algorithm) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group name
    pub name: String,
    /// Number of runs
    pub runs: usize,
    /// Number of solved runs
    pub solved: usize,
    /// `solved / runs`, 0 for a group without runs
    pub solved_fraction: f64,
    /// One entry per REAL or BOOLEAN column, in schema order
    pub columns: Vec<ColumnSummary>,
}

impl GroupSummary {
    /// Summarize a parsed group; TEXT columns are left out
    pub fn from_group(group: &ParsedGroup) -> Self {
        let runs = group.run_count();
        let solved = group.solved_count();

        let columns = group
            .properties
            .iter()
            .filter_map(|key| {
                let stats = match key.kind {
                    PropertyKind::Real => ColumnStats::Real(Percentiles::from_values(&group.reals(&key.name))),
                    PropertyKind::Boolean => {
                        let flags = group.flags(&key.name);
                        ColumnStats::Boolean {
                            count: flags.len(),
                            fraction_true: fraction(flags.iter().filter(|f| **f).count(), flags.len()),
                        }
                    }
                    PropertyKind::Text => return None,
                };
                Some(ColumnSummary {
                    name: key.name.clone(),
                    stats,
                })
            })
            .collect();

        Self {
            name: group.name.clone(),
            runs,
            solved,
            solved_fraction: fraction(solved, runs),
            columns,
        }
    }

    /// Summarize every group of a report
    pub fn from_report(report: &ParsedReport) -> Vec<Self> {
        report.groups.iter().map(Self::from_group).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.stats)
    }
}

fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Plain-text table of summaries, one block per group
pub fn render_table(summaries: &[GroupSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        out.push_str(&format!(
            "{}: {}/{} solved ({:.1}%)\n",
            summary.name,
            summary.solved,
            summary.runs,
            summary.solved_fraction * 100.0
        ));
        for column in &summary.columns {
            if column.name == SOLVED {
                continue;
            }
            let line = match &column.stats {
                ColumnStats::Real(p) => format!(
                    "  {:<32} n={:<4} mean={:<12.6} p50={:<12.6} p95={:<12.6} min={:<12.6} max={:<12.6} sd={:.6}",
                    column.name, p.count, p.mean, p.p50, p.p95, p.min, p.max, p.stddev
                ),
                ColumnStats::Boolean {
                    count,
                    fraction_true,
                } => format!(
                    "  {:<32} n={:<4} true={:.1}%",
                    column.name,
                    count,
                    fraction_true * 100.0
                ),
            };
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    fn summaries() -> Vec<GroupSummary> {
        GroupSummary::from_report(&ParsedReport::from_report(&sample_report()))
    }

    #[test]
    fn test_percentiles_basic() {
        let p = Percentiles::from_values(&[4.0, 1.0, 3.0, 2.0, 5.0]);
        assert_eq!(p.count, 5);
        assert_eq!(p.min, 1.0);
        assert_eq!(p.max, 5.0);
        assert_eq!(p.p50, 3.0);
        assert!((p.p95 - 4.8).abs() < 1e-9);
        assert_eq!(p.mean, 3.0);
        assert!((p.stddev - 2.5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_percentiles_single_and_empty() {
        let p = Percentiles::from_values(&[7.0]);
        assert_eq!(p.p95, 7.0);
        assert_eq!(p.stddev, 0.0);
        assert_eq!(Percentiles::from_values(&[]), Percentiles::default());
    }

    #[test]
    fn test_group_summary() {
        let summaries = summaries();
        let x = &summaries[0];

        assert_eq!(x.name, "PA_x");
        assert_eq!(x.runs, 2);
        assert_eq!(x.solved, 1);
        assert_eq!(x.solved_fraction, 0.5);

        match x.column("path_plan_length") {
            Some(ColumnStats::Real(p)) => {
                assert_eq!(p.count, 1);
                assert_eq!(p.mean, 2.0);
            }
            other => panic!("unexpected stats {other:?}"),
        }
        match x.column("solved") {
            Some(ColumnStats::Boolean { count, fraction_true }) => {
                assert_eq!(*count, 2);
                assert_eq!(*fraction_true, 0.5);
            }
            other => panic!("unexpected stats {other:?}"),
        }
    }

    #[test]
    fn test_unsolved_group() {
        let summaries = summaries();
        assert_eq!(summaries[1].solved_fraction, 0.0);
        assert!(summaries[1].column("path_plan_length").is_none());
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&summaries());
        assert!(table.starts_with("PA_x: 1/2 solved (50.0%)\n"));
        assert!(table.contains("PA_y: 0/1 solved (0.0%)"));
        assert!(table.contains("  total_time"));
        assert!(!table.contains("  solved "));
    }
}
