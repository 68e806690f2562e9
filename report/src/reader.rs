//! Text report reader
//!
//! Parses the layout produced by [`ReportWriter`](crate::ReportWriter) back
//! into raw cells. Values stay as the strings that were written; typed access
//! goes through the column kind.

use std::path::Path;

use motion_bench_core::{BenchmarkReport, PropertyKey, PropertyKind, SOLVED};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::writer::{NO_NAME, UNKNOWN_HOST};

/// A report read back from text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    /// Experiment name, `None` when written as the placeholder
    pub experiment: Option<String>,

    /// Host name, `None` when written as the placeholder
    pub host: Option<String>,

    /// Start time as written
    pub start_time: String,

    /// Request echo between the `<<<|` and `|>>>` markers
    pub request_echo: String,

    /// Per-solve time budget, seconds
    pub time_budget: f64,

    /// Wall time spent collecting the data, seconds
    pub total_duration: f64,

    /// Declared number of groups
    pub planner_count: usize,

    /// Groups in file order
    pub groups: Vec<ParsedGroup>,
}

/// One group section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedGroup {
    /// `<description>_<algorithm>`
    pub name: String,

    /// Common property lines
    pub common_properties: Vec<String>,

    /// Column schema
    pub properties: Vec<PropertyKey>,

    /// One entry per run, one cell per column; `None` for an empty cell
    pub runs: Vec<Vec<Option<String>>>,
}

impl ParsedGroup {
    /// Index of a column by property name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|k| k.name == name)
    }

    /// Numeric values of a column, skipping empty and unparsable cells
    pub fn reals(&self, name: &str) -> Vec<f64> {
        self.cells(name)
            .filter_map(|cell| cell.parse::<f64>().ok())
            .collect()
    }

    /// Boolean values of a column, skipping empty and unparsable cells
    pub fn flags(&self, name: &str) -> Vec<bool> {
        self.cells(name).filter_map(parse_flag).collect()
    }

    /// Number of runs
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of runs whose `solved` cell is true
    pub fn solved_count(&self) -> usize {
        self.flags(SOLVED).into_iter().filter(|s| *s).count()
    }

    fn cells<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        let column = self.column(name);
        self.runs.iter().filter_map(move |row| {
            column
                .and_then(|c| row.get(c))
                .and_then(|cell| cell.as_deref())
        })
    }
}

fn parse_flag(cell: &str) -> Option<bool> {
    match cell {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

impl ParsedReport {
    /// Convert an in-memory report into its parsed form without a text round trip
    pub fn from_report(report: &BenchmarkReport) -> Self {
        let metadata = &report.metadata;
        Self {
            experiment: metadata.experiment.clone(),
            host: metadata.host.clone(),
            start_time: metadata.start_time_string(),
            request_echo: metadata.request_echo.clone(),
            time_budget: metadata.time_budget,
            total_duration: metadata.total_duration.as_secs_f64(),
            planner_count: metadata.planner_count,
            groups: report
                .groups
                .iter()
                .map(|group| ParsedGroup {
                    name: group.name(),
                    common_properties: Vec::new(),
                    properties: group.properties.clone(),
                    runs: group
                        .runs
                        .iter()
                        .map(|record| {
                            group
                                .properties
                                .iter()
                                .map(|k| record.get(&k.name).map(|v| v.to_string()))
                                .collect()
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&ParsedGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

/// Parser for the text report layout
pub struct ReportReader;

impl ReportReader {
    /// Read and parse a report file
    pub fn read_path(path: &Path) -> ReportResult<ParsedReport> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse report text
    pub fn parse(text: &str) -> ReportResult<ParsedReport> {
        let mut cursor = Cursor::new(text);

        let experiment = placeholder(cursor.prefixed("Experiment ")?, NO_NAME);
        let host = placeholder(cursor.prefixed("Running on ")?, UNKNOWN_HOST);
        let start_time = cursor.prefixed("Starting at ")?.to_string();

        cursor.exact("<<<|")?;
        cursor.exact("ROS")?;
        let mut echo = Vec::new();
        loop {
            let (_, line) = cursor.next_line("end of request echo `|>>>`")?;
            if line == "|>>>" {
                break;
            }
            echo.push(line);
        }

        let time_budget = cursor.number::<f64>("seconds per run")?;
        let total_duration = cursor.number::<f64>("seconds spent to collect the data")?;
        let planner_count = cursor.number::<usize>("planners")?;

        let mut groups = Vec::new();
        while !cursor.at_end() {
            groups.push(Self::parse_group(&mut cursor)?);
        }

        if groups.len() != planner_count {
            tracing::warn!(
                declared = planner_count,
                found = groups.len(),
                "Report group count differs from its header"
            );
        }

        Ok(ParsedReport {
            experiment,
            host,
            start_time,
            request_echo: echo.join("\n"),
            time_budget,
            total_duration,
            planner_count,
            groups,
        })
    }

    fn parse_group(cursor: &mut Cursor<'_>) -> ReportResult<ParsedGroup> {
        let (_, name) = cursor.next_line("group name")?;
        let name = name.to_string();

        let common = cursor.number::<usize>("common properties")?;
        let mut common_properties = Vec::new();
        for _ in 0..common {
            let (_, line) = cursor.next_line("common property")?;
            common_properties.push(line.to_string());
        }

        let count = cursor.number::<usize>("properties for each run")?;
        let mut properties = Vec::new();
        for _ in 0..count {
            let (line_no, line) = cursor.next_line("property label")?;
            properties.push(parse_label(line_no, line)?);
        }

        let run_count = cursor.number::<usize>("runs")?;
        let mut runs = Vec::new();
        for _ in 0..run_count {
            let (line_no, line) = cursor.next_line("run row")?;
            runs.push(parse_row(line_no, line, properties.len())?);
        }

        cursor.exact(".")?;

        Ok(ParsedGroup {
            name,
            common_properties,
            properties,
            runs,
        })
    }
}

fn placeholder(value: &str, marker: &str) -> Option<String> {
    (value != marker && !value.is_empty()).then(|| value.to_string())
}

/// `<name> <TYPE>`, split at the last space
fn parse_label(line_no: usize, line: &str) -> ReportResult<PropertyKey> {
    let (name, type_name) = line
        .rsplit_once(' ')
        .ok_or_else(|| ReportError::parse(line_no, format!("property label without type: `{}`", line)))?;
    let kind = PropertyKind::from_type_name(type_name)
        .ok_or_else(|| ReportError::parse(line_no, format!("unknown property type `{}`", type_name)))?;
    Ok(PropertyKey::new(name, kind))
}

/// Split a row into exactly `width` cells, each terminated by `;`
fn parse_row(line_no: usize, line: &str, width: usize) -> ReportResult<Vec<Option<String>>> {
    let mut cells = Vec::with_capacity(width);
    let mut rest = line;
    for column in 0..width {
        let end = rest.find(';').ok_or_else(|| {
            ReportError::parse(
                line_no,
                format!("expected {} cells, found {}", width, column),
            )
        })?;
        let cell = rest[..end].trim();
        cells.push((!cell.is_empty()).then(|| cell.to_string()));
        rest = &rest[end + 1..];
    }

    if !rest.trim().is_empty() {
        return Err(ReportError::parse(
            line_no,
            format!("more than {} cells in row", width),
        ));
    }
    Ok(cells)
}

/// Line cursor with one-based line numbers
struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.lines[self.pos..].iter().all(|l| l.trim().is_empty())
    }

    fn next_line(&mut self, expected: &str) -> ReportResult<(usize, &'a str)> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| ReportError::UnexpectedEof(expected.to_string()))?;
        self.pos += 1;
        Ok((self.pos, line))
    }

    fn exact(&mut self, expected: &str) -> ReportResult<()> {
        let (line_no, line) = self.next_line(&format!("`{}`", expected))?;
        if line.trim_end() != expected {
            return Err(ReportError::parse(
                line_no,
                format!("expected `{}`, found `{}`", expected, line),
            ));
        }
        Ok(())
    }

    fn prefixed(&mut self, prefix: &str) -> ReportResult<&'a str> {
        let (line_no, line) = self.next_line(prefix.trim_end())?;
        line.strip_prefix(prefix)
            .or_else(|| (line == prefix.trim_end()).then_some(""))
            .ok_or_else(|| {
                ReportError::parse(line_no, format!("expected `{}...`, found `{}`", prefix, line))
            })
    }

    /// `<number> <suffix>`
    fn number<T: std::str::FromStr>(&mut self, suffix: &str) -> ReportResult<T> {
        let (line_no, line) = self.next_line(suffix)?;
        let value = line
            .trim_end()
            .strip_suffix(suffix)
            .map(str::trim)
            .ok_or_else(|| {
                ReportError::parse(line_no, format!("expected `<n> {}`, found `{}`", suffix, line))
            })?;
        value
            .parse()
            .map_err(|_| ReportError::parse(line_no, format!("invalid number `{}`", value)))
    }
}
