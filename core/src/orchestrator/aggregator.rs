//! Grouping of trial records into report groups

use std::collections::HashMap;

use crate::metrics::{PropertyKey, TrialRecord};
use crate::results::ReportGroup;

/// Collects trial records and groups them per (planner, algorithm)
///
/// Groups keep the order in which their first record arrived; records keep
/// arrival order within a group.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    groups: Vec<ReportGroup>,
    index: HashMap<(String, String), usize>,
}

impl ResultAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record to its (planner, algorithm) group
    pub fn push(
        &mut self,
        planner_id: &str,
        planner_description: &str,
        algorithm: &str,
        record: TrialRecord,
    ) {
        let key = (planner_id.to_string(), algorithm.to_string());
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.groups.push(ReportGroup {
                    planner_id: planner_id.to_string(),
                    planner_description: planner_description.to_string(),
                    algorithm: algorithm.to_string(),
                    properties: Vec::new(),
                    runs: Vec::new(),
                });
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].runs.push(record);
    }

    /// Number of groups seen so far
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of records seen so far
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.runs.len()).sum()
    }

    /// Finish grouping and compute each group's column schema
    pub fn finish(self) -> Vec<ReportGroup> {
        self.groups
            .into_iter()
            .map(|mut group| {
                group.properties = property_schema(&group.runs);
                group
            })
            .collect()
    }
}

/// Union of the keys of `records`, sorted by column label
///
/// When a name shows up with more than one type, the first type seen wins.
pub fn property_schema(records: &[TrialRecord]) -> Vec<PropertyKey> {
    let mut seen: HashMap<String, PropertyKey> = HashMap::new();
    for record in records {
        for key in record.keys() {
            seen.entry(key.name.clone()).or_insert(key);
        }
    }

    let mut schema: Vec<PropertyKey> = seen.into_values().collect();
    schema.sort_by_key(|k| k.label());
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{PropertyKind, PropertyValue};

    fn record(pairs: &[(&str, f64)]) -> TrialRecord {
        let mut r = TrialRecord::new();
        for (name, value) in pairs {
            r.insert_real(*name, *value);
        }
        r
    }

    #[test]
    fn test_groups_by_planner_and_algorithm() {
        let mut aggregator = ResultAggregator::new();
        aggregator.push("a", "A", "x", record(&[("t", 1.0)]));
        aggregator.push("a", "A", "y", record(&[("t", 2.0)]));
        aggregator.push("a", "A", "x", record(&[("t", 3.0)]));
        aggregator.push("b", "B", "x", record(&[("t", 4.0)]));

        assert_eq!(aggregator.group_count(), 3);
        assert_eq!(aggregator.record_count(), 4);

        let groups = aggregator.finish();
        assert_eq!(groups[0].name(), "A_x");
        assert_eq!(groups[0].runs.len(), 2);
        assert_eq!(groups[0].runs[1].real("t"), Some(3.0));
        assert_eq!(groups[1].name(), "A_y");
        assert_eq!(groups[2].name(), "B_x");
    }

    #[test]
    fn test_schema_is_union_sorted_by_label() {
        let records = vec![
            record(&[("total_time", 1.0), ("path_plan_length", 2.0)]),
            record(&[("total_time", 1.0), ("process_time", 0.0)]),
        ];
        let labels: Vec<String> = property_schema(&records).iter().map(|k| k.label()).collect();
        assert_eq!(
            labels,
            vec!["path_plan_length REAL", "process_time REAL", "total_time REAL"]
        );
    }

    #[test]
    fn test_schema_is_per_group() {
        let mut aggregator = ResultAggregator::new();
        aggregator.push("a", "A", "x", record(&[("only_x", 1.0)]));
        aggregator.push("a", "A", "y", record(&[("only_y", 1.0), ("other", 2.0)]));

        let groups = aggregator.finish();
        assert_eq!(groups[0].properties.len(), 1);
        assert_eq!(groups[1].properties.len(), 2);
    }

    #[test]
    fn test_schema_first_kind_wins() {
        let mut first = TrialRecord::new();
        first.insert_bool("flag", true);
        let mut second = TrialRecord::new();
        second.insert("flag", PropertyValue::Real(1.0));

        let schema = property_schema(&[first, second]);
        assert_eq!(schema, vec![PropertyKey::new("flag", PropertyKind::Boolean)]);
    }

    #[test]
    fn test_empty_schema() {
        assert!(property_schema(&[]).is_empty());
    }
}
