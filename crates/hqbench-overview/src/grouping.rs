// Dweve HQBench - Benchmark Overview
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Record grouping by workload and environment identity.
//!
//! The database is projected into a flat [`RecordFrame`] whose rows are then
//! partitioned by typed group keys. Groups are returned in a `BTreeMap`, so
//! iteration is always sorted by key and report ordering is deterministic.

use crate::database::{format_params, Database};
use crate::statistics::DurationStats;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One row of the record frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRow {
    /// Run key.
    pub key: String,
    /// Workload identity.
    pub workload: String,
    /// Stringified workload parameters.
    pub workload_params: String,
    /// Environment identity.
    pub environment: String,
    /// Stringified environment parameters.
    pub environment_params: String,
    /// Sequence index of the run within its cell.
    pub index: usize,
    /// Duration in seconds, `NaN` when missing.
    pub duration: f64,
}

/// Flat, table-like projection of benchmark records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFrame {
    rows: Vec<FrameRow>,
}

impl RecordFrame {
    /// Projects every database record into a row, keeping database order.
    pub fn from_database(database: &Database) -> Self {
        let rows = database
            .records()
            .iter()
            .map(|record| FrameRow {
                key: record.key().to_string(),
                workload: record.workload.clone(),
                workload_params: format_params(&record.workload_params),
                environment: record.environment.clone(),
                environment_params: format_params(&record.environment_params),
                index: record.index,
                duration: record.duration_secs(),
            })
            .collect();
        Self { rows }
    }

    /// Creates a frame from rows.
    pub fn from_rows(rows: Vec<FrameRow>) -> Self {
        Self { rows }
    }

    /// Returns the rows in frame order.
    pub fn rows(&self) -> &[FrameRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Durations of all rows, `NaN` for missing ones.
    pub fn durations(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.duration).collect()
    }

    /// Descriptive statistics of the durations.
    pub fn stats(&self) -> DurationStats {
        DurationStats::from_durations(&self.durations())
    }

    /// Mean of the non-missing durations.
    pub fn mean_duration(&self) -> f64 {
        self.stats().mean
    }

    /// Rows stably sorted by their sequence index.
    pub fn sorted_by_index(&self) -> Vec<&FrameRow> {
        let mut rows: Vec<&FrameRow> = self.rows.iter().collect();
        rows.sort_by_key(|row| row.index);
        rows
    }
}

/// A typed grouping key derived from a frame row.
pub trait GroupKey: Ord + Clone {
    /// Extracts the key of a row.
    fn of(row: &FrameRow) -> Self;

    /// Key components in display order.
    fn parts(&self) -> Vec<&str>;

    /// Components joined by a single space.
    fn joined(&self) -> String {
        self.parts().join(" ")
    }
}

/// Workload identity and its stringified parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WorkloadKey {
    /// Workload identity.
    pub workload: String,
    /// Stringified parameters.
    pub params: String,
}

impl GroupKey for WorkloadKey {
    fn of(row: &FrameRow) -> Self {
        Self {
            workload: row.workload.clone(),
            params: row.workload_params.clone(),
        }
    }

    fn parts(&self) -> Vec<&str> {
        vec![self.workload.as_str(), self.params.as_str()]
    }
}

impl fmt::Display for WorkloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.workload, self.params)
    }
}

/// Environment identity and its stringified parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EnvironmentKey {
    /// Environment identity.
    pub environment: String,
    /// Stringified parameters.
    pub params: String,
}

impl GroupKey for EnvironmentKey {
    fn of(row: &FrameRow) -> Self {
        Self {
            environment: row.environment.clone(),
            params: row.environment_params.clone(),
        }
    }

    fn parts(&self) -> Vec<&str> {
        vec![self.environment.as_str(), self.params.as_str()]
    }
}

impl fmt::Display for EnvironmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.environment, self.params)
    }
}

/// Full benchmark cell: workload and environment with their parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BenchmarkKey {
    /// Workload identity.
    pub workload: String,
    /// Stringified workload parameters.
    pub workload_params: String,
    /// Environment identity.
    pub environment: String,
    /// Stringified environment parameters.
    pub environment_params: String,
}

impl GroupKey for BenchmarkKey {
    fn of(row: &FrameRow) -> Self {
        Self {
            workload: row.workload.clone(),
            workload_params: row.workload_params.clone(),
            environment: row.environment.clone(),
            environment_params: row.environment_params.clone(),
        }
    }

    fn parts(&self) -> Vec<&str> {
        vec![
            self.workload.as_str(),
            self.workload_params.as_str(),
            self.environment.as_str(),
            self.environment_params.as_str(),
        ]
    }
}

/// Partitions `frame` by `K`, preserving row order inside each group.
///
/// Only keys with at least one row produce a group.
pub fn group_by<K: GroupKey>(frame: &RecordFrame) -> BTreeMap<K, RecordFrame> {
    let mut groups: BTreeMap<K, RecordFrame> = BTreeMap::new();
    for row in frame.rows() {
        groups.entry(K::of(row)).or_default().rows.push(row.clone());
    }
    groups
}

/// Groups rows by (workload, workload parameters).
pub fn groupby_workload(frame: &RecordFrame) -> BTreeMap<WorkloadKey, RecordFrame> {
    group_by(frame)
}

/// Groups rows by (environment, environment parameters).
pub fn groupby_environment(frame: &RecordFrame) -> BTreeMap<EnvironmentKey, RecordFrame> {
    group_by(frame)
}

/// Groups rows by the four-part benchmark key.
pub fn groupby_benchmark(frame: &RecordFrame) -> BTreeMap<BenchmarkKey, RecordFrame> {
    group_by(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, workload: &str, env: &str, duration: f64) -> FrameRow {
        FrameRow {
            key: key.to_string(),
            workload: workload.to_string(),
            workload_params: String::new(),
            environment: env.to_string(),
            environment_params: "workers=1".to_string(),
            index: 0,
            duration,
        }
    }

    #[test]
    fn test_groupby_workload_sorted() {
        let frame = RecordFrame::from_rows(vec![
            row("a", "sleep", "hq", 1.0),
            row("b", "empty", "hq", 2.0),
            row("c", "sleep", "dask", 3.0),
        ]);

        let groups = groupby_workload(&frame);
        let names: Vec<_> = groups.keys().map(|k| k.workload.as_str()).collect();
        assert_eq!(names, vec!["empty", "sleep"]);

        let sleep = &groups[&WorkloadKey {
            workload: "sleep".to_string(),
            params: String::new(),
        }];
        let keys: Vec<_> = sleep.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_groupby_environment() {
        let frame = RecordFrame::from_rows(vec![
            row("a", "sleep", "hq", 1.0),
            row("b", "empty", "hq", f64::NAN),
            row("c", "sleep", "dask", 3.0),
        ]);

        let groups = groupby_environment(&frame);
        assert_eq!(groups.len(), 2);
        let hq = groups.values().nth(1).unwrap();
        assert_eq!(hq.len(), 2);
        assert_eq!(hq.stats().count, 1);
    }

    #[test]
    fn test_key_display() {
        let key = WorkloadKey {
            workload: "sleep".to_string(),
            params: "n=1".to_string(),
        };
        assert_eq!(key.to_string(), "sleep(n=1)");
        assert_eq!(key.joined(), "sleep n=1");
    }

    #[test]
    fn test_sorted_by_index_is_stable() {
        let mut first = row("first", "w", "e", 1.0);
        first.index = 1;
        let mut second = row("second", "w", "e", 1.0);
        second.index = 0;
        let mut third = row("third", "w", "e", 1.0);
        third.index = 1;

        let frame = RecordFrame::from_rows(vec![first, second, third]);
        let keys: Vec<_> = frame
            .sorted_by_index()
            .iter()
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(keys, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_empty_frame_has_no_groups() {
        assert!(groupby_workload(&RecordFrame::default()).is_empty());
    }
}
