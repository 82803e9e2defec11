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

//! Cluster reports stored in the working directory of a run.
//!
//! Layout of a working directory:
//!
//! ```text
//! <workdir>/cluster.json              nodes of the cluster (required)
//! <workdir>/monitoring/<host>.jsonl   one monitoring sample per line
//! <workdir>/profiling/<process>.*     profiling output per process
//! ```
//!
//! A working directory without `cluster.json` has no report; loading it
//! fails with [`OverviewError::ReportNotFound`].

use crate::error::{OverviewError, Result};
use crate::statistics::average;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const CLUSTER_FILE: &str = "cluster.json";
const MONITORING_DIR: &str = "monitoring";
const PROFILING_DIR: &str = "profiling";

/// A node of the benchmarked cluster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterNode {
    /// Hostname identifying the node.
    pub hostname: String,
    /// Role of the node in the cluster (e.g. `server`, `worker`).
    #[serde(default)]
    pub role: String,
}

impl ClusterNode {
    /// Creates a node.
    pub fn new(hostname: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            role: role.into(),
        }
    }
}

/// Node-level resource usage of one sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Utilization per CPU core in percent.
    pub cpu: Vec<f64>,
    /// Memory utilization in percent.
    pub mem: f64,
    /// Bytes received since boot.
    #[serde(default)]
    pub net_read: u64,
    /// Bytes sent since boot.
    #[serde(default)]
    pub net_write: u64,
}

/// Resource usage of one process in a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Logical name of the process (e.g. `server`, `worker-0`).
    pub key: String,
    /// CPU utilization in percent.
    pub cpu: f64,
    /// Resident set size in bytes.
    pub rss: u64,
}

/// A single monitoring sample of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringRecord {
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Node-level resources.
    pub resources: Resources,
    /// Per-process usage keyed by PID.
    #[serde(default)]
    pub processes: BTreeMap<String, ProcessRecord>,
}

/// Monitoring samples per node, in sample order.
pub type MonitoringMap = BTreeMap<ClusterNode, Vec<MonitoringRecord>>;

#[derive(Serialize, Deserialize)]
struct ClusterInfo {
    nodes: Vec<ClusterNode>,
}

/// Report of one benchmark run, loaded from its working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterReport {
    directory: PathBuf,
    nodes: Vec<ClusterNode>,
    monitoring: MonitoringMap,
    profiling_data: BTreeMap<String, PathBuf>,
}

impl ClusterReport {
    /// Creates an in-memory report without samples.
    pub fn new(directory: impl Into<PathBuf>, nodes: Vec<ClusterNode>) -> Self {
        Self {
            directory: directory.into(),
            nodes,
            monitoring: MonitoringMap::new(),
            profiling_data: BTreeMap::new(),
        }
    }

    /// Adds monitoring samples of a node.
    pub fn with_monitoring(mut self, node: ClusterNode, records: Vec<MonitoringRecord>) -> Self {
        if !records.is_empty() {
            self.monitoring.entry(node).or_default().extend(records);
        }
        self
    }

    /// Adds a profile file of a process.
    pub fn with_profile(mut self, process: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.profiling_data.insert(process.into(), path.into());
        self
    }

    /// Loads the report stored in `workdir`.
    pub fn load(workdir: impl AsRef<Path>) -> Result<Self> {
        let workdir = workdir.as_ref();
        let cluster_file = workdir.join(CLUSTER_FILE);
        if !cluster_file.is_file() {
            return Err(OverviewError::ReportNotFound {
                workdir: workdir.to_path_buf(),
            });
        }

        let content = fs::read_to_string(&cluster_file)
            .map_err(|e| OverviewError::io_error(&cluster_file, e))?;
        let info: ClusterInfo =
            serde_json::from_str(&content).map_err(|e| OverviewError::InvalidReport {
                path: cluster_file.clone(),
                message: e.to_string(),
            })?;

        let mut monitoring = MonitoringMap::new();
        for node in &info.nodes {
            let path = workdir
                .join(MONITORING_DIR)
                .join(format!("{}.jsonl", node.hostname));
            if path.is_file() {
                let records = load_monitoring_records(&path)?;
                if !records.is_empty() {
                    monitoring.insert(node.clone(), records);
                }
            }
        }

        Ok(Self {
            directory: workdir.to_path_buf(),
            nodes: info.nodes,
            monitoring,
            profiling_data: load_profiling_data(&workdir.join(PROFILING_DIR))?,
        })
    }

    /// Writes the report into its directory using the on-disk layout.
    pub fn save(&self) -> Result<()> {
        let monitoring_dir = self.directory.join(MONITORING_DIR);
        fs::create_dir_all(&monitoring_dir)
            .map_err(|e| OverviewError::io_error(&monitoring_dir, e))?;

        let info = ClusterInfo {
            nodes: self.nodes.clone(),
        };
        let cluster_file = self.directory.join(CLUSTER_FILE);
        fs::write(&cluster_file, serde_json::to_string_pretty(&info)?)
            .map_err(|e| OverviewError::io_error(&cluster_file, e))?;

        for (node, records) in &self.monitoring {
            let path = monitoring_dir.join(format!("{}.jsonl", node.hostname));
            let mut file = fs::File::create(&path).map_err(|e| OverviewError::io_error(&path, e))?;
            for record in records {
                let line = serde_json::to_string(record)?;
                writeln!(file, "{}", line).map_err(|e| OverviewError::io_error(&path, e))?;
            }
        }
        Ok(())
    }

    /// Working directory of the run.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Short name of the run used as a label in comparisons.
    pub fn name(&self) -> String {
        self.directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.directory.display().to_string())
    }

    /// Nodes of the cluster.
    pub fn nodes(&self) -> &[ClusterNode] {
        &self.nodes
    }

    /// Monitoring samples per node.
    pub fn monitoring(&self) -> &MonitoringMap {
        &self.monitoring
    }

    /// Returns true if at least one node has monitoring samples.
    pub fn has_monitoring(&self) -> bool {
        !self.monitoring.is_empty()
    }

    /// Profile files keyed by process name.
    pub fn profiling_data(&self) -> &BTreeMap<String, PathBuf> {
        &self.profiling_data
    }
}

fn load_monitoring_records(path: &Path) -> Result<Vec<MonitoringRecord>> {
    let content = fs::read_to_string(path).map_err(|e| OverviewError::io_error(path, e))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| OverviewError::InvalidReport {
                path: path.to_path_buf(),
                message: format!("line {}: {}", number + 1, e),
            })
        })
        .collect()
}

fn load_profiling_data(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut profiles = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(profiles);
    }
    let entries = fs::read_dir(dir).map_err(|e| OverviewError::io_error(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| OverviewError::io_error(dir, e))?.path();
        if let Some(stem) = path.file_stem() {
            if path.is_file() {
                profiles.insert(stem.to_string_lossy().into_owned(), path);
            }
        }
    }
    Ok(profiles)
}

/// Identity of a monitored process.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProcessKey {
    /// Node the process ran on.
    pub hostname: String,
    /// Logical process name.
    pub key: String,
}

/// Aggregated resource usage of one process over a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessStats {
    /// Peak resident set size in bytes.
    pub max_rss: u64,
    /// Mean CPU utilization in percent.
    pub avg_cpu: f64,
}

/// Aggregates per-process peak memory and mean CPU over all samples.
pub fn get_process_aggregated_stats(report: &ClusterReport) -> BTreeMap<ProcessKey, ProcessStats> {
    let mut samples: BTreeMap<ProcessKey, (u64, Vec<f64>)> = BTreeMap::new();
    for (node, records) in report.monitoring() {
        for record in records {
            for process in record.processes.values() {
                let key = ProcessKey {
                    hostname: node.hostname.clone(),
                    key: process.key.clone(),
                };
                let (max_rss, cpu) = samples.entry(key).or_default();
                *max_rss = (*max_rss).max(process.rss);
                cpu.push(process.cpu);
            }
        }
    }

    samples
        .into_iter()
        .map(|(key, (max_rss, cpu))| {
            (
                key,
                ProcessStats {
                    max_rss,
                    avg_cpu: average(&cpu),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(timestamp: f64, cpu: f64, rss: u64) -> MonitoringRecord {
        let mut processes = BTreeMap::new();
        processes.insert(
            "100".to_string(),
            ProcessRecord {
                key: "worker".to_string(),
                cpu,
                rss,
            },
        );
        MonitoringRecord {
            timestamp,
            resources: Resources {
                cpu: vec![cpu, cpu],
                mem: 10.0,
                ..Resources::default()
            },
            processes,
        }
    }

    #[test]
    fn test_missing_report() {
        let dir = tempdir().unwrap();
        let err = ClusterReport::load(dir.path()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let node = ClusterNode::new("n1", "worker");
        let report = ClusterReport::new(dir.path(), vec![node.clone()])
            .with_monitoring(node.clone(), vec![sample(0.0, 10.0, 100), sample(1.0, 30.0, 300)]);
        report.save().unwrap();

        let loaded = ClusterReport::load(dir.path()).unwrap();
        assert_eq!(loaded.nodes(), &[node.clone()]);
        assert!(loaded.has_monitoring());
        assert_eq!(loaded.monitoring()[&node].len(), 2);
        assert!(loaded.profiling_data().is_empty());
    }

    #[test]
    fn test_invalid_monitoring_line() {
        let dir = tempdir().unwrap();
        let node = ClusterNode::new("n1", "worker");
        ClusterReport::new(dir.path(), vec![node]).save().unwrap();
        fs::write(dir.path().join("monitoring/n1.jsonl"), "{not json}\n").unwrap();

        let err = ClusterReport::load(dir.path()).unwrap_err();
        assert!(matches!(err, OverviewError::InvalidReport { .. }));
    }

    #[test]
    fn test_profiling_data() {
        let dir = tempdir().unwrap();
        ClusterReport::new(dir.path(), vec![]).save().unwrap();
        fs::create_dir_all(dir.path().join("profiling")).unwrap();
        fs::write(dir.path().join("profiling/server.txt"), "main;run 10\n").unwrap();

        let loaded = ClusterReport::load(dir.path()).unwrap();
        assert!(loaded.profiling_data().contains_key("server"));
        assert!(!loaded.has_monitoring());
    }

    #[test]
    fn test_process_aggregated_stats() {
        let node = ClusterNode::new("n1", "worker");
        let report = ClusterReport::new("/runs/a", vec![node.clone()])
            .with_monitoring(node, vec![sample(0.0, 10.0, 100), sample(1.0, 30.0, 300)]);

        let stats = get_process_aggregated_stats(&report);
        let key = ProcessKey {
            hostname: "n1".to_string(),
            key: "worker".to_string(),
        };
        assert_eq!(stats[&key].max_rss, 300);
        assert_eq!(stats[&key].avg_cpu, 20.0);
        assert_eq!(report.name(), "a");
    }
}
