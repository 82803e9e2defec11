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

//! Parallel materialization of benchmark entries.
//!
//! Every database record is enriched with its cluster report, a cached
//! monitoring artifact and per-process statistics. Records are processed on
//! a dedicated Rayon pool; results are collected in input order and joined
//! into a single [`EntryMap`] by the calling thread.
//!
//! # Failure isolation
//!
//! - A run without report data is dropped silently.
//! - Any other per-run failure is logged and the run is dropped.
//! - Only a failure to build the worker pool aborts the batch.
//!
//! # Caching
//!
//! Monitoring artifacts live at `<directory>/monitoring/<key>.html` and are
//! generated only when that file does not exist yet. The key is encoded with
//! [`file_component`] so it always names a single file inside that directory.

use crate::cluster::{get_process_aggregated_stats, ClusterReport, ProcessKey, ProcessStats};
use crate::config::OverviewConfig;
use crate::database::{Database, DatabaseRecord};
use crate::error::{OverviewError, Result};
use crate::monitor::generate_cluster_report;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Directory of per-run monitoring artifacts, relative to the output
/// directory.
pub const MONITORING_DIR: &str = "monitoring";

/// A database record enriched with its report data.
#[derive(Debug, Clone)]
pub struct BenchmarkEntry {
    /// The database record.
    pub record: DatabaseRecord,
    /// Cluster report loaded from the record's working directory.
    pub report: ClusterReport,
    /// Monitoring artifact relative to the output directory, if the report
    /// has monitoring data.
    pub monitoring_report: Option<PathBuf>,
    /// Aggregated usage per process.
    pub process_stats: BTreeMap<ProcessKey, ProcessStats>,
}

/// Materialized entries keyed by run key.
pub type EntryMap = HashMap<String, BenchmarkEntry>;

/// Encodes a run key as a single file name component.
///
/// Path separators, `%`, control characters and a leading `.` are
/// percent-encoded, so the result never leaves its parent directory and
/// distinct keys never share a file name.
///
/// # Examples
///
/// ```
/// use hqbench_overview::materialize::file_component;
///
/// assert_eq!(file_component("run1"), "run1");
/// assert_eq!(file_component("x/y"), "x%2Fy");
/// assert_eq!(file_component("../x"), "%2E.%2Fx");
/// ```
pub fn file_component(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for (i, c) in key.char_indices() {
        if matches!(c, '/' | '\\' | '%') || c.is_control() || (i == 0 && c == '.') {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        } else {
            encoded.push(c);
        }
    }
    encoded
}

/// Relative artifact path as a URL path; `%` from [`file_component`] is
/// escaped again.
pub(crate) fn href_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").replace('%', "%25")
}

/// Path of the monitoring artifact of `key`, relative to the output
/// directory.
pub fn monitoring_artifact_path(key: &str) -> PathBuf {
    Path::new(MONITORING_DIR).join(format!("{}.html", file_component(key)))
}

/// Makes sure the monitoring artifact of `key` exists under `directory`.
///
/// Returns the relative artifact path and whether it was generated by this
/// call. An existing file is never rewritten.
pub fn ensure_monitoring_artifact(
    report: &ClusterReport,
    directory: &Path,
    key: &str,
) -> Result<(PathBuf, bool)> {
    let relative = monitoring_artifact_path(key);
    let target = directory.join(&relative);
    if target.is_file() {
        debug!(key, "Monitoring report already exists");
        return Ok((relative, false));
    }
    generate_cluster_report(report, &target)?;
    Ok((relative, true))
}

/// Materializes a single record.
///
/// Returns `Ok(None)` when the record's working directory holds no report.
pub fn generate_entry(record: &DatabaseRecord, directory: &Path) -> Result<Option<BenchmarkEntry>> {
    let report = match ClusterReport::load(record.workdir()) {
        Ok(report) => report,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };

    let monitoring_report = if report.has_monitoring() {
        let (path, _) = ensure_monitoring_artifact(&report, directory, record.key())?;
        Some(path)
    } else {
        None
    };

    let process_stats = get_process_aggregated_stats(&report);
    Ok(Some(BenchmarkEntry {
        record: record.clone(),
        report,
        monitoring_report,
        process_stats,
    }))
}

/// Progress tracker for materialization.
///
/// Uses atomic counters so workers can report completion in any order; the
/// emitted progress is always the number of completed records.
#[derive(Debug)]
struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
    materialized: AtomicUsize,
    dropped: AtomicUsize,
    interval: usize,
    start_time: Instant,
}

impl ProgressTracker {
    fn new(total: usize, interval: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            materialized: AtomicUsize::new(0),
            dropped: AtomicUsize::new(0),
            interval,
            start_time: Instant::now(),
        }
    }

    fn record_materialized(&self) {
        self.materialized.fetch_add(1, Ordering::Relaxed);
        self.advance();
    }

    fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        self.advance();
    }

    fn advance(&self) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interval > 0 && (processed % self.interval == 0 || processed == self.total) {
            info!(processed, total = self.total, "Materialization progress");
        }
    }

    fn finish(&self) {
        info!(
            total = self.total,
            materialized = self.materialized.load(Ordering::Relaxed),
            dropped = self.dropped.load(Ordering::Relaxed),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "Materialization finished"
        );
    }
}

/// Materializes all records of `database` into an [`EntryMap`].
///
/// Runs on a Rayon pool of `config.workers` threads. Records whose report is
/// missing or broken are absent from the result.
///
/// # Errors
///
/// Returns [`OverviewError::ThreadPool`] if the worker pool cannot be built.
pub fn pregenerate_entries(
    database: &Database,
    directory: &Path,
    config: &OverviewConfig,
) -> Result<EntryMap> {
    info!(
        records = database.len(),
        directory = %directory.display(),
        "Generating report files and statistics"
    );

    let mut entry_map = EntryMap::new();
    if database.is_empty() {
        return Ok(entry_map);
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = config.workers {
        builder = builder.num_threads(workers);
    }
    let pool = builder
        .build()
        .map_err(|e| OverviewError::ThreadPool(e.to_string()))?;

    let tracker = ProgressTracker::new(database.len(), config.progress_interval);
    let entries: Vec<Option<BenchmarkEntry>> = pool.install(|| {
        database
            .records()
            .par_iter()
            .map(|record| match generate_entry(record, directory) {
                Ok(Some(entry)) => {
                    tracker.record_materialized();
                    Some(entry)
                }
                Ok(None) => {
                    debug!(key = record.key(), "No report data, skipping run");
                    tracker.record_dropped();
                    None
                }
                Err(e) => {
                    warn!(key = record.key(), error = %e, "Failed to materialize run");
                    tracker.record_dropped();
                    None
                }
            })
            .collect()
    });
    tracker.finish();

    for entry in entries.into_iter().flatten() {
        entry_map.insert(entry.record.key().to_string(), entry);
    }
    Ok(entry_map)
}
