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

//! Resource usage views of a cluster report.
//!
//! Monitoring samples are flattened into row tables (global per-node rows and
//! per-process rows) which the render functions turn into chart layouts.
//! The same views are used by the per-run monitoring artifact and by the
//! comparison page.

use crate::chart::{escape_html, render_document, Chart, Layout, Panel};
use crate::cluster::{ClusterReport, MonitoringMap};
use crate::error::{OverviewError, Result};
use crate::statistics::average;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Profiles larger than this are shown truncated.
const MAX_PROFILE_BYTES: usize = 64 * 1024;

/// One node sample with timestamps relative to the start of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    /// Node hostname.
    pub hostname: String,
    /// Seconds since the first sample of the report.
    pub time: f64,
    /// Mean utilization over all cores in percent.
    pub cpu: f64,
    /// Memory utilization in percent.
    pub mem: f64,
}

/// One process sample with timestamps relative to the start of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    /// Node hostname.
    pub hostname: String,
    /// Logical process name.
    pub key: String,
    /// Seconds since the first sample of the report.
    pub time: f64,
    /// CPU utilization in percent.
    pub cpu: f64,
    /// Resident set size in bytes.
    pub rss: u64,
}

/// Per-node resource charts, two per node (CPU and memory).
///
/// Kept typed rather than as a [`Layout`] so the comparison page can
/// rewrite the y-axis bounds before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUsageView {
    /// One-line description shown above the charts.
    pub header: String,
    /// Charts in node order.
    pub charts: Vec<Chart>,
}

impl NodeUsageView {
    /// Converts the view into a renderable layout.
    pub fn into_layout(self) -> Layout {
        Layout::Column(vec![
            Layout::Html(self.header),
            Layout::Row(self.charts.into_iter().map(Layout::Chart).collect()),
        ])
    }
}

fn start_time(monitoring: &MonitoringMap) -> f64 {
    monitoring
        .values()
        .flatten()
        .map(|record| record.timestamp)
        .fold(f64::INFINITY, f64::min)
}

/// Flattens node samples into rows, sorted by node then time.
pub fn create_global_resources_df(monitoring: &MonitoringMap) -> Vec<ResourceRow> {
    let start = start_time(monitoring);
    monitoring
        .iter()
        .flat_map(|(node, records)| {
            records.iter().map(move |record| ResourceRow {
                hostname: node.hostname.clone(),
                time: record.timestamp - start,
                cpu: average(&record.resources.cpu),
                mem: record.resources.mem,
            })
        })
        .collect()
}

/// Flattens process samples into rows, sorted by node then time.
pub fn create_per_process_resources_df(monitoring: &MonitoringMap) -> Vec<ProcessRow> {
    let start = start_time(monitoring);
    monitoring
        .iter()
        .flat_map(|(node, records)| {
            records.iter().flat_map(move |record| {
                record.processes.values().map(move |process| ProcessRow {
                    hostname: node.hostname.clone(),
                    key: process.key.clone(),
                    time: record.timestamp - start,
                    cpu: process.cpu,
                    rss: process.rss,
                })
            })
        })
        .collect()
}

fn series_by_host<F>(rows: &[ResourceRow], value: F) -> BTreeMap<&str, Vec<(f64, f64)>>
where
    F: Fn(&ResourceRow) -> f64,
{
    let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows {
        series
            .entry(row.hostname.as_str())
            .or_default()
            .push((row.time, value(row)));
    }
    series
}

/// Cluster-wide CPU and memory charts with one series per node.
pub fn render_global_resource_usage(report: &ClusterReport, rows: &[ResourceRow]) -> Layout {
    let mut cpu = Chart::new("CPU usage").with_labels("Time [s]", "CPU [%]");
    for (host, points) in series_by_host(rows, |row| row.cpu) {
        cpu = cpu.with_series(host, points);
    }
    let mut mem = Chart::new("Memory usage").with_labels("Time [s]", "Memory [%]");
    for (host, points) in series_by_host(rows, |row| row.mem) {
        mem = mem.with_series(host, points);
    }

    Layout::Column(vec![
        Layout::Html(format!(
            "<p>{} nodes, {} samples</p>",
            report.monitoring().len(),
            rows.len()
        )),
        Layout::Row(vec![
            Layout::Chart(cpu.fit_y_range()),
            Layout::Chart(mem.fit_y_range()),
        ]),
    ])
}

/// CPU and memory charts for each node, each with its own fitted y range.
pub fn render_nodes_resource_usage(report: &ClusterReport, rows: &[ResourceRow]) -> NodeUsageView {
    let cpu = series_by_host(rows, |row| row.cpu);
    let mem = series_by_host(rows, |row| row.mem);

    let mut charts = Vec::new();
    for (host, points) in cpu {
        charts.push(
            Chart::new(format!("{} CPU", host))
                .with_labels("Time [s]", "CPU [%]")
                .with_series(host, points)
                .fit_y_range(),
        );
        if let Some(points) = mem.get(host) {
            charts.push(
                Chart::new(format!("{} memory", host))
                    .with_labels("Time [s]", "Memory [%]")
                    .with_series(host, points.clone())
                    .fit_y_range(),
            );
        }
    }

    NodeUsageView {
        header: format!("<p>Per-node usage of {}</p>", escape_html(&report.name())),
        charts,
    }
}

/// CPU and RSS charts for each monitored process.
pub fn render_process_resource_usage(report: &ClusterReport, rows: &[ProcessRow]) -> Layout {
    let mut cpu: BTreeMap<(String, String), Vec<(f64, f64)>> = BTreeMap::new();
    let mut rss: BTreeMap<(String, String), Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows {
        let id = (row.hostname.clone(), row.key.clone());
        cpu.entry(id.clone()).or_default().push((row.time, row.cpu));
        rss.entry(id)
            .or_default()
            .push((row.time, row.rss as f64 / (1024.0 * 1024.0)));
    }

    let mut charts = Vec::new();
    for ((host, key), points) in cpu {
        let label = format!("{}/{}", host, key);
        charts.push(Layout::Chart(
            Chart::new(format!("{} CPU", label))
                .with_labels("Time [s]", "CPU [%]")
                .with_series(label.clone(), points)
                .fit_y_range(),
        ));
        if let Some(points) = rss.remove(&(host, key)) {
            charts.push(Layout::Chart(
                Chart::new(format!("{} RSS", label))
                    .with_labels("Time [s]", "RSS [MiB]")
                    .with_series(label, points)
                    .fit_y_range(),
            ));
        }
    }

    Layout::Column(vec![
        Layout::Html(format!(
            "<p>Processes of {}</p>",
            escape_html(&report.name())
        )),
        Layout::Row(charts),
    ])
}

/// Profile files of the run, one panel per process.
pub fn render_profiling_data(report: &ClusterReport) -> Layout {
    let panels = report
        .profiling_data()
        .iter()
        .map(|(process, path)| {
            let content = match fs::read_to_string(path) {
                Ok(mut text) => {
                    if text.len() > MAX_PROFILE_BYTES {
                        let mut end = MAX_PROFILE_BYTES;
                        while !text.is_char_boundary(end) {
                            end -= 1;
                        }
                        text.truncate(end);
                        text.push_str("\n...");
                    }
                    format!("<pre>{}</pre>", escape_html(&text))
                }
                Err(e) => format!(
                    "<p>Profile {} is not readable: {}</p>",
                    escape_html(&path.display().to_string()),
                    escape_html(&e.to_string())
                ),
            };
            Panel::new(process.clone(), Layout::Html(content))
        })
        .collect();
    Layout::Tabs(panels)
}

fn render_nodes_table(report: &ClusterReport) -> Layout {
    let mut html = String::from("<table>\n<tr><th>Hostname</th><th>Role</th><th>Samples</th></tr>\n");
    for node in report.nodes() {
        let samples = report.monitoring().get(node).map_or(0, Vec::len);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&node.hostname),
            escape_html(&node.role),
            samples
        );
    }
    html.push_str("</table>\n");
    Layout::Html(html)
}

/// Full monitoring view of a run.
pub fn render_cluster_report(report: &ClusterReport) -> Layout {
    let global = create_global_resources_df(report.monitoring());
    let processes = create_per_process_resources_df(report.monitoring());

    let mut panels = vec![Panel::new("Nodes", render_nodes_table(report))];
    if !global.is_empty() {
        panels.push(Panel::new(
            "Global usage",
            render_global_resource_usage(report, &global),
        ));
        panels.push(Panel::new(
            "Node usage",
            render_nodes_resource_usage(report, &global).into_layout(),
        ));
    }
    if !processes.is_empty() {
        panels.push(Panel::new(
            "Process usage",
            render_process_resource_usage(report, &processes),
        ));
    }
    if !report.profiling_data().is_empty() {
        panels.push(Panel::new("Profiling data", render_profiling_data(report)));
    }
    Layout::Tabs(panels)
}

/// Writes the monitoring view of `report` to `path`, creating parent
/// directories.
pub fn generate_cluster_report(report: &ClusterReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| OverviewError::io_error(parent, e))?;
    }
    let title = format!("Cluster report {}", report.name());
    let html = render_document(&title, &render_cluster_report(report));
    fs::write(path, html).map_err(|e| OverviewError::io_error(path, e))
}
