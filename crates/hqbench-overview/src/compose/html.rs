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

//! HTML report tree: run, environment, workload and summary pages.

use crate::chart::{escape_html, Bar, Chart};
use crate::config::OverviewConfig;
use crate::database::Database;
use crate::error::{OverviewError, Result};
use crate::grouping::{groupby_environment, groupby_workload, RecordFrame, WorkloadKey};
use crate::materialize::{href_path, pregenerate_entries, BenchmarkEntry, EntryMap};
use crate::statistics::{average, histogram, DurationStats};
use minijinja::{context, Environment};
use serde::Serialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const BENCHMARK_TEMPLATE: &str = include_str!("../../templates/benchmark.html.jinja");
const WORKLOAD_TEMPLATE: &str = include_str!("../../templates/workload.html.jinja");
const SUMMARY_TEMPLATE: &str = include_str!("../../templates/summary.html.jinja");

/// Formats a byte count with binary units, e.g. `1.5 MiB`.
pub fn format_bytes(value: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    if value == 1 {
        return "1 Byte".to_string();
    }
    if value < 1024 {
        return format!("{} Bytes", value);
    }
    let mut size = value as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[derive(Serialize)]
struct NodeUtilization {
    hostname: String,
    cpu: String,
    memory: String,
}

#[derive(Serialize)]
struct ProcessView {
    hostname: String,
    key: String,
    max_rss: u64,
    avg_cpu: String,
}

#[derive(Serialize)]
struct RunView {
    key: String,
    workload: String,
    workload_params: String,
    environment: String,
    environment_params: String,
    index: usize,
    duration: String,
    monitoring_report: Option<String>,
    nodes: Vec<NodeUtilization>,
    processes: Vec<ProcessView>,
}

impl RunView {
    fn from_entry(entry: &BenchmarkEntry) -> Self {
        let record = &entry.record;
        let nodes = entry
            .report
            .monitoring()
            .iter()
            .map(|(node, records)| {
                let cpu: Vec<f64> = records.iter().map(|r| average(&r.resources.cpu)).collect();
                let mem: Vec<f64> = records.iter().map(|r| r.resources.mem).collect();
                NodeUtilization {
                    hostname: node.hostname.clone(),
                    cpu: format!("{:.2}", average(&cpu)),
                    memory: format!("{:.2}", average(&mem)),
                }
            })
            .collect();
        let processes = entry
            .process_stats
            .iter()
            .map(|(key, stats)| ProcessView {
                hostname: key.hostname.clone(),
                key: key.key.clone(),
                max_rss: stats.max_rss,
                avg_cpu: format!("{:.2}", stats.avg_cpu),
            })
            .collect();

        Self {
            key: record.key().to_string(),
            workload: record.workload.clone(),
            workload_params: crate::database::format_params(&record.workload_params),
            environment: record.environment.clone(),
            environment_params: crate::database::format_params(&record.environment_params),
            index: record.index,
            duration: match record.duration {
                Some(d) if !d.is_nan() => format!("{:.4} s", d),
                _ => "N/A".to_string(),
            },
            monitoring_report: entry
                .monitoring_report
                .as_ref()
                .map(|path| href_path(path)),
            nodes,
            processes,
        }
    }
}

#[derive(Serialize)]
struct Section {
    name: String,
    content: String,
}

/// Histogram chart of the durations, `None` when no duration is known.
pub fn render_durations(title: &str, durations: &[f64], bins: usize) -> Option<Chart> {
    let hist = histogram(durations, bins);
    if hist.is_empty() {
        return None;
    }
    let bars = hist
        .density
        .iter()
        .zip(hist.edges.windows(2))
        .map(|(top, edges)| Bar {
            left: edges[0],
            right: edges[1],
            top: *top,
        })
        .collect();
    Some(
        Chart::new(title)
            .with_labels("Duration [s]", "Density")
            .with_bars(bars)
            .fit_y_range(),
    )
}

/// Describe-style HTML table of duration statistics.
pub fn describe_table_html(stats: &DurationStats) -> String {
    let mut html = String::from("<table>\n<tr><th></th>");
    for column in DurationStats::COLUMNS {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n<tr><th>duration</th>");
    let _ = write!(html, "<td>{}</td>", stats.count);
    for value in &stats.values()[1..] {
        let _ = write!(html, "<td>{:.4}</td>", value);
    }
    html.push_str("</tr>\n</table>\n");
    html
}

/// Renders the HTML report tree from templates.
pub struct ReportComposer {
    env: Environment<'static>,
    histogram_bins: usize,
}

impl ReportComposer {
    /// Creates a composer with the embedded templates.
    pub fn new(config: &OverviewConfig) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("benchmark.html", BENCHMARK_TEMPLATE)?;
        env.add_template("workload.html", WORKLOAD_TEMPLATE)?;
        env.add_template("summary.html", SUMMARY_TEMPLATE)?;
        env.add_filter("format_bytes", format_bytes);
        Ok(Self {
            env,
            histogram_bins: config.histogram_bins,
        })
    }

    /// Renders the report of a single run.
    pub fn render_benchmark(&self, entry: &BenchmarkEntry) -> Result<String> {
        let template = self.env.get_template("benchmark.html")?;
        Ok(template.render(context! { run => RunView::from_entry(entry) })?)
    }

    /// Renders one benchmark cell: aggregated durations followed by the
    /// runs in sequence order.
    pub fn render_environment(&self, entry_map: &EntryMap, group: &RecordFrame) -> Result<String> {
        let mut content = String::from("<h3>Aggregated durations</h3>\n");
        content.push_str(&describe_table_html(&group.stats()));
        if let Some(chart) = render_durations("Durations", &group.durations(), self.histogram_bins) {
            content.push_str(&chart.to_svg());
        }

        content.push_str("\n<h3>Runs</h3>\n");
        for (idx, row) in group.sorted_by_index().into_iter().enumerate() {
            content.push_str("<hr>\n");
            let _ = write!(content, "{}: ", idx);
            if let Some(entry) = entry_map.get(&row.key) {
                content.push_str(&self.render_benchmark(entry)?);
            }
        }
        content.push_str("<hr>\n");
        Ok(content)
    }

    /// Renders all environments of one workload.
    pub fn render_workload(
        &self,
        entry_map: &EntryMap,
        workload: &WorkloadKey,
        data: &RecordFrame,
    ) -> Result<String> {
        let environments = groupby_environment(data)
            .into_iter()
            .map(|(env, group)| {
                Ok(Section {
                    name: format!(
                        "{}({}) [{}:{}]",
                        env.environment, env.params, workload.workload, workload.params
                    ),
                    content: self.render_environment(entry_map, &group)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let template = self.env.get_template("workload.html")?;
        Ok(template.render(context! { environments => environments })?)
    }

    /// Renders the top-level page with one section per workload.
    pub fn render_summary(&self, entry_map: &EntryMap, frame: &RecordFrame) -> Result<String> {
        let workloads = groupby_workload(frame)
            .into_iter()
            .map(|(workload, group)| {
                Ok(Section {
                    name: workload.to_string(),
                    content: self.render_workload(entry_map, &workload, &group)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let template = self.env.get_template("summary.html")?;
        Ok(template.render(context! {
            workloads => workloads,
            record_count => frame.len(),
            entry_count => entry_map.len(),
        })?)
    }
}

/// Materializes all entries and renders the summary page.
pub fn create_summary_page(
    database: &Database,
    directory: &Path,
    config: &OverviewConfig,
) -> Result<String> {
    let entry_map = pregenerate_entries(database, directory, config)?;
    let frame = RecordFrame::from_database(database);
    ReportComposer::new(config)?.render_summary(&entry_map, &frame)
}

/// Writes the summary page to `<directory>/index.html`.
pub fn generate_summary_html(
    database: &Database,
    directory: &Path,
    config: &OverviewConfig,
) -> Result<PathBuf> {
    let page = create_summary_page(database, directory, config)?;
    fs::create_dir_all(directory).map_err(|e| OverviewError::io_error(directory, e))?;
    let result_path = directory.join("index.html");
    fs::write(&result_path, page).map_err(|e| OverviewError::io_error(&result_path, e))?;
    info!(path = %result_path.display(), "Summary written");
    Ok(result_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::FrameRow;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(1), "1 Byte");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_describe_table() {
        let html = describe_table_html(&DurationStats::from_durations(&[2.0, 4.0, f64::NAN]));
        assert!(html.contains("<th>25%</th>"));
        assert!(html.contains("<td>2</td><td>3.0000</td>"));
    }

    #[test]
    fn test_render_durations() {
        let chart = render_durations("d", &[1.0, 2.0, f64::NAN], 4).unwrap();
        assert_eq!(chart.bars.len(), 4);
        assert!(render_durations("d", &[f64::NAN], 4).is_none());
    }

    #[test]
    fn test_environment_without_entries() {
        let composer = ReportComposer::new(&OverviewConfig::default()).unwrap();
        let frame = RecordFrame::from_rows(vec![FrameRow {
            key: "missing".to_string(),
            workload: "w".to_string(),
            workload_params: String::new(),
            environment: "e".to_string(),
            environment_params: String::new(),
            index: 0,
            duration: 1.0,
        }]);

        let html = composer.render_environment(&EntryMap::new(), &frame).unwrap();
        assert!(html.contains("<h3>Aggregated durations</h3>"));
        assert!(html.contains("<hr>\n0: <hr>"));
    }
}
