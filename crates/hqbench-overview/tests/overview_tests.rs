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

//! End-to-end tests of the overview pipeline on generated run directories.
//!
//! Covers:
//! - grouping partitions and ordering
//! - statistics independence from input order
//! - artifact caching across materializations
//! - comparison identity, caching, strict intersection and axis sharing
//! - summary page and text summary output

use hqbench_overview::chart::{Chart, Layout};
use hqbench_overview::cluster::{ProcessRecord, Resources};
use hqbench_overview::compare::render_comparison;
use hqbench_overview::database::{Params, RecordMetadata};
use hqbench_overview::grouping::FrameRow;
use hqbench_overview::*;
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

// ===== Fixtures =====

fn params(pairs: &[(&str, serde_json::Value)]) -> Params {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn record(
    key: &str,
    workload: &str,
    environment: &str,
    index: usize,
    duration: Option<f64>,
    workdir: &Path,
) -> DatabaseRecord {
    DatabaseRecord {
        workload: workload.to_string(),
        workload_params: params(&[("tasks", json!(10))]),
        environment: environment.to_string(),
        environment_params: params(&[("workers", json!(2))]),
        index,
        duration,
        timestamp: None,
        benchmark_metadata: RecordMetadata {
            workdir: workdir.to_path_buf(),
            key: key.to_string(),
            extra: BTreeMap::new(),
        },
    }
}

fn sample(timestamp: f64, cpu: f64, mem: f64) -> MonitoringRecord {
    let mut processes = BTreeMap::new();
    processes.insert(
        "1234".to_string(),
        ProcessRecord {
            key: "worker".to_string(),
            cpu: cpu / 2.0,
            rss: 64 * 1024 * 1024,
        },
    );
    MonitoringRecord {
        timestamp,
        resources: Resources {
            cpu: vec![cpu],
            mem,
            ..Resources::default()
        },
        processes,
    }
}

/// Writes a run directory whose node "A" peaks at `cpu_peak`.
fn write_run(workdir: &Path, cpu_peak: f64, with_profile: bool) {
    fs::create_dir_all(workdir).expect("Failed to create run dir");
    let node = ClusterNode::new("A", "worker");
    ClusterReport::new(workdir, vec![node.clone()])
        .with_monitoring(
            node,
            vec![sample(100.0, cpu_peak / 2.0, 20.0), sample(101.0, cpu_peak, 30.0)],
        )
        .save()
        .expect("Failed to save report");
    if with_profile {
        let profiling = workdir.join("profiling");
        fs::create_dir_all(&profiling).expect("Failed to create profiling dir");
        fs::write(profiling.join("worker.txt"), "main 100%").expect("Failed to write profile");
    }
}

struct Workspace {
    _root: TempDir,
    runs: PathBuf,
    output: PathBuf,
}

fn workspace() -> Workspace {
    let root = tempdir().expect("Failed to create temp dir");
    let runs = root.path().join("runs");
    let output = root.path().join("out");
    Workspace {
        _root: root,
        runs,
        output,
    }
}

/// Database with run1 (peak 10) and run2 (peak 25) plus run3 without a
/// report.
fn comparison_database(ws: &Workspace, profiles: (bool, bool)) -> Database {
    let run1 = ws.runs.join("run1");
    let run2 = ws.runs.join("run2");
    let run3 = ws.runs.join("run3");
    write_run(&run1, 10.0, profiles.0);
    write_run(&run2, 25.0, profiles.1);
    fs::create_dir_all(&run3).expect("Failed to create run dir");
    Database::from_records(vec![
        record("run1", "sleep", "hq", 0, Some(1.0), &run1),
        record("run2", "sleep", "hq", 1, Some(2.0), &run2),
        record("run3", "sleep", "hq", 2, None, &run3),
    ])
}

fn config() -> OverviewConfig {
    OverviewConfig::default().with_workers(2)
}

fn charts<'a>(layout: &'a Layout, out: &mut Vec<&'a Chart>) {
    match layout {
        Layout::Chart(chart) => out.push(chart),
        Layout::Html(_) => {}
        Layout::Row(children) | Layout::Column(children) => {
            for child in children {
                charts(child, out);
            }
        }
        Layout::Tabs(panels) => {
            for panel in panels {
                charts(&panel.child, out);
            }
        }
    }
}

fn section<'a>(layout: &'a Layout, title: &str) -> Option<&'a Layout> {
    match layout {
        Layout::Tabs(panels) => panels
            .iter()
            .find(|panel| panel.title == title)
            .map(|panel| &panel.child),
        _ => None,
    }
}

fn comparison_files(output: &Path) -> usize {
    fs::read_dir(output.join("comparisons"))
        .expect("Failed to read comparisons")
        .count()
}

// ===== Grouping =====

fn frame_row() -> impl Strategy<Value = FrameRow> {
    (
        "[a-c]",
        "(n=[1-2])?",
        "[x-z]",
        "(w=[1-2])?",
        0usize..5,
        prop_oneof![Just(f64::NAN), 0.0f64..100.0],
    )
        .prop_map(
            |(workload, workload_params, environment, environment_params, index, duration)| {
                FrameRow {
                    key: format!("{}{}{}", workload, environment, index),
                    workload,
                    workload_params,
                    environment,
                    environment_params,
                    index,
                    duration,
                }
            },
        )
}

proptest! {
    #[test]
    fn prop_groups_partition_the_frame(rows in prop::collection::vec(frame_row(), 0..40)) {
        let frame = RecordFrame::from_rows(rows.clone());

        let by_workload = groupby_workload(&frame);
        let total: usize = by_workload.values().map(RecordFrame::len).sum();
        prop_assert_eq!(total, rows.len());
        for (key, group) in &by_workload {
            prop_assert!(!group.is_empty());
            for row in group.rows() {
                prop_assert_eq!(&row.workload, &key.workload);
                prop_assert_eq!(&row.workload_params, &key.params);
            }
        }

        let keys: Vec<_> = groupby_environment(&frame).into_keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);

        let cells: usize = groupby_benchmark(&frame).values().map(RecordFrame::len).sum();
        prop_assert_eq!(cells, rows.len());
    }

    #[test]
    fn prop_stats_ignore_input_order(
        mut durations in prop::collection::vec(prop_oneof![Just(f64::NAN), 0.0f64..50.0], 1..30)
    ) {
        let forward = DurationStats::from_durations(&durations);
        durations.reverse();
        let backward = DurationStats::from_durations(&durations);

        prop_assert_eq!(forward.count, backward.count);
        if forward.count > 0 {
            prop_assert!((forward.mean - backward.mean).abs() < 1e-9);
            prop_assert_eq!(forward.min, backward.min);
            prop_assert_eq!(forward.max, backward.max);
            prop_assert_eq!(forward.median, backward.median);
        }
    }
}

// ===== Materialization =====

#[test]
fn test_materialization_is_idempotent() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));

    let first = pregenerate_entries(&database, &ws.output, &config()).expect("first run");
    assert_eq!(first.len(), 2);
    assert!(!first.contains_key("run3"));

    let artifact = ws.output.join("monitoring/run1.html");
    let modified = fs::metadata(&artifact).and_then(|m| m.modified()).expect("mtime");

    let second = pregenerate_entries(&database, &ws.output, &config()).expect("second run");
    assert_eq!(second.len(), 2);
    let unchanged = fs::metadata(&artifact).and_then(|m| m.modified()).expect("mtime");
    assert_eq!(modified, unchanged);
}

// ===== Comparison =====

#[test]
fn test_options_exclude_runs_without_monitoring() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));
    let page = ComparisonPage::new(&database, &ws.output, "http://localhost:5006", &config())
        .expect("page");

    assert_eq!(page.options(), ["run1".to_string(), "run2".to_string()]);
    assert!(page.index().is_empty());
    assert!(ws.output.join("comparisons").is_dir());
}

#[test]
fn test_compare_generates_once() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));
    let mut page =
        ComparisonPage::new(&database, &ws.output, "http://localhost:5006", &config())
            .expect("page");

    page.select(&["run1", "run2"]).expect("select");
    let outcome = page.compare().expect("compare");
    assert!(matches!(outcome, CompareOutcome::Generated(_)));
    assert_eq!(comparison_files(&ws.output), 1);
    assert!(outcome.path().ends_with("comparisons/run1_run2.html"));

    page.select(&["run2", "run1"]).expect("select");
    let again = page.compare().expect("compare");
    assert!(matches!(again, CompareOutcome::Cached(_)));
    assert_eq!(comparison_files(&ws.output), 1);

    assert_eq!(
        page.links(),
        vec![(
            "http://localhost:5006/comparisons/run1_run2.html".to_string(),
            "run1_run2".to_string()
        )]
    );
}

#[test]
fn test_index_survives_page_rebuild() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));
    {
        let mut page = ComparisonPage::new(&database, &ws.output, "http://x", &config())
            .expect("page");
        page.select(&["run1"]).expect("select");
        page.compare().expect("compare");
    }

    let mut page =
        ComparisonPage::new(&database, &ws.output, "http://x", &config()).expect("page");
    assert!(page.index().contains("run1.html"));
    page.select(&["run1"]).expect("select");
    assert!(matches!(page.compare(), Ok(CompareOutcome::Cached(_))));
    assert!(page.render_page().contains("http://x/comparisons/run1.html"));
}

#[test]
fn test_invalid_selections_are_rejected() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));
    let mut page =
        ComparisonPage::new(&database, &ws.output, "http://x", &config()).expect("page");

    assert_eq!(page.compare(), Err(OverviewError::EmptySelection));
    assert_eq!(
        page.select(&["run1", "run3"]),
        Err(OverviewError::InvalidSelection {
            key: "run3".to_string()
        })
    );
    assert!(page.selection().is_empty());
}

#[test]
fn test_path_like_keys_stay_inside_output() {
    let ws = workspace();
    let keys = ["x/y", "z", "../../escape"];
    let records = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let workdir = ws.runs.join(format!("run{}", i));
            write_run(&workdir, 10.0, false);
            record(key, "sleep", "hq", i, Some(1.0), &workdir)
        })
        .collect();
    let database = Database::from_records(records);
    let mut page =
        ComparisonPage::new(&database, &ws.output, "http://x", &config()).expect("page");

    assert_eq!(page.options(), keys.map(String::from));
    assert!(ws.output.join("monitoring/x%2Fy.html").is_file());
    assert!(ws.output.join("monitoring/%2E.%2F..%2Fescape.html").is_file());
    let root = ws.output.parent().expect("output parent");
    assert!(!root.join("escape.html").exists());

    page.select(&["x/y", "z"]).expect("select");
    let outcome = page.compare().expect("compare");
    assert!(matches!(outcome, CompareOutcome::Generated(_)));
    assert!(outcome.path().ends_with("comparisons/x%2Fy_z.html"));
    assert!(outcome.path().is_file());
    assert_eq!(
        page.links()[0].0,
        "http://x/comparisons/x%252Fy_z.html".to_string()
    );
}

#[test]
fn test_underscored_keys_get_distinct_comparisons() {
    let ws = workspace();
    let keys = ["a_b", "c", "a", "b_c"];
    let records = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let workdir = ws.runs.join(format!("run{}", i));
            write_run(&workdir, 10.0, false);
            record(key, "sleep", "hq", i, Some(1.0), &workdir)
        })
        .collect();
    let database = Database::from_records(records);
    let mut page =
        ComparisonPage::new(&database, &ws.output, "http://x", &config()).expect("page");

    page.select(&["a_b", "c"]).expect("select");
    assert!(matches!(page.compare(), Ok(CompareOutcome::Generated(_))));
    page.select(&["a", "b_c"]).expect("select");
    assert!(matches!(page.compare(), Ok(CompareOutcome::Generated(_))));
    assert_eq!(comparison_files(&ws.output), 2);
}

#[test]
fn test_node_axes_are_shared() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));
    let entries = pregenerate_entries(&database, &ws.output, &config()).expect("entries");
    let selected = [&entries["run1"], &entries["run2"]];

    let layout = render_comparison(&selected);
    let node_usage = section(&layout, "Node usage").expect("node usage section");
    let mut node_charts = Vec::new();
    charts(node_usage, &mut node_charts);

    let cpu: Vec<_> = node_charts.iter().filter(|c| c.title == "A CPU").collect();
    assert_eq!(cpu.len(), 2);
    assert!(cpu.iter().all(|chart| chart.y_range.end == 25.0));

    // Other sections keep their own scale.
    let global = section(&layout, "Global usage").expect("global usage section");
    let mut global_charts = Vec::new();
    charts(global, &mut global_charts);
    assert!(global_charts.iter().any(|chart| chart.y_range.end == 10.0));
}

#[test]
fn test_partial_sections_are_dropped() {
    let ws = workspace();
    let database = comparison_database(&ws, (true, false));
    let entries = pregenerate_entries(&database, &ws.output, &config()).expect("entries");

    let layout = render_comparison(&[&entries["run1"], &entries["run2"]]);
    assert!(section(&layout, "Profiling data").is_none());
    assert!(section(&layout, "Process usage").is_some());

    let single = render_comparison(&[&entries["run1"]]);
    assert!(section(&single, "Profiling data").is_some());
}

// ===== Composition =====

#[test]
fn test_summary_html() {
    let ws = workspace();
    let database = comparison_database(&ws, (false, false));

    let index = generate_summary_html(&database, &ws.output, &config()).expect("summary");
    assert_eq!(index, ws.output.join("index.html"));

    let html = fs::read_to_string(&index).expect("index.html");
    assert!(html.contains("sleep(tasks=10)"));
    assert!(html.contains("hq(workers=2) [sleep:tasks=10]"));
    assert!(html.contains("run1.html"));
    assert!(html.contains("Monitoring report"));
    assert!(html.contains("3 runs, 2 with reports"));
}

#[test]
fn test_text_summary() {
    let dir = tempdir().expect("temp dir");
    let database = Database::from_records(vec![
        record("a", "sleep", "hq", 0, Some(1.0), dir.path()),
        record("b", "sleep", "hq", 1, Some(3.0), dir.path()),
        record("c", "sleep", "dask", 0, None, dir.path()),
    ]);

    let path = dir.path().join("reports/summary.txt");
    assert!(generate_summary_text_file(&database, &path).expect("summary"));

    let text = fs::read_to_string(&path).expect("summary.txt");
    assert!(text.starts_with("Grouped by workload:\nsleep tasks=10\n"));
    assert!(text.contains("\thq workers=2: 2.0000 s (min=1.0000, max=3.0000)\n"));
    assert!(text.contains("Grouped by environment:\ndask workers=2\n"));
    assert!(text.contains("(mean): 2.0000 s"));
    assert!(text.contains("Grouped by benchmark:\nsleep tasks=10 dask workers=2\n"));
}

#[test]
fn test_empty_text_summary_writes_nothing() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("summary.txt");

    let written = generate_summary_text_file(&Database::default(), &path).expect("summary");
    assert!(!written);
    assert!(!path.exists());
}
