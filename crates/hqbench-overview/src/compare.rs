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

//! Comparison of selected runs.
//!
//! A [`ComparisonPage`] owns the materialized entries, the current selection
//! and a [`ComparisonIndex`] that mirrors the files under
//! `<directory>/comparisons`. A comparison is identified by its sorted run
//! keys, so every distinct set of runs is rendered at most once per output
//! directory.

use crate::chart::{escape_html, render_document, Layout, Panel};
use crate::config::OverviewConfig;
use crate::database::Database;
use crate::error::{OverviewError, Result};
use crate::materialize::{
    file_component, href_path, pregenerate_entries, BenchmarkEntry, EntryMap,
};
use crate::monitor::{
    create_global_resources_df, create_per_process_resources_df, render_global_resource_usage,
    render_nodes_resource_usage, render_process_resource_usage, render_profiling_data,
    NodeUsageView,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory of comparison artifacts, relative to the output directory.
pub const COMPARISONS_DIR: &str = "comparisons";

/// Canonical identity of a set of run keys: sorted, de-duplicated and
/// joined by `_`.
///
/// Each key is encoded with [`file_component`] and its own underscores are
/// escaped as `%5F`, so the joined name is a single file name and two
/// different sets never share an identity.
pub fn comparison_identity<S: AsRef<str>>(keys: &[S]) -> String {
    let keys: BTreeSet<&str> = keys.iter().map(AsRef::as_ref).collect();
    keys.into_iter()
        .map(|key| file_component(key).replace('_', "%5F"))
        .collect::<Vec<_>>()
        .join("_")
}


/// Result of a compare action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareOutcome {
    /// A new artifact was written to this path.
    Generated(PathBuf),
    /// The artifact already existed at this path.
    Cached(PathBuf),
}

impl CompareOutcome {
    /// Path of the artifact.
    pub fn path(&self) -> &Path {
        match self {
            CompareOutcome::Generated(path) | CompareOutcome::Cached(path) => path,
        }
    }
}

/// Known comparison artifacts: file name to location relative to the output
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ComparisonIndex {
    /// Scans `<directory>/comparisons` for existing artifacts.
    pub fn scan(directory: &Path) -> Result<Self> {
        let comparisons = directory.join(COMPARISONS_DIR);
        let mut entries = BTreeMap::new();
        let read_dir =
            fs::read_dir(&comparisons).map_err(|e| OverviewError::io_error(&comparisons, e))?;
        for entry in read_dir {
            let entry = entry.map_err(|e| OverviewError::io_error(&comparisons, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.insert(name.clone(), Path::new(COMPARISONS_DIR).join(name));
        }
        Ok(Self { entries })
    }

    /// Returns true if an artifact with this file name is known.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registers an artifact and returns its relative location.
    pub fn register(&mut self, name: impl Into<String>) -> PathBuf {
        let name = name.into();
        let location = Path::new(COMPARISONS_DIR).join(&name);
        self.entries.insert(name, location.clone());
        location
    }

    /// Artifacts sorted by file name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, location)| (name.as_str(), location.as_path()))
    }

    /// Number of known artifacts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no artifact is known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sections of the comparison view, in display order.
const SECTIONS: [&str; 4] = ["Profiling data", "Global usage", "Node usage", "Process usage"];

/// Rewrites the y upper bound of every chart to the maximum across views,
/// per chart title.
pub fn normalize_node_axes(views: &mut [NodeUsageView]) {
    let mut maxes: BTreeMap<String, f64> = BTreeMap::new();
    for chart in views.iter().flat_map(|view| view.charts.iter()) {
        let end = chart.y_range.end;
        maxes
            .entry(chart.title.clone())
            .and_modify(|max| *max = max.max(end))
            .or_insert(end);
    }
    for chart in views.iter_mut().flat_map(|view| view.charts.iter_mut()) {
        if let Some(max) = maxes.get(&chart.title) {
            chart.y_range.end = *max;
        }
    }
}

/// Builds the combined view of `entries`.
///
/// A section is shown only if every entry contributed to it.
pub fn render_comparison(entries: &[&BenchmarkEntry]) -> Layout {
    let mut profiling = Vec::new();
    let mut global = Vec::new();
    let mut nodes: Vec<(String, NodeUsageView)> = Vec::new();
    let mut processes = Vec::new();

    for entry in entries {
        let report = &entry.report;
        let name = report.name();

        if !report.profiling_data().is_empty() {
            profiling.push(Layout::subtab(render_profiling_data(report), name.clone()));
        }

        let resources = create_global_resources_df(report.monitoring());
        if !resources.is_empty() {
            global.push(Layout::subtab(
                render_global_resource_usage(report, &resources),
                name.clone(),
            ));
            nodes.push((name.clone(), render_nodes_resource_usage(report, &resources)));
        }

        let process_rows = create_per_process_resources_df(report.monitoring());
        if !process_rows.is_empty() {
            processes.push(Layout::subtab(
                render_process_resource_usage(report, &process_rows),
                name,
            ));
        }
    }

    let (names, mut views): (Vec<String>, Vec<NodeUsageView>) = nodes.into_iter().unzip();
    normalize_node_axes(&mut views);
    let node_usage: Vec<Layout> = names
        .into_iter()
        .zip(views)
        .map(|(name, view)| Layout::subtab(view.into_layout(), name))
        .collect();

    let panels = SECTIONS
        .iter()
        .zip([profiling, global, node_usage, processes])
        .filter(|(_, widgets)| !widgets.is_empty() && widgets.len() == entries.len())
        .map(|(title, widgets)| Panel::new(*title, Layout::Row(widgets)))
        .collect();
    Layout::Tabs(panels)
}

/// Interactive comparison surface over the materialized entries.
pub struct ComparisonPage {
    directory: PathBuf,
    addr: String,
    entry_map: EntryMap,
    options: Vec<String>,
    selection: Vec<String>,
    index: ComparisonIndex,
}

impl ComparisonPage {
    /// Materializes all entries of `database` and indexes the existing
    /// comparisons under `directory`.
    pub fn new(
        database: &Database,
        directory: impl Into<PathBuf>,
        addr: impl Into<String>,
        config: &OverviewConfig,
    ) -> Result<Self> {
        let directory = directory.into();
        let entry_map = pregenerate_entries(database, &directory, config)?;

        let comparisons = directory.join(COMPARISONS_DIR);
        fs::create_dir_all(&comparisons).map_err(|e| OverviewError::io_error(&comparisons, e))?;
        let index = ComparisonIndex::scan(&directory)?;

        let options = database
            .records()
            .iter()
            .map(|record| record.key())
            .filter(|key| {
                entry_map
                    .get(*key)
                    .is_some_and(|entry| entry.monitoring_report.is_some())
            })
            .map(str::to_string)
            .collect();

        debug!(existing = index.len(), "Comparison page created");
        Ok(Self {
            directory,
            addr: addr.into(),
            entry_map,
            options,
            selection: Vec::new(),
            index,
        })
    }

    /// Run keys that can be selected, in database order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The current selection.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Materialized entries by run key.
    pub fn entry_map(&self) -> &EntryMap {
        &self.entry_map
    }

    /// The comparison index.
    pub fn index(&self) -> &ComparisonIndex {
        &self.index
    }

    /// Replaces the selection.
    ///
    /// # Errors
    ///
    /// Returns [`OverviewError::InvalidSelection`] for a key that is not one
    /// of [`ComparisonPage::options`]; the selection is left unchanged.
    pub fn select<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<()> {
        if let Some(key) = keys
            .iter()
            .map(AsRef::as_ref)
            .find(|key| !self.options.iter().any(|option| option == key))
        {
            return Err(OverviewError::InvalidSelection {
                key: key.to_string(),
            });
        }
        self.selection = keys.iter().map(|key| key.as_ref().to_string()).collect();
        Ok(())
    }

    /// Generates the comparison of the current selection unless it already
    /// exists.
    pub fn compare(&mut self) -> Result<CompareOutcome> {
        if self.selection.is_empty() {
            return Err(OverviewError::EmptySelection);
        }
        let name = format!("{}.html", comparison_identity(&self.selection));
        if self.index.contains(&name) {
            debug!(name = %name, "Comparison already exists");
            return Ok(CompareOutcome::Cached(
                self.directory.join(COMPARISONS_DIR).join(&name),
            ));
        }

        let keys: BTreeSet<&str> = self.selection.iter().map(String::as_str).collect();
        let entries: Vec<&BenchmarkEntry> =
            keys.iter().filter_map(|key| self.entry_map.get(*key)).collect();
        let html = render_document("Comparison", &render_comparison(&entries));

        let path = self.directory.join(COMPARISONS_DIR).join(&name);
        fs::write(&path, html).map_err(|e| OverviewError::io_error(&path, e))?;
        self.index.register(name);
        info!(path = %path.display(), runs = entries.len(), "Comparison generated");
        Ok(CompareOutcome::Generated(path))
    }

    /// Links to all known comparisons as `(href, label)` pairs.
    pub fn links(&self) -> Vec<(String, String)> {
        self.index
            .iter()
            .map(|(name, location)| {
                let href = format!(
                    "{}/{}",
                    self.addr.trim_end_matches('/'),
                    href_path(location)
                );
                let label = Path::new(name)
                    .file_stem()
                    .map_or_else(|| name.to_string(), |stem| stem.to_string_lossy().into_owned());
                (href, label)
            })
            .collect()
    }

    /// Renders the page: selectable runs followed by the known comparisons.
    pub fn render_page(&self) -> String {
        let mut html = String::from("<h2>Runs</h2>\n<ul class=\"options\">\n");
        for option in &self.options {
            let checked = if self.selection.contains(option) {
                " checked"
            } else {
                ""
            };
            let key = escape_html(option);
            let _ = writeln!(
                html,
                "<li><label><input type=\"checkbox\" name=\"run\" value=\"{}\"{}> {}</label></li>",
                key, checked, key
            );
        }
        html.push_str("</ul>\n<h2>Comparisons</h2>\n<ul class=\"comparisons\">\n");
        for (href, label) in self.links() {
            let _ = writeln!(
                html,
                "<li><a href='{}'>{}</a></li>",
                escape_html(&href),
                escape_html(&label)
            );
        }
        html.push_str("</ul>\n");
        render_document("Comparer", &Layout::Html(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Chart;

    fn view(title: &str, max: f64) -> NodeUsageView {
        NodeUsageView {
            header: String::new(),
            charts: vec![Chart::new(title)
                .with_series("A", vec![(0.0, max)])
                .fit_y_range()],
        }
    }

    #[test]
    fn test_identity_is_order_independent() {
        assert_eq!(comparison_identity(&["run2", "run1"]), "run1_run2");
        assert_eq!(comparison_identity(&["run1", "run2", "run1"]), "run1_run2");
    }

    #[test]
    fn test_identity_separates_underscored_keys() {
        let first = comparison_identity(&["a_b", "c"]);
        let second = comparison_identity(&["a", "b_c"]);
        assert_eq!(first, "a%5Fb_c");
        assert_eq!(second, "a_b%5Fc");
        assert_ne!(first, second);
        assert_eq!(comparison_identity(&["x/y", "z"]), "x%2Fy_z");
    }


    #[test]
    fn test_normalize_node_axes() {
        let mut views = vec![view("A CPU", 10.0), view("A CPU", 25.0), view("B CPU", 5.0)];
        normalize_node_axes(&mut views);
        assert_eq!(views[0].charts[0].y_range.end, 25.0);
        assert_eq!(views[1].charts[0].y_range.end, 25.0);
        assert_eq!(views[2].charts[0].y_range.end, 5.0);
    }

    #[test]
    fn test_index_register() {
        let mut index = ComparisonIndex::default();
        let location = index.register("a_b.html");
        assert_eq!(location, PathBuf::from("comparisons/a_b.html"));
        assert!(index.contains("a_b.html"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_empty_comparison_has_no_sections() {
        assert_eq!(render_comparison(&[]), Layout::Tabs(Vec::new()));
    }
}
