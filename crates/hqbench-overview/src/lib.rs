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

//! Aggregation and report synthesis for benchmark runs.
//!
//! This crate turns a database of benchmark records into a navigable report
//! tree and an on-demand comparison of selected runs.
//!
//! # Pipeline
//!
//! - **Grouping** ([`grouping`]): records are flattened into a
//!   [`RecordFrame`] and partitioned by workload, environment or both, always
//!   in key order.
//! - **Aggregation** ([`statistics`]): describe-style duration statistics and
//!   density histograms per group.
//! - **Materialization** ([`materialize`]): every record is enriched with its
//!   cluster report on a Rayon pool; monitoring artifacts are cached on disk.
//! - **Composition** ([`compose`]): the HTML report tree and the plain-text
//!   summary.
//! - **Comparison** ([`compare`]): combined views of selected runs with shared
//!   per-node axes, generated once per set of runs.
//!
//! # Example
//!
//! ```no_run
//! use hqbench_overview::{generate_summary_html, Database, OverviewConfig};
//!
//! # fn main() -> hqbench_overview::Result<()> {
//! let database = Database::load("database.json")?;
//! let config = OverviewConfig::default().with_workers(4);
//! let index = generate_summary_html(&database, "out".as_ref(), &config)?;
//! println!("{}", index.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Output layout
//!
//! ```text
//! <directory>/index.html
//! <directory>/monitoring/<key>.html
//! <directory>/comparisons/<key>_<key>.html
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod chart;
pub mod cluster;
pub mod compare;
pub mod compose;
pub mod config;
pub mod database;
pub mod error;
pub mod grouping;
pub mod materialize;
pub mod monitor;
pub mod statistics;

pub use cluster::{ClusterNode, ClusterReport, MonitoringRecord, ProcessKey, ProcessStats};
pub use compare::{comparison_identity, CompareOutcome, ComparisonIndex, ComparisonPage};
pub use compose::{
    create_summary_page, generate_summary_html, generate_summary_text,
    generate_summary_text_file, ReportComposer,
};
pub use config::OverviewConfig;
pub use database::{Database, DatabaseRecord};
pub use error::{OverviewError, Result};
pub use grouping::{
    groupby_benchmark, groupby_environment, groupby_workload, BenchmarkKey, EnvironmentKey,
    RecordFrame, WorkloadKey,
};
pub use materialize::{
    file_component, generate_entry, pregenerate_entries, BenchmarkEntry, EntryMap,
};
pub use statistics::DurationStats;
