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

//! Report generation configuration.
//!
//! Controls the size of the materialization worker pool, progress reporting,
//! histogram resolution and the address used for comparison links.

use crate::error::{OverviewError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default number of histogram bins for duration distributions.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Default number of completed records between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Default address prefix for links on the comparison page.
pub const DEFAULT_SERVER_ADDR: &str = "http://localhost:5006";

/// Configuration of the overview engine.
///
/// # Example
///
/// ```no_run
/// use hqbench_overview::config::OverviewConfig;
///
/// let config = OverviewConfig::default()
///     .with_workers(4)
///     .with_progress_interval(1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverviewConfig {
    /// Worker pool size for materialization. `None` uses one worker per CPU.
    pub workers: Option<usize>,
    /// Completed records between progress events. 0 disables progress.
    pub progress_interval: usize,
    /// Bin count of duration histograms.
    pub histogram_bins: usize,
    /// Address prefix for comparison links.
    pub server_addr: String,
}

impl OverviewConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| OverviewError::io_error(path, e))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| OverviewError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(OverviewError::config("workers must be positive"));
        }
        if self.histogram_bins == 0 {
            return Err(OverviewError::config("histogram_bins must be positive"));
        }
        Ok(())
    }

    /// Sets the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the progress interval.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Sets the histogram bin count.
    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }

    /// Sets the comparison link address.
    pub fn with_server_addr(mut self, addr: impl Into<String>) -> Self {
        self.server_addr = addr.into();
        self
    }
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            workers: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}
