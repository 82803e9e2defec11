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

//! CLI command definitions and argument parsing.
//!
//! - [`report`]: summary commands (summary-html, summary-text)
//! - [`compare`]: comparison commands (compare, options)

mod compare;
mod report;

use clap::{Args, Subcommand};
use hqbench_overview::OverviewConfig;
use std::path::PathBuf;

pub use compare::CompareCommands;
pub use report::ReportCommands;

/// Options shared by all commands.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of worker threads for report generation
    #[arg(long, global = true, value_name = "N")]
    pub workers: Option<usize>,
}

impl GlobalArgs {
    /// Builds the effective configuration.
    ///
    /// Values from the command line override the configuration file.
    pub fn load_config(&self) -> Result<OverviewConfig, String> {
        let mut config = match &self.config {
            Some(path) => OverviewConfig::from_file(path).map_err(|e| e.to_string())?,
            None => OverviewConfig::default(),
        };
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Report (summary-html, summary-text)
/// └── Compare (compare, options)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    // Report commands - flattened to appear at top level
    #[command(flatten)]
    Report(ReportCommands),

    // Comparison commands - flattened to appear at top level
    #[command(flatten)]
    Compare(CompareCommands),
}

impl Commands {
    /// Execute the command with the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` with a readable message if loading the database or
    /// writing any report fails.
    pub fn execute(self, config: &OverviewConfig) -> Result<(), String> {
        match self {
            Commands::Report(cmd) => cmd.execute(config),
            Commands::Compare(cmd) => cmd.execute(config),
        }
    }
}
