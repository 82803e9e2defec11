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

//! Summary commands.

use crate::commands;
use clap::Subcommand;
use hqbench_overview::OverviewConfig;

/// Commands that summarize a whole database.
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Generate the HTML report tree
    ///
    /// Materializes every run, writes per-run monitoring reports and the
    /// top-level `index.html` into the output directory.
    SummaryHtml {
        /// Database file (JSON)
        #[arg(value_name = "DATABASE")]
        database: String,

        /// Output directory
        #[arg(value_name = "DIRECTORY")]
        directory: String,
    },

    /// Print the plain-text summary
    ///
    /// Durations grouped by workload, by environment and by benchmark.
    SummaryText {
        /// Database file (JSON)
        #[arg(value_name = "DATABASE")]
        database: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl ReportCommands {
    /// Execute the summary command.
    pub fn execute(self, config: &OverviewConfig) -> Result<(), String> {
        match self {
            ReportCommands::SummaryHtml {
                database,
                directory,
            } => commands::summary_html(&database, &directory, config),
            ReportCommands::SummaryText { database, output } => {
                commands::summary_text(&database, output.as_deref())
            }
        }
    }
}
