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

//! Comparison commands.

use crate::commands;
use clap::Subcommand;
use hqbench_overview::OverviewConfig;

/// Commands operating on the comparison page.
#[derive(Subcommand)]
pub enum CompareCommands {
    /// Compare selected runs
    ///
    /// Generates `comparisons/<keys>.html` unless a comparison of the same
    /// set of runs already exists, then refreshes `comparer.html`.
    Compare {
        /// Database file (JSON)
        #[arg(value_name = "DATABASE")]
        database: String,

        /// Output directory
        #[arg(value_name = "DIRECTORY")]
        directory: String,

        /// Run keys to compare
        #[arg(short, long, num_args = 1.., required = true)]
        keys: Vec<String>,

        /// Base address used in comparison links
        #[arg(long)]
        addr: Option<String>,
    },

    /// List runs that can be compared
    ///
    /// Only runs with monitoring data are listed, in database order.
    Options {
        /// Database file (JSON)
        #[arg(value_name = "DATABASE")]
        database: String,

        /// Output directory
        #[arg(value_name = "DIRECTORY")]
        directory: String,
    },
}

impl CompareCommands {
    /// Execute the comparison command.
    pub fn execute(self, config: &OverviewConfig) -> Result<(), String> {
        match self {
            CompareCommands::Compare {
                database,
                directory,
                keys,
                addr,
            } => {
                let addr = addr.unwrap_or_else(|| config.server_addr.clone());
                commands::compare(&database, &directory, &keys, &addr, config)
            }
            CompareCommands::Options {
                database,
                directory,
            } => commands::options(&database, &directory, config),
        }
    }
}
