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

//! HQBench Command Line Interface

use clap::Parser;
use hqbench_cli::cli::{Commands, GlobalArgs};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// HQBench - benchmark overview and comparison
///
/// Aggregates the results of benchmark runs into an HTML report tree, a
/// plain-text summary, and comparisons of selected runs.
///
/// # Examples
///
/// ```bash
/// # Build the report tree
/// hqbench summary-html database.json out/
///
/// # Print the text summary
/// hqbench summary-text database.json
///
/// # Compare two runs
/// hqbench compare database.json out/ --keys run1 run2
/// ```
#[derive(Parser)]
#[command(name = "hqbench")]
#[command(author, version, about = "HQBench - benchmark overview and comparison", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("hqbench_overview=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.global.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command.execute(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
