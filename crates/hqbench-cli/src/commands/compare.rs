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

//! Compare commands - comparison of selected runs

use super::load_database;
use colored::Colorize;
use hqbench_overview::{CompareOutcome, ComparisonPage, OverviewConfig};
use std::fs;
use std::path::Path;

/// File name of the rendered comparison page.
pub const COMPARER_PAGE: &str = "comparer.html";

/// Compare the runs `keys` and refresh the comparer page.
///
/// A comparison of the same set of runs is generated only once; later
/// requests report the cached artifact.
///
/// # Errors
///
/// Returns `Err` if a key has no monitoring data, no key is given, or any
/// file cannot be written.
pub fn compare(
    database: &str,
    directory: &str,
    keys: &[String],
    addr: &str,
    config: &OverviewConfig,
) -> Result<(), String> {
    let db = load_database(database)?;
    let mut page = ComparisonPage::new(&db, directory, addr, config)
        .map_err(|e| format!("Failed to build comparison page: {}", e))?;

    page.select(keys).map_err(|e| e.to_string())?;
    match page.compare().map_err(|e| e.to_string())? {
        CompareOutcome::Generated(path) => {
            println!("{} {}", "Generated".green().bold(), path.display())
        }
        CompareOutcome::Cached(path) => {
            println!("{} {}", "Cached".cyan().bold(), path.display())
        }
    }

    let comparer = Path::new(directory).join(COMPARER_PAGE);
    fs::write(&comparer, page.render_page())
        .map_err(|e| format!("Failed to write '{}': {}", comparer.display(), e))?;
    Ok(())
}

/// List runs that can be selected for comparison, one per line.
pub fn options(database: &str, directory: &str, config: &OverviewConfig) -> Result<(), String> {
    let db = load_database(database)?;
    let page = ComparisonPage::new(&db, directory, config.server_addr.clone(), config)
        .map_err(|e| format!("Failed to build comparison page: {}", e))?;

    if page.options().is_empty() {
        eprintln!("{} No runs with monitoring data", "Warning:".yellow().bold());
    }
    for key in page.options() {
        println!("{}", key);
    }
    Ok(())
}
