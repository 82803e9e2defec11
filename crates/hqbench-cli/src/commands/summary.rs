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

//! Summary commands - HTML report tree and text summary

use super::load_database;
use colored::Colorize;
use hqbench_overview::{generate_summary_html, generate_summary_text, generate_summary_text_file};
use hqbench_overview::OverviewConfig;
use std::io;
use std::path::Path;

/// Generate the HTML report tree of a database.
///
/// Prints the path of the written `index.html`.
///
/// # Examples
///
/// ```no_run
/// use hqbench_cli::commands::summary_html;
/// use hqbench_overview::OverviewConfig;
///
/// # fn main() -> Result<(), String> {
/// summary_html("database.json", "out", &OverviewConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn summary_html(database: &str, directory: &str, config: &OverviewConfig) -> Result<(), String> {
    let db = load_database(database)?;
    let index = generate_summary_html(&db, Path::new(directory), config)
        .map_err(|e| format!("Failed to generate summary: {}", e))?;
    println!("{} {}", "✓".green().bold(), index.display());
    Ok(())
}

/// Write the text summary to `output`, or to stdout when absent.
///
/// An empty database is not an error; a warning is printed instead.
pub fn summary_text(database: &str, output: Option<&str>) -> Result<(), String> {
    let db = load_database(database)?;
    let written = match output {
        Some(path) => generate_summary_text_file(&db, Path::new(path)).map_err(|e| e.to_string()),
        None => generate_summary_text(&db, &mut io::stdout().lock()).map_err(|e| e.to_string()),
    }
    .map_err(|e| format!("Failed to write text summary: {}", e))?;

    if !written {
        eprintln!("{} No data found in {}", "Warning:".yellow().bold(), database);
    } else if let Some(path) = output {
        println!("{} {}", "✓".green().bold(), path);
    }
    Ok(())
}
