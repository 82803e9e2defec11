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

//! CLI command implementations

mod compare;
mod summary;

pub use compare::{compare, options};
pub use summary::{summary_html, summary_text};

use hqbench_overview::Database;
use tracing::debug;

/// Load a benchmark database, mapping failures to a readable message.
pub fn load_database(path: &str) -> Result<Database, String> {
    let database = Database::load(path).map_err(|e| format!("Failed to load database: {}", e))?;
    debug!(path, records = database.len(), "Database loaded");
    Ok(database)
}
