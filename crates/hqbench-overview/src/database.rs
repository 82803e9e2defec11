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

//! Benchmark database records.
//!
//! The database is a JSON array of executed benchmark instances. It is owned
//! by the benchmark runner; the overview engine only reads it.

use crate::error::{OverviewError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Workload or environment parameters.
pub type Params = BTreeMap<String, Value>;

/// Metadata attached to a record by the benchmark runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Working directory of the run, holding its cluster report.
    pub workdir: PathBuf,
    /// Unique run key.
    pub key: String,
    /// Any further runner-specific fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One executed benchmark instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    /// Workload identity.
    pub workload: String,
    /// Workload parameters.
    #[serde(default)]
    pub workload_params: Params,
    /// Environment identity.
    pub environment: String,
    /// Environment parameters.
    #[serde(default)]
    pub environment_params: Params,
    /// Sequence index of the run within its benchmark cell.
    #[serde(default)]
    pub index: usize,
    /// Duration in seconds, absent for failed or unfinished runs.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Unix timestamp of the run start.
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Runner metadata (working directory and run key).
    pub benchmark_metadata: RecordMetadata,
}

impl DatabaseRecord {
    /// Returns the run key.
    pub fn key(&self) -> &str {
        &self.benchmark_metadata.key
    }

    /// Returns the working directory of the run.
    pub fn workdir(&self) -> &Path {
        &self.benchmark_metadata.workdir
    }

    /// Returns the duration in seconds, `NaN` when absent.
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or(f64::NAN)
    }
}

/// Stringifies parameters as `k=v` pairs joined by `,` in key order.
///
/// String values are written without quotes, so `{"size": "large", "n": 2}`
/// becomes `n=2,size=large`.
pub fn format_params(params: &Params) -> String {
    params
        .iter()
        .map(|(name, value)| match value {
            Value::String(s) => format!("{}={}", name, s),
            other => format!("{}={}", name, other),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered collection of benchmark records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Database {
    records: Vec<DatabaseRecord>,
}

impl Database {
    /// Creates a database from in-memory records.
    pub fn from_records(records: Vec<DatabaseRecord>) -> Self {
        Self { records }
    }

    /// Loads a database from a JSON array file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| OverviewError::io_error(path, e))?;
        let records: Vec<DatabaseRecord> =
            serde_json::from_str(&content).map_err(|e| OverviewError::InvalidDatabase {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self { records })
    }

    /// Writes the database as a JSON array.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, json).map_err(|e| OverviewError::io_error(path, e))
    }

    /// Returns all records in insertion order.
    pub fn records(&self) -> &[DatabaseRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the database holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
