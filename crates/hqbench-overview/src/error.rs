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

//! Structured error types for report generation.
//!
//! All fallible operations of the overview engine return
//! `Result<T, OverviewError>`. Per-record failures during materialization are
//! isolated by the caller and never abort a whole batch.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for overview operations.
pub type Result<T> = std::result::Result<T, OverviewError>;

/// The main error type of the overview engine.
///
/// # Cloning
///
/// Implements `Clone` so that errors produced on rayon workers can be
/// reported after the results are joined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverviewError {
    /// I/O operation failed (file read, write, directory creation).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// The working directory of a run does not contain report data.
    ///
    /// The run is considered incomplete and is skipped by the materializer.
    #[error("Cluster report not found in '{workdir}'")]
    ReportNotFound {
        /// Working directory that was searched
        workdir: PathBuf,
    },

    /// Report data exists but could not be decoded.
    #[error("Invalid report file '{path}': {message}")]
    InvalidReport {
        /// The offending file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// The benchmark database could not be decoded.
    #[error("Invalid database file '{path}': {message}")]
    InvalidDatabase {
        /// The database file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {message}")]
    Json {
        /// The error message
        message: String,
    },

    /// Template loading or rendering failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Reason for invalidity
        message: String,
    },

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    /// A comparison was requested without any selected run.
    #[error("No runs selected for comparison")]
    EmptySelection,

    /// A run key that is not a selectable option was selected.
    #[error("Run '{key}' has no monitoring report and cannot be compared")]
    InvalidSelection {
        /// The rejected run key
        key: String,
    },
}

impl OverviewError {
    /// Create an I/O error with path context.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hqbench_overview::error::OverviewError;
    ///
    /// let result = std::fs::read_to_string("database.json")
    ///     .map_err(|e| OverviewError::io_error("database.json", e));
    /// ```
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this error means the run has no report data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ReportNotFound { .. })
    }
}

impl From<serde_json::Error> for OverviewError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
        }
    }
}

impl From<minijinja::Error> for OverviewError {
    fn from(source: minijinja::Error) -> Self {
        Self::Template(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = OverviewError::io_error(
            "out/index.html",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out/index.html"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_not_found() {
        let err = OverviewError::ReportNotFound {
            workdir: PathBuf::from("/runs/a"),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/runs/a"));
        assert!(!OverviewError::EmptySelection.is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: OverviewError = json_err.into();
        assert!(matches!(err, OverviewError::Json { .. }));
    }

    #[test]
    fn test_error_cloning() {
        let err = OverviewError::InvalidSelection {
            key: "run-1".to_string(),
        };
        assert_eq!(err.clone(), err);
    }
}
