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

//! HQBench CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Reports
//!
//! - **summary-html**: Generate the HTML report tree (`index.html` plus
//!   per-run monitoring reports)
//! - **summary-text**: Plain-text summary grouped by workload, environment
//!   and benchmark
//!
//! ## Comparison
//!
//! - **compare**: Generate a comparison of selected runs, cached per set of
//!   runs
//! - **options**: List runs that can be compared
//!
//! # Global options
//!
//! - `--config FILE`: TOML configuration (workers, histogram bins, progress
//!   interval, server address)
//! - `--workers N`: size of the report generation pool
//!
//! # Error Handling
//!
//! All commands return `Result<(), String>`; `main` prints the message and
//! exits with a failure code.

pub mod cli;
pub mod commands;
