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

//! Report composition.
//!
//! - [`html`]: the nested HTML report tree (run, environment, workload and
//!   summary levels) rendered with embedded templates.
//! - [`text`]: the plain-text summary grouped three ways.

pub mod html;
pub mod text;

pub use html::{
    create_summary_page, describe_table_html, format_bytes, generate_summary_html,
    render_durations, ReportComposer,
};
pub use text::{describe_table_text, generate_summary_text, generate_summary_text_file};
