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

//! Plain-text summary.

use crate::database::Database;
use crate::error::{OverviewError, Result};
use crate::grouping::{
    groupby_benchmark, groupby_environment, groupby_workload, GroupKey, RecordFrame,
};
use crate::statistics::DurationStats;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Describe-style text table of duration statistics.
pub fn describe_table_text(stats: &DurationStats) -> String {
    let mut header = format!("{:<10}", "");
    let mut row = format!("{:<10}{:>12}", "duration", stats.count);
    for column in DurationStats::COLUMNS {
        header.push_str(&format!("{:>12}", column));
    }
    for value in &stats.values()[1..] {
        row.push_str(&format!("{:>12.4}", value));
    }
    format!("{}\n{}", header.trim_end(), row)
}

fn two_level_summary<P, S, W>(
    frame: &RecordFrame,
    primary: fn(&RecordFrame) -> BTreeMap<P, RecordFrame>,
    secondary: fn(&RecordFrame) -> BTreeMap<S, RecordFrame>,
    out: &mut W,
    print_total: bool,
) -> io::Result<()>
where
    P: GroupKey,
    S: GroupKey,
    W: Write,
{
    for (key, group) in primary(frame) {
        writeln!(out, "{}", key.joined())?;
        for (sub_key, sub_group) in secondary(&group) {
            writeln!(out, "\t{}: {}", sub_key.joined(), sub_group.stats().summary_line())?;
        }
        if print_total {
            writeln!(out, "(mean): {:.4} s", group.mean_duration())?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn summary_by_benchmark<W: Write>(frame: &RecordFrame, out: &mut W) -> io::Result<()> {
    for (key, group) in groupby_benchmark(frame) {
        writeln!(out, "{}", key.joined())?;
        writeln!(out, "{}\n", describe_table_text(&group.stats()))?;
    }
    Ok(())
}

fn write_summary<W: Write>(frame: &RecordFrame, out: &mut W) -> io::Result<()> {
    writeln!(out, "Grouped by workload:")?;
    two_level_summary(frame, groupby_workload, groupby_environment, out, false)?;

    writeln!(out, "Grouped by environment:")?;
    two_level_summary(frame, groupby_environment, groupby_workload, out, true)?;

    writeln!(out, "Grouped by benchmark:")?;
    summary_by_benchmark(frame, out)?;
    out.flush()
}

/// Frame of `database`, or `None` with a warning when it holds no records.
fn summary_frame(database: &Database) -> Option<RecordFrame> {
    if database.is_empty() {
        warn!("No data found");
        return None;
    }
    Some(RecordFrame::from_database(database))
}

/// Writes the text summary of `database` to `out`.
///
/// Returns `Ok(false)` without writing anything when the database is empty.
pub fn generate_summary_text<W: Write>(database: &Database, out: &mut W) -> io::Result<bool> {
    match summary_frame(database) {
        Some(frame) => write_summary(&frame, out).map(|()| true),
        None => Ok(false),
    }
}

/// Writes the text summary to `path`, creating its parent directory.
///
/// Nothing is created when the database is empty.
pub fn generate_summary_text_file(database: &Database, path: &Path) -> Result<bool> {
    let Some(frame) = summary_frame(database) else {
        return Ok(false);
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OverviewError::io_error(parent, e))?;
    }
    let file = File::create(path).map_err(|e| OverviewError::io_error(path, e))?;
    write_summary(&frame, &mut BufWriter::new(file))
        .map_err(|e| OverviewError::io_error(path, e))?;
    info!(path = %path.display(), "Text summary written");
    Ok(true)
}
