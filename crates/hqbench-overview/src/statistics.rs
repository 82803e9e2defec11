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

//! Descriptive statistics over run durations.
//!
//! Missing durations are represented as `NaN` and are filtered out before
//! any statistic is computed.

use serde::Serialize;

/// Statistical summary of a group of durations.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DurationStats {
    /// Number of non-missing durations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    /// Minimum duration.
    pub min: f64,
    /// First quartile.
    pub q25: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q75: f64,
    /// Maximum duration.
    pub max: f64,
}

impl DurationStats {
    /// Column labels of [`DurationStats::values`].
    pub const COLUMNS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Computes statistics over the non-NaN values of `durations`.
    ///
    /// An empty input yields `count == 0` and `NaN` everywhere else; a
    /// single value yields a `NaN` standard deviation.
    pub fn from_durations(durations: &[f64]) -> Self {
        let mut values = finite_values(durations);
        values.sort_by(f64::total_cmp);

        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let variance = values
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            mean,
            std,
            min: values[0],
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values[count - 1],
        }
    }

    /// Values in the order of [`DurationStats::COLUMNS`].
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }

    /// Single-line summary: `"{mean} s"` plus the min/max range when more
    /// than one duration was measured.
    pub fn summary_line(&self) -> String {
        let mut line = format!("{:.4} s", self.mean);
        if self.count > 1 {
            line.push_str(&format!(" (min={:.4}, max={:.4})", self.min, self.max));
        }
        line
    }
}

/// Density-normalized histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    /// Density per bin; integrates to one over the edges.
    pub density: Vec<f64>,
    /// Bin edges, one more than bins.
    pub edges: Vec<f64>,
}

impl Histogram {
    /// Returns true if no value was binned.
    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }
}

/// Bins the non-NaN `durations` into `bins` equal-width bins.
///
/// A degenerate range (all values equal) is widened by 0.5 on each side.
pub fn histogram(durations: &[f64], bins: usize) -> Histogram {
    let values = finite_values(durations);
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for value in &values {
        // Values equal to the upper edge fall into the last bin.
        let bin = (((value - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    let total = values.len() as f64;
    let density = counts
        .into_iter()
        .map(|c| c as f64 / (total * width))
        .collect();

    Histogram { density, edges }
}

/// Arithmetic mean, `0.0` for an empty slice.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn finite_values(durations: &[f64]) -> Vec<f64> {
    durations.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Linear interpolation between closest ranks of a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_ignored() {
        let stats = DurationStats::from_durations(&[2.0, 4.0, f64::NAN]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.median, 3.0);
    }

    #[test]
    fn test_sample_std() {
        let stats = DurationStats::from_durations(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.std - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(stats.q25, 1.75);
        assert_eq!(stats.q75, 3.25);
    }

    #[test]
    fn test_empty_and_single() {
        let empty = DurationStats::from_durations(&[f64::NAN]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());

        let single = DurationStats::from_durations(&[1.5]);
        assert_eq!(single.count, 1);
        assert!(single.std.is_nan());
        assert_eq!(single.summary_line(), "1.5000 s");
    }

    #[test]
    fn test_summary_line_with_range() {
        let stats = DurationStats::from_durations(&[1.0, 2.0]);
        assert_eq!(stats.summary_line(), "1.5000 s (min=1.0000, max=2.0000)");
    }

    #[test]
    fn test_histogram_density_integrates_to_one() {
        let hist = histogram(&[1.0, 2.0, 2.5, 4.0, f64::NAN], 5);
        assert_eq!(hist.density.len(), 5);
        assert_eq!(hist.edges.len(), 6);
        assert_eq!(hist.edges[0], 1.0);
        assert!((hist.edges[5] - 4.0).abs() < 1e-12);

        let width = hist.edges[1] - hist.edges[0];
        let integral: f64 = hist.density.iter().map(|d| d * width).sum();
        assert!((integral - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_degenerate_range() {
        let hist = histogram(&[3.0, 3.0], 2);
        assert_eq!(hist.edges, vec![2.5, 3.0, 3.5]);
        assert!(histogram(&[], 50).is_empty());
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[10.0, 20.0]), 15.0);
    }
}
