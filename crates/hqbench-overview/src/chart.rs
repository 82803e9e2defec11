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

//! Chart and layout primitives rendered to static HTML.
//!
//! Charts are plain data (series, bars and a mutable y-axis range) so that
//! views can be post-processed before rendering, e.g. to share an axis scale
//! between several charts. Rendering produces inline SVG without scripts.

use std::fmt::Write;

/// Default chart width in pixels.
pub const CHART_WIDTH: u32 = 400;

/// Default chart height in pixels.
pub const CHART_HEIGHT: u32 = 300;

const MARGIN: f64 = 40.0;

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

const STYLES: &str = r#"
body { font-family: sans-serif; margin: 5px 5px 5px 25px; }
table { border-collapse: collapse; margin: 8px 0; }
th, td { border: 1px solid #ccc; padding: 2px 8px; text-align: center; }
details.tab { border: 1px solid #ddd; margin: 4px 0; padding: 4px; }
details.tab > summary { font-weight: bold; cursor: pointer; }
.row { display: flex; flex-wrap: wrap; gap: 8px; }
.column { display: flex; flex-direction: column; gap: 8px; }
svg text { font-size: 11px; }
"#;

/// Lower and upper bound of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    /// Lower bound.
    pub start: f64,
    /// Upper bound.
    pub end: f64,
}

/// A named line series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// `(x, y)` points in x order.
    pub points: Vec<(f64, f64)>,
}

/// A histogram bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Height.
    pub top: f64,
}

/// A line or bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Title, also used to match charts across views.
    pub title: String,
    /// X axis label.
    pub x_label: String,
    /// Y axis label.
    pub y_label: String,
    /// Line series.
    pub series: Vec<Series>,
    /// Histogram bars.
    pub bars: Vec<Bar>,
    /// Visible y range.
    pub y_range: AxisRange,
}

impl Chart {
    /// Creates an empty chart with a `[0, 1]` y range.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
            bars: Vec::new(),
            y_range: AxisRange { start: 0.0, end: 1.0 },
        }
    }

    /// Sets axis labels.
    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    /// Adds a line series.
    pub fn with_series(mut self, label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        self.series.push(Series {
            label: label.into(),
            points,
        });
        self
    }

    /// Adds histogram bars.
    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars.extend(bars);
        self
    }

    /// Largest y value of all series and bars.
    pub fn data_max(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .chain(self.bars.iter().map(|b| b.top))
            .filter(|y| y.is_finite())
            .reduce(f64::max)
    }

    /// Fits the y range to `[0, data max]`.
    ///
    /// Charts without data, or whose data never exceeds zero, keep an upper
    /// bound of one.
    pub fn fit_y_range(mut self) -> Self {
        self.y_range.start = 0.0;
        self.y_range.end = match self.data_max() {
            Some(max) if max > 0.0 => max,
            _ => 1.0,
        };
        self
    }

    fn x_bounds(&self) -> (f64, f64) {
        let xs = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|(x, _)| *x))
            .chain(self.bars.iter().flat_map(|b| [b.left, b.right]))
            .filter(|x| x.is_finite());
        let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if lo.is_finite() && hi > lo {
            (lo, hi)
        } else if lo.is_finite() {
            (lo - 0.5, lo + 0.5)
        } else {
            (0.0, 1.0)
        }
    }

    /// Renders the chart as an SVG element.
    pub fn to_svg(&self) -> String {
        let width = CHART_WIDTH as f64;
        let height = CHART_HEIGHT as f64;
        let (x_lo, x_hi) = self.x_bounds();
        let y_span = (self.y_range.end - self.y_range.start).max(f64::EPSILON);
        let sx = |x: f64| MARGIN + (x - x_lo) / (x_hi - x_lo) * (width - 2.0 * MARGIN);
        let sy = |y: f64| {
            let clamped = y.clamp(self.y_range.start, self.y_range.end);
            height - MARGIN - (clamped - self.y_range.start) / y_span * (height - 2.0 * MARGIN)
        };

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             data-y-end=\"{end}\">",
            w = CHART_WIDTH,
            h = CHART_HEIGHT,
            end = self.y_range.end
        );
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"16\" text-anchor=\"middle\">{}</text>",
            width / 2.0,
            escape_html(&self.title)
        );
        let _ = write!(
            svg,
            "<line x1=\"{m}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"black\"/>\
             <line x1=\"{m}\" y1=\"{m}\" x2=\"{m}\" y2=\"{b}\" stroke=\"black\"/>",
            m = MARGIN,
            b = height - MARGIN,
            r = width - MARGIN
        );
        let _ = write!(
            svg,
            "<text x=\"2\" y=\"{}\">{:.1}</text><text x=\"2\" y=\"{}\">{:.1}</text>",
            MARGIN,
            self.y_range.end,
            height - MARGIN,
            self.y_range.start
        );
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\">{}</text>",
            width / 2.0,
            height - 8.0,
            escape_html(&self.x_label)
        );
        let _ = write!(
            svg,
            "<text x=\"12\" y=\"{}\" transform=\"rotate(-90 12 {})\" text-anchor=\"middle\">{}</text>",
            height / 2.0,
            height / 2.0,
            escape_html(&self.y_label)
        );

        for bar in &self.bars {
            let x = sx(bar.left);
            let top = sy(bar.top);
            let _ = write!(
                svg,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" \
                 fill=\"red\" stroke=\"white\"/>",
                x,
                top,
                (sx(bar.right) - x).max(0.0),
                (sy(self.y_range.start) - top).max(0.0)
            );
        }

        for (i, series) in self.series.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let points: Vec<String> = series
                .points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| format!("{:.2},{:.2}", sx(*x), sy(*y)))
                .collect();
            let _ = write!(
                svg,
                "<polyline fill=\"none\" stroke=\"{}\" points=\"{}\"><title>{}</title></polyline>",
                color,
                points.join(" "),
                escape_html(&series.label)
            );
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" fill=\"{}\">{}</text>",
                width - MARGIN + 2.0,
                MARGIN + 12.0 * i as f64,
                color,
                escape_html(&series.label)
            );
        }

        svg.push_str("</svg>");
        svg
    }
}

/// A titled child of a [`Layout::Tabs`] container.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Tab title.
    pub title: String,
    /// Tab content.
    pub child: Layout,
}

impl Panel {
    /// Creates a panel.
    pub fn new(title: impl Into<String>, child: Layout) -> Self {
        Self {
            title: title.into(),
            child,
        }
    }
}

/// Tree of renderable widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// A single chart.
    Chart(Chart),
    /// Raw HTML fragment.
    Html(String),
    /// Children side by side.
    Row(Vec<Layout>),
    /// Children stacked vertically.
    Column(Vec<Layout>),
    /// Titled, collapsible panels.
    Tabs(Vec<Panel>),
}

impl Layout {
    /// Wraps `child` in a single-panel tab container.
    pub fn subtab(child: Layout, title: impl Into<String>) -> Self {
        Layout::Tabs(vec![Panel::new(title, child)])
    }

    /// Renders the layout as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.render_into(&mut html);
        html
    }

    fn render_into(&self, html: &mut String) {
        match self {
            Layout::Chart(chart) => html.push_str(&chart.to_svg()),
            Layout::Html(fragment) => html.push_str(fragment),
            Layout::Row(children) => {
                html.push_str("<div class=\"row\">");
                for child in children {
                    child.render_into(html);
                }
                html.push_str("</div>");
            }
            Layout::Column(children) => {
                html.push_str("<div class=\"column\">");
                for child in children {
                    child.render_into(html);
                }
                html.push_str("</div>");
            }
            Layout::Tabs(panels) => {
                html.push_str("<div class=\"tabs\">");
                for (i, panel) in panels.iter().enumerate() {
                    let open = if i == 0 { " open" } else { "" };
                    let _ = write!(
                        html,
                        "<details class=\"tab\"{}><summary>{}</summary>",
                        open,
                        escape_html(&panel.title)
                    );
                    panel.child.render_into(html);
                    html.push_str("</details>");
                }
                html.push_str("</div>");
            }
        }
    }
}

/// Renders a standalone HTML document around a layout.
pub fn render_document(title: &str, layout: &Layout) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(title));
    html.push_str("<style>");
    html.push_str(STYLES);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&layout.to_html());
    html.push_str("\n</body>\n</html>\n");
    html
}

/// Escapes text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
