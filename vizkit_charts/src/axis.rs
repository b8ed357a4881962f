// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! A single [`AxisSpec`] covers all four placements through its `orient`. Axes only draw
//! continuous scales; categorical charts label their bands directly.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Brush;
use vizkit_core::{Mark, MarkId, MarkPayload, TextAnchor, TextBaseline, TextMark};

use crate::color::Theme;
use crate::format::format_tick;
use crate::role;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::ScaleContinuous;
use crate::time::{DEFAULT_DATE_FORMAT, format_date};
use crate::z_order;

/// A paint + width pair for stroked paths (domain lines, ticks, gridlines).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern as `(dash, gap)`.
    pub dash: Option<(f64, f64)>,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            dash: None,
        }
    }

    /// Convenience for a dashed stroke.
    pub fn dashed(brush: impl Into<Brush>, stroke_width: f64, dash: (f64, f64)) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
            dash: Some(dash),
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(Theme::Light.grays().gray_700, 1.0)
    }
}

/// Axis styling defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Style for the axis domain line and tick marks.
    pub rule: StrokeStyle,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
    /// Fill paint for the axis title.
    pub title_fill: Brush,
    /// Font size for the axis title.
    pub title_font_size: f64,
}

impl AxisStyle {
    /// Axis colors for a theme.
    pub fn themed(theme: Theme) -> Self {
        let grays = theme.grays();
        Self {
            rule: StrokeStyle::solid(grays.gray_700, 1.0),
            label_fill: grays.gray_550.into(),
            label_font_size: 12.0,
            title_fill: grays.gray_700.into(),
            title_font_size: 12.0,
        }
    }
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self::themed(Theme::Light)
    }
}

/// Gridline styling.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStyle {
    /// Stroke style for gridlines.
    pub stroke: StrokeStyle,
}

impl GridStyle {
    /// Dashed gridlines for a theme.
    pub fn themed(theme: Theme) -> Self {
        Self {
            stroke: StrokeStyle::dashed(theme.grays().gray_500, 1.0, (4.0, 8.0)),
        }
    }
}

impl Default for GridStyle {
    fn default() -> Self {
        Self::themed(Theme::Light)
    }
}

/// Axis orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    fn slot(self, i: usize) -> usize {
        let base = match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::Left => 2,
            Self::Right => 3,
        };
        (base << 24) | i
    }
}

/// Tick label formatter: `(value, step) -> text`.
pub type TickFormatter = Arc<dyn Fn(f64, f64) -> String>;

/// Axis configuration (single type + `orient`).
#[derive(Clone)]
pub struct AxisSpec {
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks.
    pub tick_count: usize,
    /// Explicit tick values, replacing generated ones.
    pub tick_values: Option<Vec<f64>>,
    /// Tick line length (in pixels), pointing away from the plot.
    pub tick_size: f64,
    /// Whether to draw tick labels.
    pub labels: bool,
    /// Draw labels inside the plot on their gridline and leave the zero gridline to the baseline.
    pub inline: bool,
    /// Whether to draw the axis domain line.
    pub show_domain: bool,
    /// Padding between the tick end and the tick label.
    pub tick_padding: f64,
    /// Axis styling.
    pub style: AxisStyle,
    /// Optional gridline styling.
    ///
    /// If `Some`, gridline marks are generated spanning the plot area.
    pub grid: Option<GridStyle>,
    /// Optional axis title text.
    pub title: Option<String>,
    /// Distance from the plot edge to the title.
    pub title_offset: f64,
    /// strftime pattern for time-scale labels.
    pub date_format: String,
    /// Optional tick label formatter.
    ///
    /// The second argument is the tick step, which can be used for consistent decimals.
    pub tick_formatter: Option<TickFormatter>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_values", &self.tick_values)
            .field("tick_size", &self.tick_size)
            .field("labels", &self.labels)
            .field("inline", &self.inline)
            .field("show_domain", &self.show_domain)
            .field("tick_padding", &self.tick_padding)
            .field("style", &self.style)
            .field("grid", &self.grid)
            .field("title", &self.title)
            .field("title_offset", &self.title_offset)
            .field("date_format", &self.date_format)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish()
    }
}

impl AxisSpec {
    /// Creates a new axis configuration.
    ///
    /// The returned axis has five ticks, no tick lines, a 6px label gap, no domain line, no grid
    /// and no title.
    pub fn new(orient: AxisOrient) -> Self {
        Self {
            orient,
            tick_count: 5,
            tick_values: None,
            tick_size: 0.0,
            labels: true,
            inline: false,
            show_domain: false,
            tick_padding: 6.0,
            style: AxisStyle::default(),
            grid: None,
            title: None,
            title_offset: 40.0,
            date_format: String::from(DEFAULT_DATE_FORMAT),
            tick_formatter: None,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom() -> Self {
        Self::new(AxisOrient::Bottom)
    }

    /// Convenience constructor for a `top` axis.
    pub fn top() -> Self {
        Self::new(AxisOrient::Top)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left() -> Self {
        Self::new(AxisOrient::Left)
    }

    /// Convenience constructor for a `right` axis.
    pub fn right() -> Self {
        Self::new(AxisOrient::Right)
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Use exactly these tick values.
    pub fn with_tick_values(mut self, values: Vec<f64>) -> Self {
        self.tick_values = Some(values);
        self
    }

    /// Set tick size in scene coordinates.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Enable or disable tick labels.
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Draw labels inside the plot on their gridlines, without a zero gridline.
    pub fn with_inline_labels(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Enable or disable the axis domain line.
    pub fn with_domain(mut self, domain: bool) -> Self {
        self.show_domain = domain;
        self
    }

    /// Set the axis style.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable gridlines using the provided style.
    pub fn with_grid(mut self, grid: GridStyle) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Disable gridlines.
    pub fn without_grid(mut self) -> Self {
        self.grid = None;
        self
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Clear the axis title.
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Set the title offset in scene coordinates.
    pub fn with_title_offset(mut self, title_offset: f64) -> Self {
        self.title_offset = title_offset;
        self
    }

    /// Set the strftime pattern for time-scale labels.
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    /// Set a custom tick label formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    fn tick_values(&self, scale: &ScaleContinuous) -> (Vec<f64>, f64) {
        let ticks = match &self.tick_values {
            Some(values) => values.clone(),
            None => scale.ticks(self.tick_count),
        };
        let step = tick_step(&ticks);
        (ticks, step)
    }

    fn skips_gridline(&self, v: f64) -> bool {
        self.inline && v.abs() < 1e-12
    }

    fn format_tick(&self, scale: &ScaleContinuous, v: f64, step: f64) -> String {
        match &self.tick_formatter {
            Some(f) => (f)(v, step),
            None => match scale {
                ScaleContinuous::Time(_) => format_date(v, &self.date_format),
                ScaleContinuous::Linear(_) => format_tick(v, step),
            },
        }
    }

    /// Generate axis marks for `scale`, whose range is already in plot coordinates.
    pub fn marks(&self, scale: &ScaleContinuous, plot: Rect) -> Vec<Mark> {
        let (ticks, step) = self.tick_values(scale);
        let horizontal = self.orient.is_horizontal();
        let (lo, hi) = if horizontal {
            (plot.x0, plot.x1)
        } else {
            (plot.y0, plot.y1)
        };
        let in_plot = |p: f64| p >= lo - 1.0e-9 && p <= hi + 1.0e-9;
        let tick_size = self.tick_size.abs();
        let gap = tick_size + self.tick_padding.max(0.0);

        let mut out = Vec::new();

        if let Some(grid) = &self.grid {
            for (i, v) in ticks.iter().copied().enumerate() {
                let p = scale.map(v);
                if !in_plot(p) || self.skips_gridline(v) {
                    continue;
                }
                let id = MarkId::for_guide(role::GRID, self.orient.slot(i));
                let rule = if horizontal {
                    RuleMarkSpec::vertical(id, p, plot.y0, plot.y1)
                } else {
                    RuleMarkSpec::horizontal(id, p, plot.x0, plot.x1)
                };
                out.push(
                    rule.with_stroke(grid.stroke.brush.clone(), grid.stroke.stroke_width)
                        .with_dash(grid.stroke.dash)
                        .with_z_index(z_order::GRID_LINES)
                        .mark(),
                );
            }
        }

        if self.show_domain {
            let id = MarkId::for_guide(role::AXIS_DOMAIN, self.orient.slot(0));
            let rule = match self.orient {
                AxisOrient::Top => RuleMarkSpec::horizontal(id, plot.y0, plot.x0, plot.x1),
                AxisOrient::Bottom => RuleMarkSpec::horizontal(id, plot.y1, plot.x0, plot.x1),
                AxisOrient::Left => RuleMarkSpec::vertical(id, plot.x0, plot.y0, plot.y1),
                AxisOrient::Right => RuleMarkSpec::vertical(id, plot.x1, plot.y0, plot.y1),
            };
            out.push(
                rule.with_stroke(
                    self.style.rule.brush.clone(),
                    self.style.rule.stroke_width,
                )
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
            );
        }

        let n = ticks.len();
        for (i, v) in ticks.iter().copied().enumerate() {
            let p = scale.map(v);
            if !in_plot(p) {
                continue;
            }
            if tick_size > 0.0 {
                let id = MarkId::for_guide(role::AXIS_TICK, self.orient.slot(i));
                let rule = match self.orient {
                    AxisOrient::Top => RuleMarkSpec::vertical(id, p, plot.y0 - tick_size, plot.y0),
                    AxisOrient::Bottom => {
                        RuleMarkSpec::vertical(id, p, plot.y1, plot.y1 + tick_size)
                    }
                    AxisOrient::Left => {
                        RuleMarkSpec::horizontal(id, p, plot.x0 - tick_size, plot.x0)
                    }
                    AxisOrient::Right => {
                        RuleMarkSpec::horizontal(id, p, plot.x1, plot.x1 + tick_size)
                    }
                };
                out.push(
                    rule.with_stroke(
                        self.style.rule.brush.clone(),
                        self.style.rule.stroke_width,
                    )
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
                );
            }

            if !self.labels {
                continue;
            }
            let text = self.format_tick(scale, v, step);
            // Edge labels hug the plot so they are not clipped by the view.
            let edge_anchor = if n > 1 && i == 0 {
                TextAnchor::Start
            } else if n > 1 && i + 1 == n {
                TextAnchor::End
            } else {
                TextAnchor::Middle
            };
            let (pos, anchor, baseline) = match (self.inline, self.orient) {
                (true, AxisOrient::Top) => (
                    Point::new(p + 3.0, plot.y0 + 10.0),
                    TextAnchor::Start,
                    TextBaseline::Alphabetic,
                ),
                (true, AxisOrient::Bottom) => (
                    Point::new(p + 3.0, plot.y1 - 3.0),
                    TextAnchor::Start,
                    TextBaseline::Alphabetic,
                ),
                (true, AxisOrient::Left) => (
                    Point::new(plot.x0 + 2.0, p - 3.0),
                    TextAnchor::Start,
                    TextBaseline::Alphabetic,
                ),
                (true, AxisOrient::Right) => (
                    Point::new(plot.x1 - 2.0, p - 3.0),
                    TextAnchor::End,
                    TextBaseline::Alphabetic,
                ),
                (false, AxisOrient::Top) => (
                    Point::new(p, plot.y0 - gap),
                    edge_anchor,
                    TextBaseline::Alphabetic,
                ),
                (false, AxisOrient::Bottom) => (
                    Point::new(p, plot.y1 + gap),
                    edge_anchor,
                    TextBaseline::Hanging,
                ),
                (false, AxisOrient::Left) => (
                    Point::new(plot.x0 - gap, p),
                    TextAnchor::End,
                    TextBaseline::Middle,
                ),
                (false, AxisOrient::Right) => (
                    Point::new(plot.x1 + gap, p),
                    TextAnchor::Start,
                    TextBaseline::Middle,
                ),
            };
            let label = TextMark::new(pos, text, self.style.label_fill.clone())
                .with_anchor(anchor)
                .with_baseline(baseline)
                .with_font_size(self.style.label_font_size);
            out.push(Mark::new(
                MarkId::for_guide(role::AXIS_LABEL, self.orient.slot(i)),
                z_order::AXIS_LABELS,
                MarkPayload::Text(label),
            ));
        }

        if let Some(title) = &self.title {
            let mid_x = 0.5 * (plot.x0 + plot.x1);
            let mid_y = 0.5 * (plot.y0 + plot.y1);
            let (pos, angle) = match self.orient {
                AxisOrient::Top => (Point::new(mid_x, plot.y0 - self.title_offset), 0.0),
                AxisOrient::Bottom => (Point::new(mid_x, plot.y1 + self.title_offset), 0.0),
                AxisOrient::Left => (Point::new(plot.x0 - self.title_offset, mid_y), -90.0),
                AxisOrient::Right => (Point::new(plot.x1 + self.title_offset, mid_y), 90.0),
            };
            let mark = TextMark::new(pos, title.clone(), self.style.title_fill.clone())
                .with_anchor(TextAnchor::Middle)
                .with_font_size(self.style.title_font_size)
                .with_angle(angle);
            out.push(Mark::new(
                MarkId::for_guide(role::AXIS_TITLE, self.orient.slot(0)),
                z_order::AXIS_TITLES,
                MarkPayload::Text(mark),
            ));
        }

        out
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::{ScaleLinear, ScaleTime};

    fn texts(marks: &[Mark]) -> Vec<String> {
        marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn left_axis_labels_every_tick() {
        let plot = Rect::new(40.0, 10.0, 340.0, 210.0);
        let scale = ScaleContinuous::from(ScaleLinear::new((0.0, 100.0), (plot.y1, plot.y0)));
        let marks = AxisSpec::left().with_grid(GridStyle::default()).marks(&scale, plot);
        assert_eq!(texts(&marks), ["0", "20", "40", "60", "80", "100"]);
        let grid = marks
            .iter()
            .filter(|m| m.z_index == z_order::GRID_LINES)
            .count();
        assert_eq!(grid, 6);
    }

    #[test]
    fn time_axes_format_dates() {
        let plot = Rect::new(0.0, 0.0, 300.0, 100.0);
        let y2000 = 946_684_800.0;
        let y2010 = 1_262_304_000.0;
        let scale = ScaleContinuous::from(ScaleTime::new((y2000, y2010), (plot.x0, plot.x1)));
        let marks = AxisSpec::bottom()
            .with_tick_count(2)
            .with_title("Year")
            .marks(&scale, plot);
        assert_eq!(texts(&marks), ["2000", "2005", "2010", "Year"]);
    }

    #[test]
    fn inline_labels_sit_on_gridlines() {
        let plot = Rect::new(40.0, 10.0, 340.0, 210.0);
        let scale = ScaleContinuous::from(ScaleLinear::new((0.0, 100.0), (plot.y1, plot.y0)));
        let marks = AxisSpec::left()
            .with_grid(GridStyle::default())
            .with_inline_labels(true)
            .marks(&scale, plot);
        assert_eq!(texts(&marks), ["0", "20", "40", "60", "80", "100"]);
        let grid = marks
            .iter()
            .filter(|m| m.z_index == z_order::GRID_LINES)
            .count();
        assert_eq!(grid, 5, "the baseline replaces the zero gridline");
        let first = marks
            .iter()
            .find_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(first.pos, Point::new(42.0, 207.0));
        assert_eq!(first.anchor, TextAnchor::Start);
    }

    #[test]
    fn custom_formatter_and_values() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let scale = ScaleContinuous::from(ScaleLinear::new((0.0, 1.0), (plot.x0, plot.x1)));
        let marks = AxisSpec::bottom()
            .with_tick_values(alloc::vec![0.0, 1.0])
            .with_tick_formatter(|v, _| alloc::format!("{}%", v * 100.0))
            .marks(&scale, plot);
        assert_eq!(texts(&marks), ["0%", "100%"]);
    }

    #[test]
    fn x_and_y_axes_do_not_share_ids() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let scale = ScaleContinuous::from(ScaleLinear::new((0.0, 1.0), (0.0, 100.0)));
        let a = AxisSpec::bottom().marks(&scale, plot);
        let b = AxisSpec::left().marks(&scale, plot);
        assert!(a.iter().all(|m| b.iter().all(|n| n.id != m.id)));
    }
}
