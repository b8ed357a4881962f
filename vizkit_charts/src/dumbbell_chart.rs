// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal dumbbell chart.
//!
//! Each row holds one dot per sub-value, joined by a connector from the smallest to the largest
//! value. An optional arrowhead shows direction when the smallest value is the first or the last
//! sub-value.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Vec2};
use vizkit_core::{
    CircleMark, DumbbellDatum, Label, Mark, MarkId, MarkPayload, PathMark, TextAnchor,
    TextBaseline, TextMark,
};
use vizkit_transforms::{ExtentOptions, IdStrategy, NormalizeOptions, normalize};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{
    ChartSettings, DEFAULT_BAR_PADDING, DEFAULT_RADIUS, DEFAULT_TICK_COUNT, DEFAULT_TRUNCATE_BY,
};
use crate::color::Palette;
use crate::format::{format_number, truncate_label};
use crate::frame::{ChartFrame, HitTarget};
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DEFAULT_OPACITY, DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{BandThickness, ScaleBand, ScaleContinuous, ScaleLinearSpec};
use crate::symbol::arrowhead;
use crate::z_order;

/// Arrowhead length per unit of connector stroke width.
const ARROW_SCALE: f64 = 6.0;

/// Settings for a horizontal dumbbell chart.
#[derive(Clone, Debug, PartialEq)]
pub struct DumbbellChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// One color per sub-value.
    pub colors: Palette,
    /// Dot radius.
    pub radius: f64,
    /// Padding between rows, as a fraction of the step.
    pub bar_padding: f64,
    /// Optional bounds on the per-row step.
    pub thickness: BandThickness,
    /// Connector width.
    pub connector_stroke_width: f64,
    /// Draw an arrowhead toward the larger value.
    pub arrow_connector: bool,
    /// Draw row labels.
    pub show_labels: bool,
    /// Draw values above the dots.
    pub show_values: bool,
    /// Draw gridlines and tick labels.
    pub show_ticks: bool,
    /// Target tick count.
    pub tick_count: usize,
    /// Row labels longer than this are truncated.
    pub truncate_by: usize,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// Explicit row order; identifies rows by label.
    pub label_order: Option<Vec<Label>>,
    /// Title above the value axis.
    pub axis_title: Option<String>,
}

impl Default for DumbbellChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(20.0, 25.0, 100.0, 40.0)),
            colors: Palette::categorical(),
            radius: DEFAULT_RADIUS,
            bar_padding: DEFAULT_BAR_PADDING,
            thickness: BandThickness::default(),
            connector_stroke_width: 2.0,
            arrow_connector: false,
            show_labels: true,
            show_values: false,
            show_ticks: true,
            tick_count: DEFAULT_TICK_COUNT,
            truncate_by: DEFAULT_TRUNCATE_BY,
            prefix: String::new(),
            suffix: String::new(),
            min_value: None,
            max_value: None,
            label_order: None,
            axis_title: None,
        }
    }
}

impl DumbbellChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the dot colors.
    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the dot radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the row padding.
    pub fn with_bar_padding(mut self, padding: f64) -> Self {
        self.bar_padding = padding;
        self
    }

    /// Bounds the per-row step.
    pub fn with_thickness(mut self, thickness: BandThickness) -> Self {
        self.thickness = thickness;
        self
    }

    /// Sets the connector width.
    pub fn with_connector_stroke_width(mut self, width: f64) -> Self {
        self.connector_stroke_width = width;
        self
    }

    /// Toggles the directional arrowhead.
    pub fn with_arrow_connector(mut self, arrow: bool) -> Self {
        self.arrow_connector = arrow;
        self
    }

    /// Toggles row labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Toggles value labels.
    pub fn with_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    /// Toggles gridlines and tick labels.
    pub fn with_ticks(mut self, show: bool) -> Self {
        self.show_ticks = show;
        self
    }

    /// Sets the value prefix and suffix.
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// Overrides the value extent bounds.
    pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Lays rows out in this label order.
    pub fn with_label_order(mut self, order: Vec<Label>) -> Self {
        self.label_order = Some(order);
        self
    }

    /// Sets the value axis title.
    pub fn with_axis_title(mut self, title: impl Into<String>) -> Self {
        self.axis_title = Some(title.into());
        self
    }

    /// Lays out `data`.
    ///
    /// Hit targets are the dots; each carries the row's datum index and the sub-value index.
    pub fn layout(&self, data: &[DumbbellDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        if data.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let grays = theme.grays();
        let extra = if self.axis_title.is_some() {
            Margins::new(25.0, 0.0, 0.0, 0.0)
        } else {
            Margins::ZERO
        };
        let layout = settings.arrange(extra);
        let plot = layout.plot;

        let ids = match &self.label_order {
            Some(order) => IdStrategy::LabelOrder(order.clone()),
            None => IdStrategy::Positional,
        };
        let norm = normalize(
            data,
            &NormalizeOptions::default()
                .with_extent(
                    ExtentOptions::new()
                        .with_min(self.min_value)
                        .with_max(self.max_value),
                )
                .with_ids(ids),
        );
        let n = norm.slots.len();
        let band_extent = self.thickness.extent(plot.height(), n);
        let band =
            ScaleBand::new((plot.y0, plot.y0 + band_extent), n).with_padding(self.bar_padding, 0.0);
        let x = ScaleLinearSpec::new((norm.min(), norm.max()))
            .with_nice(true)
            .instantiate((plot.x0, plot.x1));
        tracing::debug!(rows = n, min = norm.min(), max = norm.max(), "dumbbell layout");

        let mut marks = Vec::new();
        if self.show_ticks {
            let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
            let mut axis = AxisSpec::top()
                .with_inline_labels(true)
                .with_tick_count(self.tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_grid(GridStyle::themed(theme))
                .with_tick_formatter(move |v, _| format_number(Some(v), &prefix, &suffix, None));
            if let Some(title) = &self.axis_title {
                axis = axis
                    .with_title(title.clone())
                    .with_title_offset(plot.y0 - 15.0);
            }
            marks.extend(axis.marks(&ScaleContinuous::Linear(x), plot));
        }

        let r = self.radius;
        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for (i, slot) in norm.slots.iter().enumerate() {
            let cy = band.center(i);
            marks.push(
                RuleMarkSpec::horizontal(
                    MarkId::for_item(role::CONNECTOR, &slot.id, 1),
                    cy,
                    plot.x0,
                    plot.x1,
                )
                .with_stroke(grays.gray_400, 1.0)
                .with_z_index(z_order::GRID_LINES)
                .mark(),
            );
            if self.show_labels {
                let text = TextMark::new(
                    Point::new(plot.x0 - 10.0, cy),
                    truncate_label(&slot.label.text(), self.truncate_by),
                    grays.gray_700,
                )
                .with_anchor(TextAnchor::End)
                .with_baseline(TextBaseline::Middle);
                marks.push(Mark::new(
                    MarkId::for_item(role::BAR_LABEL, &slot.id, 0),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(text),
                ));
            }
            let Some(index) = slot.datum else {
                continue;
            };
            let d = &data[index];

            let present: Vec<(usize, f64)> = d
                .x
                .iter()
                .enumerate()
                .filter_map(|(j, v)| v.filter(|v| v.is_finite()).map(|v| (j, v)))
                .collect();
            let lo = present.iter().copied().min_by(|a, b| a.1.total_cmp(&b.1));
            let hi = present.iter().copied().max_by(|a, b| a.1.total_cmp(&b.1));
            if let (Some((lo_j, lo_v)), Some((_, hi_v))) = (lo, hi) {
                let connector_opacity = if view.selected_color.is_some() {
                    DIM_OPACITY
                } else {
                    1.0
                };
                let start = Point::new(x.map(lo_v) + r, cy);
                let end = Point::new(x.map(hi_v) - r, cy);
                let mut path = BezPath::new();
                path.move_to(start);
                path.line_to(end);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::CONNECTOR, &slot.id, 0),
                        z_order::SERIES_STROKE,
                        MarkPayload::Path(PathMark::stroked(
                            path,
                            grays.gray_600,
                            self.connector_stroke_width,
                        )),
                    )
                    .with_opacity(connector_opacity),
                );

                let last = d.x.len().saturating_sub(1);
                let arrow = if !self.arrow_connector || end.x <= start.x {
                    None
                } else if lo_j == 0 {
                    Some((end, Vec2::new(1.0, 0.0)))
                } else if lo_j == last {
                    Some((start, Vec2::new(-1.0, 0.0)))
                } else {
                    None
                };
                if let Some((tip, direction)) = arrow {
                    let head = arrowhead(tip, direction, ARROW_SCALE * self.connector_stroke_width);
                    marks.push(
                        Mark::new(
                            MarkId::for_item(role::ARROW, &slot.id, 0),
                            z_order::SERIES_STROKE,
                            MarkPayload::Path(PathMark::filled(head, grays.gray_600)),
                        )
                        .with_opacity(connector_opacity),
                    );
                }
            }

            for (j, v) in present {
                let color = self.colors.get(j);
                let opacity = match view.selected_color {
                    Some(selected) if selected == color => 1.0,
                    Some(_) => DIM_OPACITY,
                    None => 1.0,
                };
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "dumbbells hold a handful of sub-values"
                )]
                let part = j as u16;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "opacity constants fit in f32"
                )]
                let fill = color.multiply_alpha(DEFAULT_OPACITY as f32);
                let center = Point::new(x.map(v), cy);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::DOT, &slot.id, part),
                        z_order::SERIES_POINTS,
                        MarkPayload::Circle(CircleMark {
                            center,
                            radius: r,
                            fill: fill.into(),
                            stroke: color.into(),
                            stroke_width: 1.0,
                        }),
                    )
                    .with_opacity(opacity),
                );
                regions.push((HitShape::Circle { center, radius: r }, targets.len()));
                targets.push(HitTarget::datum(slot.id.clone(), index).with_series(j));

                if self.show_values {
                    let text = TextMark::new(
                        Point::new(center.x, cy - r - 3.0),
                        format_number(Some(v), &self.prefix, &self.suffix, None),
                        color,
                    )
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Alphabetic);
                    marks.push(
                        Mark::new(
                            MarkId::for_item(role::BAR_VALUE, &slot.id, part),
                            z_order::AXIS_LABELS,
                            MarkPayload::Text(text),
                        )
                        .with_opacity(opacity),
                    );
                }
            }
        }

        ChartFrame::new(
            settings.resolved_size(),
            plot,
            marks,
            HitIndex::Regions(regions),
            targets,
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use kurbo::Shape;
    use vizkit_core::ItemId;

    fn path(frame: &ChartFrame, role: u16) -> Option<BezPath> {
        let id = MarkId::for_item(role, &ItemId::Index(0), 0);
        frame.marks.iter().find_map(|m| match &m.payload {
            MarkPayload::Path(p) if m.id == id => Some(p.path.clone()),
            _ => None,
        })
    }

    #[test]
    fn connector_is_inset_by_the_radius() {
        let data = vec![DumbbellDatum::new("A", [Some(20.0), None, Some(80.0)])];
        let spec = DumbbellChartSpec::default().with_ticks(false);
        let frame = spec.layout(&data, &ViewState::default());
        let connector = path(&frame, role::CONNECTOR).unwrap().bounding_box();
        let dots: Vec<Point> = frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Circle(c) => Some(c.center),
                _ => None,
            })
            .collect();
        assert_eq!(dots.len(), 2, "null values draw no dot");
        assert!((connector.x0 - (dots[0].x + spec.radius)).abs() < 1e-9);
        assert!((connector.x1 - (dots[1].x - spec.radius)).abs() < 1e-9);
    }

    #[test]
    fn arrow_points_away_from_the_minimum() {
        let spec = DumbbellChartSpec::default().with_arrow_connector(true);
        let rising = vec![DumbbellDatum::new("A", [Some(1.0), Some(5.0)])];
        let frame = spec.layout(&rising, &ViewState::default());
        let head = path(&frame, role::ARROW).unwrap().bounding_box();
        let connector = path(&frame, role::CONNECTOR).unwrap().bounding_box();
        assert!((head.x1 - connector.x1).abs() < 1e-9, "tip at the max end");

        let falling = vec![DumbbellDatum::new("A", [Some(5.0), Some(1.0)])];
        let frame = spec.layout(&falling, &ViewState::default());
        let head = path(&frame, role::ARROW).unwrap().bounding_box();
        let connector = path(&frame, role::CONNECTOR).unwrap().bounding_box();
        assert!((head.x0 - connector.x0).abs() < 1e-9, "tip at the min end");

        let middle = vec![DumbbellDatum::new("A", [Some(5.0), Some(1.0), Some(9.0)])];
        let frame = spec.layout(&middle, &ViewState::default());
        assert!(path(&frame, role::ARROW).is_none());
    }

    #[test]
    fn selection_dims_connector_and_other_dots() {
        let data = vec![DumbbellDatum::new("A", [Some(1.0), Some(5.0)])];
        let spec = DumbbellChartSpec::default();
        let first = spec.colors.get(0);
        let frame = spec.layout(&data, &ViewState::default().with_selected_color(Some(first)));
        let opacity = |role: u16, part: u16| {
            let id = MarkId::for_item(role, &ItemId::Index(0), part);
            frame.marks.iter().find(|m| m.id == id).map(|m| m.opacity)
        };
        assert_eq!(opacity(role::CONNECTOR, 0), Some(DIM_OPACITY));
        assert_eq!(opacity(role::DOT, 0), Some(1.0));
        assert_eq!(opacity(role::DOT, 1), Some(DIM_OPACITY));
    }

    #[test]
    fn dots_are_hit_targets() {
        let data = vec![
            DumbbellDatum::new("A", [Some(1.0), Some(5.0)]),
            DumbbellDatum::new("B", [Some(2.0), Some(3.0)]),
        ];
        let frame = DumbbellChartSpec::default().layout(&data, &ViewState::default());
        let dot = frame
            .marks
            .iter()
            .find_map(|m| match &m.payload {
                MarkPayload::Circle(c) if m.id == MarkId::for_item(role::DOT, &ItemId::Index(1), 1) => {
                    Some(c.center)
                }
                _ => None,
            })
            .unwrap();
        let hit = frame.hit_test(dot).unwrap();
        assert_eq!((hit.datum, hit.series), (Some(1), Some(1)));
    }
}
