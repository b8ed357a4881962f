// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bar charts, horizontal and vertical.
//!
//! Categories sit on an outer band scale and sub-series on an inner band nested in each
//! category band. Every non-null sub-value is one rectangle from the zero line to its value;
//! null sub-values leave a gap without shifting their siblings.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use vizkit_core::{
    GroupedBarDatum, Label, Mark, MarkId, MarkPayload, RectMark, ReferenceValue, TextAnchor,
    TextBaseline, TextMark,
};
use vizkit_transforms::{ExtentOptions, IdStrategy, NormalizeOptions, normalize};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{
    ChartSettings, DEFAULT_BAR_PADDING, DEFAULT_TICK_COUNT, DEFAULT_TRUNCATE_BY,
};
use crate::color::Palette;
use crate::format::{format_number, truncate_label};
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, baseline, baseline_vertical};
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DEFAULT_OPACITY, DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::{BandThickness, ScaleBand, ScaleContinuous, ScaleLinear, ScaleLinearSpec};
use crate::z_order;

/// Inner padding between the bars of one category.
pub const SUB_BAR_PADDING: f64 = 0.1;

/// Direction bars grow in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarOrientation {
    /// Categories down the left, values along x.
    #[default]
    Horizontal,
    /// Categories along the bottom, values up y.
    Vertical,
}

/// Settings for a grouped bar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedBarChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Bar direction.
    pub orientation: BarOrientation,
    /// One color per sub-series.
    pub colors: Palette,
    /// Inner padding between categories, as a fraction of the step.
    pub bar_padding: f64,
    /// Optional bounds on the per-category step.
    pub thickness: BandThickness,
    /// Draw category labels.
    pub show_labels: bool,
    /// Draw value labels.
    pub show_values: bool,
    /// Draw value gridlines and tick labels.
    pub show_ticks: bool,
    /// Target tick count.
    pub tick_count: usize,
    /// Category labels longer than this are truncated.
    pub truncate_by: usize,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// Explicit category order; identifies categories by label.
    pub label_order: Option<Vec<Label>>,
    /// Reference lines across the value axis.
    pub ref_values: Vec<ReferenceValue>,
    /// Title of the value axis.
    pub axis_title: Option<String>,
    /// Value label color; defaults to the sub-series color.
    pub value_color: Option<Color>,
}

impl Default for GroupedBarChartSpec {
    fn default() -> Self {
        Self::new(BarOrientation::Horizontal)
    }
}

impl GroupedBarChartSpec {
    /// Default settings for one orientation.
    ///
    /// Horizontal charts reserve a wider left margin for the category labels.
    pub fn new(orientation: BarOrientation) -> Self {
        let margins = match orientation {
            BarOrientation::Horizontal => Margins::new(20.0, 25.0, 100.0, 40.0),
            BarOrientation::Vertical => Margins::default(),
        };
        Self {
            chart: ChartSettings::with_default_margins(margins),
            orientation,
            colors: Palette::categorical(),
            bar_padding: DEFAULT_BAR_PADDING,
            thickness: BandThickness::default(),
            show_labels: true,
            show_values: true,
            show_ticks: true,
            tick_count: DEFAULT_TICK_COUNT,
            truncate_by: DEFAULT_TRUNCATE_BY,
            prefix: String::new(),
            suffix: String::new(),
            min_value: None,
            max_value: None,
            label_order: None,
            ref_values: Vec::new(),
            axis_title: None,
            value_color: None,
        }
    }

    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the sub-series colors.
    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the category padding.
    pub fn with_bar_padding(mut self, padding: f64) -> Self {
        self.bar_padding = padding;
        self
    }

    /// Bounds the per-category step.
    pub fn with_thickness(mut self, thickness: BandThickness) -> Self {
        self.thickness = thickness;
        self
    }

    /// Toggles category labels.
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

    /// Sets the target tick count.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Truncates category labels to `chars` characters.
    pub fn with_truncate_by(mut self, chars: usize) -> Self {
        self.truncate_by = chars;
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

    /// Lays categories out in this label order.
    pub fn with_label_order(mut self, order: Vec<Label>) -> Self {
        self.label_order = Some(order);
        self
    }

    /// Adds reference lines.
    pub fn with_ref_values(mut self, refs: Vec<ReferenceValue>) -> Self {
        self.ref_values = refs;
        self
    }

    /// Sets the value axis title.
    pub fn with_axis_title(mut self, title: impl Into<String>) -> Self {
        self.axis_title = Some(title.into());
        self
    }

    /// Sets the value label color.
    pub fn with_value_color(mut self, color: Color) -> Self {
        self.value_color = Some(color);
        self
    }

    fn horizontal(&self) -> bool {
        self.orientation == BarOrientation::Horizontal
    }

    /// Lays out `data`.
    ///
    /// Hit targets carry the category's datum index and the sub-series index.
    pub fn layout(&self, data: &[GroupedBarDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        if data.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let grays = theme.grays();
        let horizontal = self.horizontal();
        let extra = match (&self.axis_title, horizontal) {
            (None, _) => Margins::ZERO,
            (Some(_), true) => Margins::new(25.0, 0.0, 0.0, 0.0),
            (Some(_), false) => Margins::new(0.0, 0.0, 30.0, 0.0),
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
        let series = data.iter().map(|d| d.size.len()).max().unwrap_or(0);
        let n = norm.slots.len();

        let (band, value) = if horizontal {
            let extent = self.thickness.extent(plot.height(), n);
            (
                ScaleBand::new((plot.y0, plot.y0 + extent), n),
                ScaleLinearSpec::new((norm.min(), norm.max()))
                    .with_nice(true)
                    .instantiate((plot.x0, plot.x1)),
            )
        } else {
            let extent = self.thickness.extent(plot.width(), n);
            (
                ScaleBand::new((plot.x0, plot.x0 + extent), n),
                ScaleLinearSpec::new((norm.min(), norm.max()))
                    .with_nice(true)
                    .instantiate((plot.y1, plot.y0)),
            )
        };
        let band = band.with_padding(self.bar_padding, 0.0);
        tracing::debug!(
            categories = n,
            series,
            min = norm.min(),
            max = norm.max(),
            orientation = ?self.orientation,
            "grouped bar layout"
        );

        let value_scale = ScaleContinuous::Linear(value);
        let mut marks = Vec::new();
        if self.show_ticks {
            let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
            let mut axis = if horizontal {
                AxisSpec::top()
            } else {
                AxisSpec::left()
            }
            .with_inline_labels(true)
            .with_tick_count(self.tick_count)
            .with_style(AxisStyle::themed(theme))
            .with_grid(GridStyle::themed(theme))
            .with_tick_formatter(move |v, _| format_number(Some(v), &prefix, &suffix, None));
            if let Some(title) = &self.axis_title {
                let offset = if horizontal {
                    plot.y0 - 15.0
                } else {
                    settings.margins.left + 15.0
                };
                axis = axis.with_title(title.clone()).with_title_offset(offset);
            }
            marks.extend(axis.marks(&value_scale, plot));
        }

        let zero = value.map(0.0);
        let (lo, _) = value.domain();
        let base = value.map(lo.max(0.0));
        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for (i, slot) in norm.slots.iter().enumerate() {
            let start = band.x(i);
            let inner = ScaleBand::new((start, start + band.band_width()), series)
                .with_padding(SUB_BAR_PADDING, 0.0);

            if let Some(index) = slot.datum {
                let d = &data[index];
                for (j, v) in d.size.iter().copied().enumerate() {
                    let color = self.colors.get(j);
                    let opacity = match view.selected_color {
                        Some(selected) if selected == color => 1.0,
                        Some(_) => DIM_OPACITY,
                        None => DEFAULT_OPACITY,
                    };
                    let target = targets.len();
                    targets.push(HitTarget::datum(slot.id.clone(), index).with_series(j));
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "groups hold a handful of sub-values"
                    )]
                    let part = j as u16;
                    let (s0, s1) = (inner.x(j), inner.x(j) + inner.band_width());

                    if let Some(v) = v {
                        let p = value.map(v);
                        let rect = if horizontal {
                            Rect::new(p.min(zero), s0, p.max(zero), s1)
                        } else {
                            Rect::new(s0, p.min(zero), s1, p.max(zero))
                        };
                        marks.push(
                            Mark::new(
                                MarkId::for_item(role::BAR, &slot.id, part),
                                z_order::SERIES_FILL,
                                MarkPayload::Rect(RectMark {
                                    rect,
                                    fill: color.into(),
                                }),
                            )
                            .with_opacity(opacity),
                        );
                        regions.push((HitShape::Rect(rect), target));
                    }

                    if self.show_values {
                        let end = value.map(v.unwrap_or(0.0));
                        let negative = v.is_some_and(|v| v < 0.0);
                        let mid = 0.5 * (s0 + s1);
                        let text = format_number(v, &self.prefix, &self.suffix, None);
                        let fill = self.value_color.unwrap_or(color);
                        let mark = if horizontal {
                            let (dx, anchor) = if negative {
                                (-5.0, TextAnchor::End)
                            } else {
                                (5.0, TextAnchor::Start)
                            };
                            TextMark::new(Point::new(end + dx, mid), text, fill)
                                .with_anchor(anchor)
                                .with_baseline(TextBaseline::Middle)
                        } else {
                            let dy = if negative { 15.0 } else { -5.0 };
                            TextMark::new(Point::new(mid, end + dy), text, fill)
                                .with_anchor(TextAnchor::Middle)
                                .with_baseline(TextBaseline::Alphabetic)
                        };
                        marks.push(
                            Mark::new(
                                MarkId::for_item(role::BAR_VALUE, &slot.id, part),
                                z_order::AXIS_LABELS,
                                MarkPayload::Text(mark.with_font_size(14.0)),
                            )
                            .with_opacity(opacity),
                        );
                    }
                }
            }

            if self.show_labels {
                let text = truncate_label(&slot.label.text(), self.truncate_by);
                let mark = if horizontal {
                    TextMark::new(
                        Point::new(base - 10.0, band.center(i)),
                        text,
                        grays.gray_700,
                    )
                    .with_anchor(TextAnchor::End)
                    .with_baseline(TextBaseline::Middle)
                } else {
                    TextMark::new(Point::new(band.center(i), zero + 15.0), text, grays.gray_700)
                        .with_anchor(TextAnchor::Middle)
                        .with_baseline(TextBaseline::Alphabetic)
                };
                marks.push(Mark::new(
                    MarkId::for_item(role::BAR_LABEL, &slot.id, 0),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(mark),
                ));
            }
        }

        if horizontal {
            marks.push(baseline_vertical(base, plot, theme));
        } else {
            marks.push(baseline(base, plot, theme));
        }

        if !self.ref_values.is_empty() {
            let identity = if horizontal {
                ScaleLinear::new((plot.y0, plot.y1), (plot.y0, plot.y1))
            } else {
                ScaleLinear::new((plot.x0, plot.x1), (plot.x0, plot.x1))
            };
            let identity = ScaleContinuous::Linear(identity);
            let (x, y) = if horizontal {
                (&value_scale, &identity)
            } else {
                (&identity, &value_scale)
            };
            let guides = GuideContext {
                x,
                y,
                plot,
                rtl: settings.rtl,
                theme,
            };
            if horizontal {
                marks.extend(guides.reference_x(&self.ref_values));
            } else {
                marks.extend(guides.reference_y(&self.ref_values));
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
    use vizkit_core::ItemId;

    fn rects(frame: &ChartFrame) -> Vec<Rect> {
        frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Rect(r) => Some(r.rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn null_sub_values_leave_a_gap() {
        let data = vec![GroupedBarDatum::new("A", [Some(5.0), None, Some(3.0)])];
        for orientation in [BarOrientation::Horizontal, BarOrientation::Vertical] {
            let frame = GroupedBarChartSpec::new(orientation).layout(&data, &ViewState::default());
            let bars = rects(&frame);
            assert_eq!(bars.len(), 2, "{orientation:?}");
            let gap = if orientation == BarOrientation::Horizontal {
                bars[1].y0 - bars[0].y1
            } else {
                bars[1].x0 - bars[0].x1
            };
            let width = if orientation == BarOrientation::Horizontal {
                bars[0].height()
            } else {
                bars[0].width()
            };
            assert!(gap > width, "the null slot keeps its space");
        }
    }

    #[test]
    fn mixed_signs_grow_from_zero() {
        let data = vec![GroupedBarDatum::new("A", [Some(4.0), Some(-2.0)])];
        let frame = GroupedBarChartSpec::new(BarOrientation::Horizontal)
            .layout(&data, &ViewState::default());
        let bars = rects(&frame);
        assert!((bars[0].x0 - bars[1].x1).abs() < 1e-9);
        assert!(bars[0].width() > bars[1].width());
    }

    #[test]
    fn selected_color_dims_other_series() {
        let data = vec![
            GroupedBarDatum::new("A", [Some(1.0), Some(2.0)]),
            GroupedBarDatum::new("B", [Some(3.0), Some(4.0)]),
        ];
        let spec = GroupedBarChartSpec::new(BarOrientation::Vertical);
        let second = spec.colors.get(1);
        let frame = spec.layout(&data, &ViewState::default().with_selected_color(Some(second)));
        let opacities: Vec<f64> = frame
            .marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Rect(_)))
            .map(|m| m.opacity)
            .collect();
        assert_eq!(opacities, [DIM_OPACITY, 1.0, DIM_OPACITY, 1.0]);
    }

    #[test]
    fn hits_resolve_category_and_series() {
        let data = vec![
            GroupedBarDatum::new("A", [Some(1.0), Some(2.0)]),
            GroupedBarDatum::new("B", [Some(3.0), Some(4.0)]),
        ];
        let frame = GroupedBarChartSpec::new(BarOrientation::Vertical)
            .layout(&data, &ViewState::default());
        let bar = rects(&frame)[2];
        let hit = frame.hit_test(bar.center()).unwrap();
        assert_eq!(hit.id, ItemId::Index(1));
        assert_eq!(hit.series, Some(0));
    }
}
