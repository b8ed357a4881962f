// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple vertical bar chart.
//!
//! One bar per slot over a band scale, growing from the zero line. Category labels sit under the
//! zero line and value labels at the bar end; both flip sides for negative bars.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use vizkit_core::{
    BarDatum, Label, Mark, MarkId, MarkPayload, RectMark, ReferenceValue, TextAnchor,
    TextBaseline, TextMark,
};
use vizkit_transforms::{ExtentOptions, IdStrategy, NormalizeOptions, normalize};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{
    ChartSettings, DEFAULT_BAR_PADDING, DEFAULT_TICK_COUNT, DEFAULT_TRUNCATE_BY,
};
use crate::color::{ColorScale, Palette};
use crate::format::{format_number, truncate_label};
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, baseline};
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DEFAULT_OPACITY, DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::{BandThickness, ScaleBand, ScaleContinuous, ScaleLinear, ScaleLinearSpec};
use crate::z_order;

/// Settings for a vertical bar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Bar colors: a single color, or one per color-domain entry.
    pub colors: Palette,
    /// Category keys in palette order; defaults to the data's colors in first-seen order.
    pub color_domain: Option<Vec<String>>,
    /// Inner band padding as a fraction of the step.
    pub bar_padding: f64,
    /// Optional bounds on the per-bar step.
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
    /// Explicit category order; identifies bars by label.
    pub label_order: Option<Vec<Label>>,
    /// Labels drawn at full strength while the others are dimmed.
    pub highlighted: Vec<Label>,
    /// Horizontal reference lines.
    pub ref_values: Vec<ReferenceValue>,
    /// Title of the value axis.
    pub axis_title: Option<String>,
    /// Value label color; defaults to the bar color for a single-color palette.
    pub value_color: Option<Color>,
}

impl Default for BarChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::default(),
            colors: Palette::single(crate::color::MAIN),
            color_domain: None,
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
            highlighted: Vec::new(),
            ref_values: Vec::new(),
            axis_title: None,
            value_color: None,
        }
    }
}

impl BarChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the palette and, optionally, the category keys it is indexed by.
    pub fn with_colors(mut self, colors: Palette, domain: Option<Vec<String>>) -> Self {
        self.colors = colors;
        self.color_domain = domain;
        self
    }

    /// Sets the inner band padding.
    pub fn with_bar_padding(mut self, padding: f64) -> Self {
        self.bar_padding = padding;
        self
    }

    /// Bounds the per-bar step.
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

    /// Lays bars out in this label order.
    pub fn with_label_order(mut self, order: Vec<Label>) -> Self {
        self.label_order = Some(order);
        self
    }

    /// Highlights these labels.
    pub fn with_highlighted(mut self, labels: Vec<Label>) -> Self {
        self.highlighted = labels;
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

    /// Removes the value axis title.
    pub fn without_axis_title(mut self) -> Self {
        self.axis_title = None;
        self
    }

    /// Sets the value label color.
    pub fn with_value_color(mut self, color: Color) -> Self {
        self.value_color = Some(color);
        self
    }

    fn ids(&self) -> IdStrategy {
        match &self.label_order {
            Some(order) => IdStrategy::LabelOrder(order.clone()),
            None => IdStrategy::Positional,
        }
    }

    fn color_scale(&self, data: &[BarDatum]) -> ColorScale {
        match &self.color_domain {
            Some(domain) => ColorScale::new(domain.iter().cloned(), self.colors.clone()),
            None => ColorScale::from_keys(data.iter().map(|d| d.color.as_deref()), self.colors.clone()),
        }
    }

    fn opacity(&self, fill: Color, label: &Label, view: &ViewState) -> f64 {
        match view.selected_color {
            Some(selected) if selected == fill => 1.0,
            Some(_) => DIM_OPACITY,
            None if self.highlighted.is_empty() => DEFAULT_OPACITY,
            None if self.highlighted.contains(label) => DEFAULT_OPACITY,
            None => DIM_OPACITY,
        }
    }

    /// Lays out `data`.
    pub fn layout(&self, data: &[BarDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        if data.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let grays = theme.grays();
        let extra = if self.axis_title.is_some() {
            Margins::new(0.0, 0.0, 30.0, 0.0)
        } else {
            Margins::ZERO
        };
        let layout = settings.arrange(extra);
        let plot = layout.plot;

        let norm = normalize(
            data,
            &NormalizeOptions::default()
                .with_extent(
                    ExtentOptions::new()
                        .with_min(self.min_value)
                        .with_max(self.max_value),
                )
                .with_ids(self.ids()),
        );
        let n = norm.slots.len();
        let extent = self.thickness.extent(plot.width(), n);
        let band = ScaleBand::new((plot.x0, plot.x0 + extent), n).with_padding(self.bar_padding, 0.0);
        let y = ScaleLinearSpec::new((norm.min(), norm.max()))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));
        tracing::debug!(
            slots = n,
            min = norm.min(),
            max = norm.max(),
            band_width = band.band_width(),
            "bar chart layout"
        );

        let y_scale = ScaleContinuous::Linear(y);
        let mut marks = Vec::new();
        if self.show_ticks {
            let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
            let mut axis = AxisSpec::left()
                .with_inline_labels(true)
                .with_tick_count(self.tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_grid(GridStyle::themed(theme))
                .with_tick_formatter(move |v, _| format_number(Some(v), &prefix, &suffix, None));
            if let Some(title) = &self.axis_title {
                axis = axis
                    .with_title(title.clone())
                    .with_title_offset(settings.margins.left + 15.0);
            }
            marks.extend(axis.marks(&y_scale, plot));
        }

        let colors = self.color_scale(data);
        let colored = data.iter().any(|d| d.color.is_some());
        let value_fill = match self.value_color {
            Some(c) => c,
            None if self.colors.len() == 1 => self.colors.first(),
            None => grays.gray_600,
        };
        let zero = y.map(0.0);

        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for (i, slot) in norm.slots.iter().enumerate() {
            let x0 = band.x(i);
            let cx = band.center(i);
            let (size, opacity) = match slot.datum {
                Some(index) => {
                    let d = &data[index];
                    let fill = if colored {
                        colors.color_of(d.color.as_deref())
                    } else {
                        self.colors.first()
                    };
                    let opacity = self.opacity(fill, &slot.label, view);
                    if let Some(v) = d.size.filter(|v| *v != 0.0) {
                        let yv = y.map(v);
                        let rect = Rect::new(x0, yv.min(zero), x0 + band.band_width(), yv.max(zero));
                        marks.push(
                            Mark::new(
                                MarkId::for_item(role::BAR, &slot.id, 0),
                                z_order::SERIES_FILL,
                                MarkPayload::Rect(RectMark {
                                    rect,
                                    fill: fill.into(),
                                }),
                            )
                            .with_opacity(opacity),
                        );
                        regions.push((HitShape::Rect(rect), targets.len()));
                    }
                    targets.push(HitTarget::datum(slot.id.clone(), index));
                    (d.size, opacity)
                }
                // Label-only slot: the category is shown with a zero value.
                None => (Some(0.0), 1.0),
            };
            let negative = size.is_some_and(|v| v < 0.0);

            if self.show_labels {
                let dy = if negative { -5.0 } else { 15.0 };
                let text = TextMark::new(
                    Point::new(cx, zero + dy),
                    truncate_label(&slot.label.text(), self.truncate_by),
                    grays.gray_700,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Alphabetic);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::BAR_LABEL, &slot.id, 0),
                        z_order::AXIS_LABELS,
                        MarkPayload::Text(text),
                    )
                    .with_opacity(opacity),
                );
            }
            if self.show_values {
                let (end, dy) = match size {
                    Some(v) if v < 0.0 => (y.map(v), 15.0),
                    Some(v) => (y.map(v), -5.0),
                    None => (zero, -5.0),
                };
                let text = TextMark::new(
                    Point::new(cx, end + dy),
                    format_number(size, &self.prefix, &self.suffix, None),
                    value_fill,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Alphabetic);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::BAR_VALUE, &slot.id, 0),
                        z_order::AXIS_LABELS,
                        MarkPayload::Text(text),
                    )
                    .with_opacity(opacity),
                );
            }
        }

        let (lo, _) = y.domain();
        marks.push(baseline(y.map(lo.max(0.0)), plot, theme));

        if !self.ref_values.is_empty() {
            let x = ScaleContinuous::Linear(ScaleLinear::new((plot.x0, plot.x1), (plot.x0, plot.x1)));
            let guides = GuideContext {
                x: &x,
                y: &y_scale,
                plot,
                rtl: settings.rtl,
                theme,
            };
            marks.extend(guides.reference_y(&self.ref_values));
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

    fn rects(frame: &ChartFrame) -> Vec<(Rect, f64)> {
        frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Rect(r) => Some((r.rect, m.opacity)),
                _ => None,
            })
            .collect()
    }

    fn texts(frame: &ChartFrame, role: u16, id: &ItemId) -> Option<TextMark> {
        frame.marks.iter().find_map(|m| match &m.payload {
            MarkPayload::Text(t) if m.id == MarkId::for_item(role, id, 0) => Some(t.clone()),
            _ => None,
        })
    }

    #[test]
    fn bars_grow_from_zero_in_both_directions() {
        let data = vec![BarDatum::new("A", Some(5.0)), BarDatum::new("B", Some(-3.0))];
        let frame = BarChartSpec::default().layout(&data, &ViewState::default());
        let bars = rects(&frame);
        assert_eq!(bars.len(), 2);
        let (a, b) = (bars[0].0, bars[1].0);
        assert!((a.y1 - b.y0).abs() < 1e-9, "both bars meet at the zero line");
        assert!(a.height() > b.height());

        let label_b = texts(&frame, role::BAR_LABEL, &ItemId::Index(1)).unwrap();
        assert!(label_b.pos.y < b.y0, "negative bars put their label above zero");
        let value_b = texts(&frame, role::BAR_VALUE, &ItemId::Index(1)).unwrap();
        assert_eq!(value_b.text, "-3");
        assert!(value_b.pos.y > b.y1);
    }

    #[test]
    fn null_and_zero_sizes_draw_no_rect_but_keep_labels() {
        let data = vec![
            BarDatum::new("A", Some(2.0)),
            BarDatum::new("B", None),
            BarDatum::new("C", Some(0.0)),
        ];
        let frame = BarChartSpec::default().layout(&data, &ViewState::default());
        assert_eq!(rects(&frame).len(), 1);
        assert_eq!(
            texts(&frame, role::BAR_VALUE, &ItemId::Index(1)).unwrap().text,
            "NA"
        );
        assert!(texts(&frame, role::BAR_LABEL, &ItemId::Index(2)).is_some());
        assert_eq!(frame.targets.len(), 3);
    }

    #[test]
    fn selected_color_and_highlights_drive_opacity() {
        let data = vec![
            BarDatum::new("A", Some(1.0)).with_color("north"),
            BarDatum::new("B", Some(2.0)).with_color("south"),
        ];
        let spec = BarChartSpec::default().with_colors(Palette::categorical(), None);
        let south = crate::color::CATEGORICAL[1];
        let frame = spec.layout(&data, &ViewState::default().with_selected_color(Some(south)));
        let opacities: Vec<f64> = rects(&frame).into_iter().map(|(_, o)| o).collect();
        assert_eq!(opacities, [DIM_OPACITY, 1.0]);

        let frame = spec
            .with_highlighted(vec![Label::from("A")])
            .layout(&data, &ViewState::default());
        let opacities: Vec<f64> = rects(&frame).into_iter().map(|(_, o)| o).collect();
        assert_eq!(opacities, [DEFAULT_OPACITY, DIM_OPACITY]);
    }

    #[test]
    fn label_order_adds_label_only_slots() {
        let data = vec![BarDatum::new("B", Some(4.0)), BarDatum::new("A", Some(2.0))];
        let spec = BarChartSpec::default().with_label_order(vec![
            Label::from("A"),
            Label::from("B"),
            Label::from("C"),
        ]);
        let frame = spec.layout(&data, &ViewState::default());
        let a = ItemId::Label(Label::from("A"));
        let c = ItemId::Label(Label::from("C"));
        assert_eq!(frame.target(&a).and_then(|t| t.datum), Some(1));
        assert!(frame.target(&c).is_none());
        assert_eq!(texts(&frame, role::BAR_VALUE, &c).unwrap().text, "0");

        let bars = rects(&frame);
        assert!(bars[0].0.x0 < bars[1].0.x0, "A is laid out before B");
    }

    #[test]
    fn hovering_a_bar_resolves_its_target() {
        let data = vec![BarDatum::new("A", Some(5.0)), BarDatum::new("B", Some(3.0))];
        let frame = BarChartSpec::default().layout(&data, &ViewState::default());
        let bar = rects(&frame)[1].0;
        let hit = frame.hit_test(bar.center()).unwrap();
        assert_eq!(hit.datum, Some(1));
        assert_eq!(frame.hit_test(Point::new(bar.x1 + 1.0, bar.y0 - 20.0)), None);
    }

    #[test]
    fn empty_data_yields_placeholder() {
        let frame = BarChartSpec::default().layout(&[], &ViewState::default());
        assert!(frame.is_empty());
    }
}
