// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertical bee-swarm chart.
//!
//! Points sit on one vertical line at their exact position. Overlapping points are not spread
//! apart; emphasized points are drawn last so they stay visible.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;
use vizkit_core::{
    BeeSwarmDatum, CircleMark, ItemId, Label, Mark, MarkId, MarkPayload, ReferenceValue,
    TextAnchor, TextBaseline, TextMark,
};
use vizkit_transforms::{Extent, ExtentOptions, ZeroInclusion};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{ChartSettings, DEFAULT_RADIUS, DEFAULT_TICK_COUNT};
use crate::color::{ColorScale, Palette};
use crate::format::format_number;
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::GuideContext;
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DEFAULT_OPACITY, DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::{MIN_RADIUS, ScaleContinuous, ScaleLinear, ScaleLinearSpec, ScaleSqrt};
use crate::z_order;

/// Settings for a vertical bee-swarm chart.
#[derive(Clone, Debug, PartialEq)]
pub struct BeeSwarmChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Point colors, indexed through the color domain.
    pub colors: Palette,
    /// Explicit color domain; distinct data colors in first-seen order when absent.
    pub color_domain: Option<Vec<String>>,
    /// Point radius, or the largest bubble radius when points carry a radius.
    pub radius: f64,
    /// Value mapped to the largest bubble; the largest data radius when absent.
    pub max_radius_value: Option<f64>,
    /// Draw every point's label.
    pub show_labels: bool,
    /// Draw gridlines and tick labels.
    pub show_ticks: bool,
    /// Target tick count.
    pub tick_count: usize,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// Labels of points to emphasize.
    pub highlighted: Vec<Label>,
    /// Horizontal reference lines.
    pub ref_values: Vec<ReferenceValue>,
}

impl Default for BeeSwarmChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(20.0, 25.0, 30.0, 20.0)),
            colors: Palette::categorical(),
            color_domain: None,
            radius: DEFAULT_RADIUS,
            max_radius_value: None,
            show_labels: false,
            show_ticks: true,
            tick_count: DEFAULT_TICK_COUNT,
            prefix: String::new(),
            suffix: String::new(),
            min_value: None,
            max_value: None,
            highlighted: Vec::new(),
            ref_values: Vec::new(),
        }
    }
}

impl BeeSwarmChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the palette and, optionally, the category order it follows.
    pub fn with_colors(mut self, colors: Palette, domain: Option<Vec<String>>) -> Self {
        self.colors = colors;
        self.color_domain = domain;
        self
    }

    /// Sets the point radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the value mapped to the largest bubble.
    pub fn with_max_radius_value(mut self, value: f64) -> Self {
        self.max_radius_value = Some(value);
        self
    }

    /// Toggles point labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
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

    /// Overrides the extent bounds.
    pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Emphasizes points with these labels.
    pub fn with_highlighted(mut self, labels: Vec<Label>) -> Self {
        self.highlighted = labels;
        self
    }

    /// Sets the reference lines.
    pub fn with_ref_values(mut self, refs: Vec<ReferenceValue>) -> Self {
        self.ref_values = refs;
        self
    }

    fn opacity(&self, d: &BeeSwarmDatum, fill: Color, view: &ViewState) -> f64 {
        match view.selected_color {
            Some(selected) if d.color.is_some() && selected == fill => 1.0,
            Some(_) => DIM_OPACITY,
            None if self.highlighted.is_empty() => DEFAULT_OPACITY,
            None if self.highlighted.contains(&d.label) => 1.0,
            None => DIM_OPACITY,
        }
    }

    /// Lays out `data`.
    pub fn layout(&self, data: &[BeeSwarmDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        if data.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let plot = settings.arrange(Margins::ZERO).plot;
        let extent = Extent::of(
            data.iter().map(|d| Some(d.position)),
            &ExtentOptions::new()
                .with_min(self.min_value)
                .with_max(self.max_value)
                .with_zero(ZeroInclusion::Exclude),
        );
        let y = ScaleLinearSpec::new((extent.min, extent.max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));
        let radius_scale = data.iter().any(|d| d.radius.is_some()).then(|| {
            let max = self.max_radius_value.unwrap_or_else(|| {
                data.iter()
                    .filter_map(|d| d.radius)
                    .fold(0.0, f64::max)
            });
            ScaleSqrt::radius(max, self.radius)
        });
        let cx = 0.5 * (plot.x0 + plot.x1);
        tracing::debug!(points = data.len(), domain = ?y.domain(), "bee swarm layout");

        let y_scale = ScaleContinuous::Linear(y);
        let mut marks = Vec::new();
        if self.show_ticks {
            let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
            let axis = AxisSpec::left()
                .with_inline_labels(true)
                .with_tick_count(self.tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_grid(GridStyle::themed(theme))
                .with_tick_formatter(move |v, _| format_number(Some(v), &prefix, &suffix, None));
            marks.extend(axis.marks(&y_scale, plot));
        }

        let mut order: Vec<usize> = (0..data.len()).collect();
        order.sort_by_key(|&i| self.highlighted.contains(&data[i].label));

        let colors = match &self.color_domain {
            Some(domain) => ColorScale::new(domain.iter().cloned(), self.colors.clone()),
            None => ColorScale::from_keys(data.iter().map(|d| d.color.as_deref()), self.colors.clone()),
        };
        let colored = data.iter().any(|d| d.color.is_some());
        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for index in order {
            let d = &data[index];
            let id = ItemId::Index(index);
            let fill = if colored {
                colors.color_of(d.color.as_deref())
            } else {
                self.colors.first()
            };
            let r = match (radius_scale, d.radius) {
                (Some(scale), Some(v)) => scale.map(v),
                (Some(_), None) => MIN_RADIUS,
                (None, _) => self.radius,
            };
            let opacity = self.opacity(d, fill, view);
            let center = Point::new(cx, y.map(d.position));
            marks.push(
                Mark::new(
                    MarkId::for_item(role::POINT, &id, 0),
                    z_order::SERIES_POINTS,
                    MarkPayload::Circle(CircleMark {
                        center,
                        radius: r,
                        fill: fill.into(),
                        stroke: fill.into(),
                        stroke_width: 1.0,
                    }),
                )
                .with_opacity(opacity),
            );
            if self.show_labels || self.highlighted.contains(&d.label) {
                let text = TextMark::new(
                    Point::new(center.x + r + 3.0, center.y),
                    d.label.text(),
                    fill,
                )
                .with_anchor(TextAnchor::Start)
                .with_baseline(TextBaseline::Middle)
                .with_font_size(10.0);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::POINT_LABEL, &id, 0),
                        z_order::SERIES_HIGHLIGHT,
                        MarkPayload::Text(text),
                    )
                    .with_opacity(opacity),
                );
            }
            regions.push((HitShape::Circle { center, radius: r }, targets.len()));
            targets.push(HitTarget::datum(id, index));
        }

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

    fn centers(frame: &ChartFrame) -> Vec<(Point, f64)> {
        frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Circle(c) => Some((c.center, c.radius)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn points_share_one_vertical_line() {
        let data = vec![
            BeeSwarmDatum::new("A", 3.0),
            BeeSwarmDatum::new("B", 3.0),
            BeeSwarmDatum::new("C", 8.0),
        ];
        let frame = BeeSwarmChartSpec::default().layout(&data, &ViewState::default());
        let points = centers(&frame);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|(p, _)| p.x == points[0].0.x));
        assert_eq!(points[0].0, points[1].0, "no jitter");
        assert!(points[2].0.y < points[0].0.y, "larger values sit higher");
    }

    #[test]
    fn radius_scale_keeps_zero_visible() {
        let data = vec![
            BeeSwarmDatum::new("A", 1.0).with_radius(0.0),
            BeeSwarmDatum::new("B", 2.0).with_radius(100.0),
        ];
        let spec = BeeSwarmChartSpec::default().with_radius(20.0);
        let radii: Vec<f64> = centers(&spec.layout(&data, &ViewState::default()))
            .iter()
            .map(|(_, r)| *r)
            .collect();
        assert_eq!(radii[0], MIN_RADIUS);
        assert!((radii[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn highlighted_points_are_drawn_last() {
        let data = vec![
            BeeSwarmDatum::new("A", 1.0),
            BeeSwarmDatum::new("B", 2.0),
            BeeSwarmDatum::new("C", 3.0),
        ];
        let spec = BeeSwarmChartSpec::default().with_highlighted(vec![Label::from("A")]);
        let frame = spec.layout(&data, &ViewState::default());
        let order: Vec<Option<usize>> = frame.targets.iter().map(|t| t.datum).collect();
        assert_eq!(order, vec![Some(1), Some(2), Some(0)]);
        let (center, _) = centers(&frame)[2];
        assert_eq!(frame.hit_test(center).unwrap().datum, Some(0));
    }

    #[test]
    fn color_domain_defaults_to_data_colors() {
        let data = vec![
            BeeSwarmDatum::new("A", 1.0).with_color("north"),
            BeeSwarmDatum::new("B", 2.0).with_color("south"),
            BeeSwarmDatum::new("C", 3.0).with_color("north"),
        ];
        let spec = BeeSwarmChartSpec::default();
        let frame = spec.layout(&data, &ViewState::default().with_selected_color(Some(spec.colors.get(1))));
        let opacities: Vec<f64> = frame
            .marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Circle(_)))
            .map(|m| m.opacity)
            .collect();
        assert_eq!(opacities, vec![DIM_OPACITY, 1.0, DIM_OPACITY]);
    }
}
