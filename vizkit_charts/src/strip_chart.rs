// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal strip chart: every datum sits on one line at its position.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;
use vizkit_core::{
    CircleMark, ItemId, Label, Mark, MarkId, MarkPayload, RectMark, StripDatum, TextAnchor,
    TextBaseline, TextMark,
};
use vizkit_transforms::{Extent, ExtentOptions, ZeroInclusion};

use crate::chart_spec::{ChartSettings, DEFAULT_RADIUS};
use crate::color::{ColorScale, Palette};
use crate::format::format_number;
use crate::frame::{ChartFrame, HitTarget};
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::ScaleLinearSpec;
use crate::z_order;

/// Width of a strip mark.
const STRIP_WIDTH: f64 = 2.0;

/// Mark drawn per datum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StripStyle {
    /// A circle of the configured radius.
    #[default]
    Dot,
    /// A thin vertical bar, twice the radius tall.
    Strip,
}

/// Settings for a horizontal strip chart.
#[derive(Clone, Debug, PartialEq)]
pub struct StripChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Mark colors, indexed through the color domain.
    pub colors: Palette,
    /// Explicit color domain; distinct data colors when absent.
    pub color_domain: Option<Vec<String>>,
    /// Dot radius, or half the strip height.
    pub radius: f64,
    /// Mark shape.
    pub style: StripStyle,
    /// Opacity of marks that are not emphasized.
    pub dot_opacity: f64,
    /// Labels of data to emphasize; drawn on top with their value.
    pub highlighted: Vec<Label>,
    /// Fill for emphasized marks; their category color when absent.
    pub highlight_color: Option<Color>,
    /// Label the two ends of the line.
    pub show_axis: bool,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
}

impl Default for StripChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(10.0, 10.0, 10.0, 10.0)),
            colors: Palette::categorical(),
            color_domain: None,
            radius: DEFAULT_RADIUS,
            style: StripStyle::Dot,
            dot_opacity: DIM_OPACITY,
            highlighted: Vec::new(),
            highlight_color: None,
            show_axis: true,
            prefix: String::new(),
            suffix: String::new(),
            min_value: None,
            max_value: None,
        }
    }
}

impl StripChartSpec {
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

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the mark shape.
    pub fn with_style(mut self, style: StripStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the opacity of marks that are not emphasized.
    pub fn with_dot_opacity(mut self, opacity: f64) -> Self {
        self.dot_opacity = opacity;
        self
    }

    /// Emphasizes data with these labels.
    pub fn with_highlighted(mut self, labels: Vec<Label>, color: Option<Color>) -> Self {
        self.highlighted = labels;
        self.highlight_color = color;
        self
    }

    /// Toggles the end labels.
    pub fn with_axis(mut self, show: bool) -> Self {
        self.show_axis = show;
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

    fn highlight_rank(&self, label: &Label) -> Option<usize> {
        self.highlighted.iter().position(|h| h == label)
    }

    /// Lays out `data`.
    ///
    /// Emphasized data is drawn last, the first emphasized label on top.
    pub fn layout(&self, data: &[StripDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        if data.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let grays = theme.grays();
        let plot = settings.arrange(Margins::ZERO).plot;
        let extent = Extent::of(
            data.iter().map(|d| Some(d.position)),
            &ExtentOptions::new()
                .with_min(self.min_value)
                .with_max(self.max_value)
                .with_zero(ZeroInclusion::Exclude),
        );
        let x = ScaleLinearSpec::new((extent.min, extent.max))
            .with_nice(true)
            .instantiate((plot.x0, plot.x1));
        let cy = 0.5 * (plot.y0 + plot.y1);
        tracing::debug!(points = data.len(), domain = ?x.domain(), style = ?self.style, "strip layout");

        let mut order: Vec<usize> = (0..data.len()).collect();
        order.sort_by_key(|&i| match self.highlight_rank(&data[i].label) {
            None => (false, 0),
            Some(rank) => (true, usize::MAX - rank),
        });

        let colors = match &self.color_domain {
            Some(domain) => ColorScale::new(domain.iter().cloned(), self.colors.clone()),
            None => ColorScale::from_keys(data.iter().map(|d| d.color.as_deref()), self.colors.clone()),
        };
        let colored = data.iter().any(|d| d.color.is_some());
        let r = self.radius;

        let mut marks = Vec::new();
        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for index in order {
            let d = &data[index];
            let id = ItemId::Index(index);
            let category = if colored {
                colors.color_of(d.color.as_deref())
            } else {
                self.colors.first()
            };
            let emphasized = self.highlight_rank(&d.label).is_some();
            let fill = match self.highlight_color {
                Some(c) if emphasized => c,
                _ => category,
            };
            let opacity = match view.selected_color {
                Some(selected) if d.color.is_some() && selected == category => 1.0,
                Some(_) => self.dot_opacity,
                None if emphasized => 1.0,
                None => self.dot_opacity,
            };
            let cx = x.map(d.position);
            let (payload, shape) = match self.style {
                StripStyle::Dot => {
                    let center = Point::new(cx, cy);
                    (
                        MarkPayload::Circle(CircleMark {
                            center,
                            radius: r,
                            fill: fill.into(),
                            stroke: Color::TRANSPARENT.into(),
                            stroke_width: 0.0,
                        }),
                        HitShape::Circle { center, radius: r },
                    )
                }
                StripStyle::Strip => {
                    let half = 0.5 * STRIP_WIDTH;
                    let rect = Rect::new(cx - half, cy - r, cx + half, cy + r);
                    (
                        MarkPayload::Rect(RectMark {
                            rect,
                            fill: fill.into(),
                        }),
                        HitShape::Rect(rect),
                    )
                }
            };
            marks.push(
                Mark::new(
                    MarkId::for_item(role::POINT, &id, 0),
                    z_order::SERIES_POINTS,
                    payload,
                )
                .with_opacity(opacity),
            );
            if emphasized {
                let text = TextMark::new(
                    Point::new(cx, cy - r - 5.0),
                    format_number(Some(d.position), &self.prefix, &self.suffix, None),
                    fill,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Alphabetic);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::POINT_LABEL, &id, 0),
                        z_order::SERIES_HIGHLIGHT,
                        MarkPayload::Text(text),
                    )
                    .with_opacity(opacity),
                );
            }
            regions.push((shape, targets.len()));
            targets.push(HitTarget::datum(id, index));
        }

        if self.show_axis {
            let y = cy + r + 14.0;
            let ends = [
                (plot.x0, TextAnchor::Start),
                (plot.x1, TextAnchor::End),
            ];
            for (i, (px, anchor)) in ends.into_iter().enumerate() {
                let text = TextMark::new(
                    Point::new(px, y),
                    format_number(Some(x.invert(px)), "", "", None),
                    grays.gray_550,
                )
                .with_anchor(anchor)
                .with_baseline(TextBaseline::Alphabetic)
                .with_font_size(12.0);
                marks.push(Mark::new(
                    MarkId::for_guide(role::AXIS_LABEL, i),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(text),
                ));
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

    fn data() -> Vec<StripDatum> {
        vec![
            StripDatum::new("A", 12.0),
            StripDatum::new("B", 47.0),
            StripDatum::new("C", 30.0),
        ]
    }

    #[test]
    fn axis_labels_the_scale_ends_without_zero() {
        let frame = StripChartSpec::default().layout(&data(), &ViewState::default());
        let axis = [
            MarkId::for_guide(role::AXIS_LABEL, 0),
            MarkId::for_guide(role::AXIS_LABEL, 1),
        ];
        let ends: Vec<String> = frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) if axis.contains(&m.id) => Some(t.text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(ends, vec!["10", "50"]);
    }

    #[test]
    fn highlighted_points_are_drawn_last_and_opaque() {
        let spec = StripChartSpec::default()
            .with_highlighted(vec![Label::from("A"), Label::from("C")], None);
        let frame = spec.layout(&data(), &ViewState::default());
        let order: Vec<Option<usize>> = frame.targets.iter().map(|t| t.datum).collect();
        assert_eq!(order, vec![Some(1), Some(2), Some(0)]);
        let opacities: Vec<f64> = frame
            .marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Circle(_)))
            .map(|m| m.opacity)
            .collect();
        assert_eq!(opacities, vec![DIM_OPACITY, 1.0, 1.0]);
    }

    #[test]
    fn strips_are_thin_rects_twice_the_radius_tall() {
        let spec = StripChartSpec::default().with_style(StripStyle::Strip);
        let frame = spec.layout(&data(), &ViewState::default());
        let rect = frame
            .marks
            .iter()
            .find_map(|m| match &m.payload {
                MarkPayload::Rect(r) => Some(r.rect),
                _ => None,
            })
            .unwrap();
        assert!((rect.width() - STRIP_WIDTH).abs() < 1e-9);
        assert!((rect.height() - 2.0 * spec.radius).abs() < 1e-9);
        let hit = frame.hit_test(rect.center()).unwrap();
        assert_eq!(hit.datum, Some(0));
    }
}
