// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatter plot with optional bubble radii.
//!
//! Pointer hits resolve through Voronoi cells over the drawn points, so the nearest point always
//! wins inside the plot.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Color;
use vizkit_core::{
    Annotation, CircleMark, CustomHighlightArea, HighlightArea, ItemId, Label, Mark, MarkId,
    MarkPayload, ReferenceValue, ScatterDatum, TextAnchor, TextBaseline, TextMark,
};
use vizkit_transforms::{Extent, ExtentOptions};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{ChartSettings, DEFAULT_RADIUS, DEFAULT_TICK_COUNT};
use crate::color::{ColorScale, Palette};
use crate::format::format_number;
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, RegressionSpace, baseline, baseline_vertical};
use crate::hit::HitIndex;
use crate::interaction::{DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::{MIN_RADIUS, ScaleContinuous, ScaleLinearSpec, ScaleSqrt};
use crate::voronoi::Voronoi;
use crate::z_order;

/// Fill alpha of scatter points.
const POINT_FILL_ALPHA: f32 = 0.6;

/// A regression line request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegressionLine {
    /// Space the least-squares fit runs in.
    pub space: RegressionSpace,
    /// CSS color; theme text color when absent.
    pub color: Option<String>,
}

/// Settings for a scatter plot.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterChartSpec {
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
    /// Draw point labels.
    pub show_labels: bool,
    /// Horizontal axis title.
    pub x_axis_title: Option<String>,
    /// Vertical axis title.
    pub y_axis_title: Option<String>,
    /// Target tick count on both axes.
    pub tick_count: usize,
    /// Horizontal extent overrides.
    pub x_range: (Option<f64>, Option<f64>),
    /// Vertical extent overrides.
    pub y_range: (Option<f64>, Option<f64>),
    /// Labels of points to emphasize.
    pub highlighted: Vec<Label>,
    /// Vertical reference lines.
    pub ref_x_values: Vec<ReferenceValue>,
    /// Horizontal reference lines.
    pub ref_y_values: Vec<ReferenceValue>,
    /// Shaded region in data units.
    pub highlight_area: HighlightArea,
    /// Shaded region fill; theme panel gray when absent.
    pub highlight_area_color: Option<Color>,
    /// Free-form highlight segments and polygons.
    pub custom_highlight_areas: Vec<CustomHighlightArea>,
    /// Text callouts.
    pub annotations: Vec<Annotation>,
    /// Optional least-squares line.
    pub regression: Option<RegressionLine>,
}

impl Default for ScatterChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(20.0, 50.0, 60.0, 20.0)),
            colors: Palette::categorical(),
            color_domain: None,
            radius: DEFAULT_RADIUS,
            max_radius_value: None,
            show_labels: false,
            x_axis_title: None,
            y_axis_title: None,
            tick_count: DEFAULT_TICK_COUNT,
            x_range: (None, None),
            y_range: (None, None),
            highlighted: Vec::new(),
            ref_x_values: Vec::new(),
            ref_y_values: Vec::new(),
            highlight_area: HighlightArea::default(),
            highlight_area_color: None,
            custom_highlight_areas: Vec::new(),
            annotations: Vec::new(),
            regression: None,
        }
    }
}

impl ScatterChartSpec {
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

    /// Sets both axis titles.
    pub fn with_axis_titles(mut self, x: Option<String>, y: Option<String>) -> Self {
        self.x_axis_title = x;
        self.y_axis_title = y;
        self
    }

    /// Sets the tick count target.
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count;
        self
    }

    /// Overrides the horizontal extent bounds.
    pub fn with_x_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.x_range = (min, max);
        self
    }

    /// Overrides the vertical extent bounds.
    pub fn with_y_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.y_range = (min, max);
        self
    }

    /// Emphasizes points with these labels.
    pub fn with_highlighted(mut self, labels: Vec<Label>) -> Self {
        self.highlighted = labels;
        self
    }

    /// Sets the reference lines.
    pub fn with_ref_values(mut self, x: Vec<ReferenceValue>, y: Vec<ReferenceValue>) -> Self {
        self.ref_x_values = x;
        self.ref_y_values = y;
        self
    }

    /// Sets the shaded region.
    pub fn with_highlight_area(mut self, area: HighlightArea, color: Option<Color>) -> Self {
        self.highlight_area = area;
        self.highlight_area_color = color;
        self
    }

    /// Sets the free-form highlight areas.
    pub fn with_custom_highlight_areas(mut self, areas: Vec<CustomHighlightArea>) -> Self {
        self.custom_highlight_areas = areas;
        self
    }

    /// Sets the annotations.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Draws a least-squares line.
    pub fn with_regression(mut self, regression: RegressionLine) -> Self {
        self.regression = Some(regression);
        self
    }

    /// Removes the least-squares line.
    pub fn without_regression(mut self) -> Self {
        self.regression = None;
        self
    }

    fn color_scale(&self, data: &[ScatterDatum]) -> ColorScale {
        match &self.color_domain {
            Some(domain) => ColorScale::new(domain.iter().cloned(), self.colors.clone()),
            None => ColorScale::from_keys(data.iter().map(|d| d.color.as_deref()), self.colors.clone()),
        }
    }

    fn opacity(&self, d: &ScatterDatum, id: &ItemId, fill: Color, view: &ViewState) -> f64 {
        if let Some(selected) = view.selected_color {
            return if d.color.is_some() && fill == selected {
                1.0
            } else {
                DIM_OPACITY
            };
        }
        if let Some(hovered) = &view.hovered {
            return if hovered == id { 1.0 } else { DIM_OPACITY };
        }
        if self.highlighted.is_empty() {
            return 1.0;
        }
        match &d.label {
            Some(label) if self.highlighted.contains(label) => 1.0,
            _ => DIM_OPACITY,
        }
    }

    /// Draw order: bubbles largest first, then radius-less points; input order without radii.
    fn draw_order(data: &[ScatterDatum]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..data.len())
            .filter(|&i| {
                data[i].x.is_some_and(f64::is_finite) && data[i].y.is_some_and(f64::is_finite)
            })
            .collect();
        if data.iter().any(|d| d.radius.is_some()) {
            order.sort_by(|&a, &b| match (data[a].radius, data[b].radius) {
                (Some(ra), Some(rb)) => rb.total_cmp(&ra),
                (Some(_), None) => core::cmp::Ordering::Less,
                (None, Some(_)) => core::cmp::Ordering::Greater,
                (None, None) => core::cmp::Ordering::Equal,
            });
        }
        order
    }

    /// Lays out `data`. Rows with a null or non-finite coordinate are skipped.
    ///
    /// Hit targets follow draw order and carry the input index.
    pub fn layout(&self, data: &[ScatterDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        let order = Self::draw_order(data);
        if order.is_empty() {
            return ChartFrame::empty(settings.resolved_size(), theme);
        }
        let grays = theme.grays();
        let layout = settings.arrange(Margins::ZERO);
        let plot = layout.plot;

        let x_extent = Extent::of(
            data.iter().map(|d| d.x),
            &ExtentOptions::new()
                .with_min(self.x_range.0)
                .with_max(self.x_range.1),
        );
        let y_extent = Extent::of(
            data.iter().map(|d| d.y),
            &ExtentOptions::new()
                .with_min(self.y_range.0)
                .with_max(self.y_range.1),
        );
        let x = ScaleLinearSpec::new((x_extent.min, x_extent.max))
            .with_nice(true)
            .instantiate((plot.x0, plot.x1));
        let y = ScaleLinearSpec::new((y_extent.min, y_extent.max))
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
        tracing::debug!(
            points = order.len(),
            x_domain = ?x.domain(),
            y_domain = ?y.domain(),
            bubbles = radius_scale.is_some(),
            "scatter layout"
        );

        let x_scale = ScaleContinuous::Linear(x);
        let y_scale = ScaleContinuous::Linear(y);
        let guides = GuideContext {
            x: &x_scale,
            y: &y_scale,
            plot,
            rtl: settings.rtl,
            theme,
        };

        let mut marks = Vec::new();
        let highlight_fill = self.highlight_area_color.unwrap_or(grays.gray_300);
        marks.extend(guides.highlight_area(&self.highlight_area, highlight_fill));
        marks.extend(guides.custom_highlight_areas(&self.custom_highlight_areas));

        let axis = |spec: AxisSpec| {
            spec.with_tick_count(self.tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_grid(GridStyle::themed(theme))
                .with_tick_formatter(|v, _| format_number(Some(v), "", "", None))
        };
        let mut y_axis = axis(AxisSpec::left());
        if let Some(title) = &self.y_axis_title {
            y_axis = y_axis.with_title(title.clone()).with_title_offset(30.0);
        }
        let mut x_axis = axis(AxisSpec::bottom());
        if let Some(title) = &self.x_axis_title {
            x_axis = x_axis.with_title(title.clone()).with_title_offset(30.0);
        }
        marks.extend(y_axis.marks(&y_scale, plot));
        marks.extend(x_axis.marks(&x_scale, plot));
        marks.push(baseline(y.map(y.domain().0.max(0.0)), plot, theme));
        marks.push(baseline_vertical(x.map(x.domain().0.max(0.0)), plot, theme));

        let colors = self.color_scale(data);
        let colored = data.iter().any(|d| d.color.is_some());
        let mut sites = Vec::with_capacity(order.len());
        let mut targets = Vec::with_capacity(order.len());
        for &index in &order {
            let d = &data[index];
            let (Some(dx), Some(dy)) = (d.x, d.y) else {
                continue;
            };
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
            let opacity = self.opacity(d, &id, fill, view);
            let center = Point::new(x.map(dx), y.map(dy));
            marks.push(
                Mark::new(
                    MarkId::for_item(role::POINT, &id, 0),
                    z_order::SERIES_POINTS,
                    MarkPayload::Circle(CircleMark {
                        center,
                        radius: r,
                        fill: fill.multiply_alpha(POINT_FILL_ALPHA).into(),
                        stroke: fill.into(),
                        stroke_width: 1.0,
                    }),
                )
                .with_opacity(opacity),
            );
            let labeled = d.label.as_ref().filter(|label| {
                self.show_labels || self.highlighted.contains(label)
            });
            if let Some(label) = labeled {
                let text = TextMark::new(Point::new(center.x + r + 3.0, center.y), label.text(), fill)
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
            sites.push(center);
            targets.push(HitTarget::datum(id, index));
        }

        marks.extend(guides.reference_x(&self.ref_x_values));
        marks.extend(guides.reference_y(&self.ref_y_values));
        marks.extend(guides.annotations(&self.annotations));
        if let Some(regression) = &self.regression {
            let points = order.iter().filter_map(|&i| Some((data[i].x?, data[i].y?)));
            marks.extend(guides.regression_line(
                points,
                regression.space,
                regression.color.as_deref(),
            ));
        }

        ChartFrame::new(
            settings.resolved_size(),
            plot,
            marks,
            HitIndex::Voronoi(Voronoi::new(&sites, plot)),
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

    fn circles(frame: &ChartFrame) -> Vec<(MarkId, CircleMark, f64)> {
        frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Circle(c) => Some((m.id, c.clone(), m.opacity)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn null_coordinates_are_skipped() {
        let mut missing = ScatterDatum::new(0.0, 0.0);
        missing.y = None;
        let data = vec![ScatterDatum::new(1.0, 2.0), missing, ScatterDatum::new(3.0, 4.0)];
        let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
        assert_eq!(circles(&frame).len(), 2);
        assert_eq!(frame.targets.len(), 2);
        assert!(frame.target(&ItemId::Index(1)).is_none());
    }

    #[test]
    fn non_finite_coordinates_do_not_break_hits() {
        let data = vec![
            ScatterDatum::new(1.0, 2.0),
            ScatterDatum::new(f64::NAN, 5.0),
            ScatterDatum::new(3.0, 4.0),
            ScatterDatum::new(6.0, f64::INFINITY),
        ];
        let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
        assert_eq!(circles(&frame).len(), 2);
        for (id, c, _) in circles(&frame) {
            let hit = frame.hit_test(c.center).unwrap();
            assert_eq!(MarkId::for_item(role::POINT, &hit.id, 0), id);
        }
    }

    #[test]
    fn bubbles_draw_largest_first_and_radius_less_last() {
        let data = vec![
            ScatterDatum::new(1.0, 1.0).with_radius(1.0),
            ScatterDatum::new(2.0, 2.0),
            ScatterDatum::new(3.0, 3.0).with_radius(9.0),
        ];
        let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
        let drawn: Vec<usize> = frame.targets.iter().filter_map(|t| t.datum).collect();
        assert_eq!(drawn, vec![2, 0, 1]);
        let radii: Vec<f64> = circles(&frame).iter().map(|(_, c, _)| c.radius).collect();
        assert!(radii[0] > radii[1]);
        assert_eq!(radii[2], MIN_RADIUS);
    }

    #[test]
    fn every_point_hits_itself() {
        let data = vec![
            ScatterDatum::new(1.0, 1.0),
            ScatterDatum::new(1.5, 1.2),
            ScatterDatum::new(8.0, 3.0),
            ScatterDatum::new(4.0, 9.0),
        ];
        let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
        for (id, c, _) in circles(&frame) {
            let hit = frame.hit_test(c.center).unwrap();
            assert_eq!(MarkId::for_item(role::POINT, &hit.id, 0), id);
        }
    }

    #[test]
    fn opacity_prefers_selection_over_hover_over_highlight() {
        let data = vec![
            ScatterDatum::new(1.0, 1.0).with_color("a").with_label("A"),
            ScatterDatum::new(2.0, 2.0).with_color("b").with_label("B"),
        ];
        let spec = ScatterChartSpec::default().with_highlighted(vec![Label::from("B")]);
        let opacities = |view: &ViewState| -> Vec<f64> {
            circles(&spec.layout(&data, view)).iter().map(|(_, _, o)| *o).collect()
        };
        assert_eq!(opacities(&ViewState::default()), vec![DIM_OPACITY, 1.0]);
        let hovered = ViewState::default().with_hovered(Some(ItemId::Index(0)));
        assert_eq!(opacities(&hovered), vec![1.0, DIM_OPACITY]);
        let selected = hovered.with_selected_color(Some(spec.colors.get(1)));
        assert_eq!(opacities(&selected), vec![DIM_OPACITY, 1.0]);
    }

    #[test]
    fn positive_data_anchors_both_axes_at_zero() {
        let data = vec![ScatterDatum::new(3.0, 5.0), ScatterDatum::new(7.0, 9.0)];
        let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
        let bounds = |slot: usize| {
            let id = MarkId::for_guide(role::BASELINE, slot);
            frame.marks.iter().find_map(|m| match &m.payload {
                MarkPayload::Path(p) if m.id == id => Some(p.path.bounding_box()),
                _ => None,
            })
        };
        assert!((bounds(0).unwrap().y0 - frame.plot.y1).abs() < 1e-9);
        assert!((bounds(1).unwrap().x0 - frame.plot.x0).abs() < 1e-9);
    }

    #[test]
    fn regression_is_optional() {
        let data = vec![ScatterDatum::new(1.0, 1.0), ScatterDatum::new(2.0, 3.0)];
        let regression = MarkId::for_guide(role::REGRESSION, 0);
        let spec = ScatterChartSpec::default();
        let frame = spec.layout(&data, &ViewState::default());
        assert!(frame.marks.iter().all(|m| m.id != regression));
        let frame = spec
            .with_regression(RegressionLine::default())
            .layout(&data, &ViewState::default());
        assert!(frame.marks.iter().any(|m| m.id == regression));
    }
}
