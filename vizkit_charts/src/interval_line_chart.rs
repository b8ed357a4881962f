// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-series line with a confidence interval band.
//!
//! The band covers `y_min..y_max` per date; missing bounds collapse onto the line. Hover resolves
//! by bisecting on x, so the pointer always lands on a date. The entrance animation is applied
//! by passing an [`AnimationFrame`] to [`IntervalLineChartSpec::layout_at`].

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use peniko::Color;
use vizkit_core::{
    Annotation, CircleMark, CustomHighlightArea, HighlightArea, IntervalDatum, ItemId, Label,
    Mark, MarkId, MarkPayload, PathMark, ReferenceValue, TextAnchor, TextBaseline, TextMark,
};
use vizkit_transforms::{Extent, ExtentOptions};

use crate::animation::{AnimateLine, AnimationFrame, AnimationSequencer};
use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{ChartSettings, DEFAULT_TICK_COUNT};
use crate::color::MAIN;
use crate::format::format_number;
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, baseline};
use crate::hit::{Bisector, HitIndex};
use crate::interaction::ViewState;
use crate::layout::Margins;
use crate::role;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleContinuous, ScaleLinearSpec, ScaleTime};
use crate::scatter_chart::RegressionLine;
use crate::time::{DEFAULT_DATE_FORMAT, parse_date_lenient};
use crate::z_order;

/// Radius of the hover dot.
const HOVER_DOT_RADIUS: f64 = 5.0;

/// One plotted date after null filtering and bound defaulting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalRow {
    /// Index of the datum in the input array.
    pub index: usize,
    /// Seconds since the Unix epoch.
    pub date: f64,
    /// Line value.
    pub y: f64,
    /// Lower band edge.
    pub y_min: f64,
    /// Upper band edge.
    pub y_max: f64,
}

/// Dot radius for `n` dates across `width` pixels: hidden when crowded.
fn dot_radius(width: f64, n: usize) -> f64 {
    #[allow(clippy::cast_precision_loss, reason = "date counts are small")]
    let spacing = width / n.max(1) as f64;
    if spacing < 5.0 {
        0.0
    } else if spacing < 20.0 {
        2.0
    } else {
        4.0
    }
}

fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}

/// Settings for a line chart with a confidence interval.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalLineChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Line color.
    pub line_color: Color,
    /// Line width.
    pub stroke_width: f64,
    /// strftime pattern of the datum dates.
    pub date_format: String,
    /// Draw a dot per date on the line.
    pub show_dots: bool,
    /// Draw the line value above each date.
    pub show_values: bool,
    /// Draw dots on both band edges.
    pub show_interval_dots: bool,
    /// Draw the band edge values.
    pub show_interval_values: bool,
    /// Width of the band edge lines; zero hides them.
    pub interval_line_stroke_width: f64,
    /// Colors of the lower and upper band edges.
    pub interval_line_colors: [Color; 2],
    /// Band fill.
    pub interval_area_color: Color,
    /// Band fill alpha.
    pub interval_area_opacity: f32,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Target tick count on the date axis.
    pub x_tick_count: usize,
    /// Target tick count on the value axis.
    pub y_tick_count: usize,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// First date of the axis; the earliest datum when absent.
    pub min_date: Option<Label>,
    /// Last date of the axis; the latest datum when absent.
    pub max_date: Option<Label>,
    /// Value axis title.
    pub y_axis_title: Option<String>,
    /// Horizontal reference lines.
    pub ref_values: Vec<ReferenceValue>,
    /// Shaded date range; each end open when absent.
    pub highlight_area: (Option<Label>, Option<Label>),
    /// Shaded range fill; theme panel gray when absent.
    pub highlight_area_color: Option<Color>,
    /// Free-form highlight areas; x coordinates are seconds since the Unix epoch.
    pub custom_highlight_areas: Vec<CustomHighlightArea>,
    /// Text callouts; x coordinates are seconds since the Unix epoch.
    pub annotations: Vec<Annotation>,
    /// Optional least-squares line over the line values.
    pub regression: Option<RegressionLine>,
    /// Entrance animation.
    pub animate: AnimateLine,
}

impl Default for IntervalLineChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(20.0, 25.0, 50.0, 50.0)),
            line_color: MAIN,
            stroke_width: 2.0,
            date_format: String::from(DEFAULT_DATE_FORMAT),
            show_dots: true,
            show_values: false,
            show_interval_dots: false,
            show_interval_values: false,
            interval_line_stroke_width: 0.0,
            interval_line_colors: [MAIN, MAIN],
            interval_area_color: MAIN,
            interval_area_opacity: 0.4,
            prefix: String::new(),
            suffix: String::new(),
            x_tick_count: 10,
            y_tick_count: DEFAULT_TICK_COUNT,
            min_value: None,
            max_value: None,
            min_date: None,
            max_date: None,
            y_axis_title: None,
            ref_values: Vec::new(),
            highlight_area: (None, None),
            highlight_area_color: None,
            custom_highlight_areas: Vec::new(),
            annotations: Vec::new(),
            regression: None,
            animate: AnimateLine::Default,
        }
    }
}

impl IntervalLineChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the line color and width.
    pub fn with_line(mut self, color: Color, stroke_width: f64) -> Self {
        self.line_color = color;
        self.stroke_width = stroke_width;
        self
    }

    /// Sets the date pattern.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Toggles line dots and line values.
    pub fn with_dots(mut self, dots: bool, values: bool) -> Self {
        self.show_dots = dots;
        self.show_values = values;
        self
    }

    /// Toggles band edge dots and band edge values.
    pub fn with_interval_dots(mut self, dots: bool, values: bool) -> Self {
        self.show_interval_dots = dots;
        self.show_interval_values = values;
        self
    }

    /// Draws the band edges as lines.
    pub fn with_interval_lines(mut self, stroke_width: f64, colors: [Color; 2]) -> Self {
        self.interval_line_stroke_width = stroke_width;
        self.interval_line_colors = colors;
        self
    }

    /// Sets the band fill.
    pub fn with_interval_area(mut self, color: Color, opacity: f32) -> Self {
        self.interval_area_color = color;
        self.interval_area_opacity = opacity;
        self
    }

    /// Sets the value prefix and suffix.
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// Sets the tick count targets.
    pub fn with_tick_counts(mut self, x: usize, y: usize) -> Self {
        self.x_tick_count = x;
        self.y_tick_count = y;
        self
    }

    /// Overrides the value extent bounds.
    pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Overrides the date axis ends.
    pub fn with_date_range(mut self, min: Option<Label>, max: Option<Label>) -> Self {
        self.min_date = min;
        self.max_date = max;
        self
    }

    /// Sets the value axis title.
    pub fn with_y_axis_title(mut self, title: impl Into<String>) -> Self {
        self.y_axis_title = Some(title.into());
        self
    }

    /// Sets the reference lines.
    pub fn with_ref_values(mut self, refs: Vec<ReferenceValue>) -> Self {
        self.ref_values = refs;
        self
    }

    /// Shades a date range.
    pub fn with_highlight_area(
        mut self,
        from: Option<Label>,
        to: Option<Label>,
        color: Option<Color>,
    ) -> Self {
        self.highlight_area = (from, to);
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

    /// Sets the entrance animation.
    pub fn with_animate(mut self, animate: AnimateLine) -> Self {
        self.animate = animate;
        self
    }

    /// A sequencer for this chart's entrance animation.
    pub fn sequencer(&self) -> AnimationSequencer {
        AnimationSequencer::new(self.animate)
    }

    /// Plotted rows: null lines dropped, missing bounds set to the line value, sorted by date.
    ///
    /// Rows with an unparsable date are skipped.
    pub fn rows(&self, data: &[IntervalDatum]) -> Vec<IntervalRow> {
        let mut rows: Vec<IntervalRow> = data
            .iter()
            .enumerate()
            .filter_map(|(index, d)| {
                let y = d.y.filter(|v| v.is_finite())?;
                let date = parse_date_lenient(&d.date, &self.date_format)?;
                Some(IntervalRow {
                    index,
                    date,
                    y,
                    y_min: d.y_min.unwrap_or(y),
                    y_max: d.y_max.unwrap_or(y),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.date.total_cmp(&b.date));
        rows
    }

    /// Lays out `data` fully revealed.
    pub fn layout(&self, data: &[IntervalDatum], view: &ViewState) -> ChartFrame {
        self.layout_at(data, view, AnimationFrame::DONE)
    }

    /// Lays out `data` at one instant of the entrance animation.
    pub fn layout_at(
        &self,
        data: &[IntervalDatum],
        view: &ViewState,
        anim: AnimationFrame,
    ) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        let rows = self.rows(data);
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return ChartFrame::empty(settings.resolved_size(), theme);
        };
        let grays = theme.grays();
        let plot = settings.arrange(Margins::ZERO).plot;

        let parse_bound = |label: &Option<Label>| {
            label
                .as_ref()
                .and_then(|l| parse_date_lenient(l, &self.date_format))
        };
        let mut t0 = parse_bound(&self.min_date).unwrap_or(first.date);
        let mut t1 = parse_bound(&self.max_date).unwrap_or(last.date);
        if t0 > t1 {
            tracing::warn!(t0, t1, "date range is reversed; using the data extent");
            (t0, t1) = (first.date, last.date);
        }
        let x = ScaleTime::new((t0, t1), (plot.x0, plot.x1));
        let extent = Extent::of(
            rows.iter()
                .flat_map(|r| [Some(r.y), Some(r.y_min), Some(r.y_max)]),
            &ExtentOptions::new()
                .with_min(self.min_value)
                .with_max(self.max_value),
        );
        let y = ScaleLinearSpec::new((extent.min, extent.max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));
        tracing::debug!(
            rows = rows.len(),
            dropped = data.len() - rows.len(),
            y_domain = ?y.domain(),
            phase = ?anim.phase,
            "interval line layout"
        );

        let x_scale = ScaleContinuous::Time(x);
        let y_scale = ScaleContinuous::Linear(y);
        let guides = GuideContext {
            x: &x_scale,
            y: &y_scale,
            plot,
            rtl: settings.rtl,
            theme,
        };
        let mut marks = Vec::new();

        let area = HighlightArea::x_range(
            parse_bound(&self.highlight_area.0),
            parse_bound(&self.highlight_area.1),
        );
        let area_fill = self.highlight_area_color.unwrap_or(grays.gray_300);
        marks.extend(guides.highlight_area(&area, area_fill));
        marks.extend(guides.custom_highlight_areas(&self.custom_highlight_areas));

        let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
        let mut y_axis = AxisSpec::left()
            .with_tick_count(self.y_tick_count)
            .with_style(AxisStyle::themed(theme))
            .with_grid(GridStyle::themed(theme))
            .with_tick_formatter(move |v, _| format_number(Some(v), &prefix, &suffix, None));
        if let Some(title) = &self.y_axis_title {
            y_axis = y_axis
                .with_title(title.clone())
                .with_title_offset(settings.margins.left - 20.0);
        }
        marks.extend(y_axis.marks(&y_scale, plot));
        marks.extend(
            AxisSpec::bottom()
                .with_tick_count(self.x_tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_date_format(self.date_format.clone())
                .marks(&x_scale, plot),
        );
        marks.push(baseline(y.map(y.domain().0.max(0.0)), plot, theme));

        let at = |t: f64, v: f64| Point::new(x.map(t), y.map(v));
        let mut band = polyline(rows.iter().map(|r| at(r.date, r.y_max)));
        for r in rows.iter().rev() {
            band.line_to(at(r.date, r.y_min));
        }
        band.close_path();
        marks.push(
            Mark::new(
                MarkId::for_guide(role::BAND, 0),
                z_order::SERIES_FILL,
                MarkPayload::Path(PathMark::filled(
                    band,
                    self.interval_area_color.multiply_alpha(self.interval_area_opacity),
                )),
            )
            .with_opacity(anim.band_opacity),
        );
        if self.interval_line_stroke_width > 0.0 {
            let edges = [
                rows.iter().map(|r| at(r.date, r.y_min)).collect::<Vec<_>>(),
                rows.iter().map(|r| at(r.date, r.y_max)).collect::<Vec<_>>(),
            ];
            for (i, edge) in edges.into_iter().enumerate() {
                let mut path = PathMark::stroked(
                    polyline(edge),
                    self.interval_line_colors[i],
                    self.interval_line_stroke_width,
                );
                path.reveal = anim.path_reveal;
                marks.push(Mark::new(
                    MarkId::for_guide(role::BAND, i + 1),
                    z_order::SERIES_STROKE,
                    MarkPayload::Path(path),
                ));
            }
        }
        let mut line = PathMark::stroked(
            polyline(rows.iter().map(|r| at(r.date, r.y))),
            self.line_color,
            self.stroke_width,
        );
        line.reveal = anim.path_reveal;
        marks.push(Mark::new(
            MarkId::for_guide(role::LINE, 0),
            z_order::SERIES_STROKE,
            MarkPayload::Path(line),
        ));

        let r = dot_radius(plot.width(), rows.len());
        let value_text = |v: f64| format_number(Some(v), &self.prefix, &self.suffix, None);
        for row in &rows {
            let id = ItemId::Index(row.index);
            let mut dots = Vec::new();
            if self.show_dots {
                dots.push((0, row.y, self.line_color));
            }
            if self.show_interval_dots {
                dots.push((1, row.y_min, self.interval_line_colors[0]));
                dots.push((2, row.y_max, self.interval_line_colors[1]));
            }
            if r > 0.0 {
                for (part, v, color) in dots {
                    marks.push(
                        Mark::new(
                            MarkId::for_item(role::DOT, &id, part),
                            z_order::SERIES_POINTS,
                            MarkPayload::Circle(CircleMark {
                                center: at(row.date, v),
                                radius: r,
                                fill: color.into(),
                                stroke: Color::TRANSPARENT.into(),
                                stroke_width: 0.0,
                            }),
                        )
                        .with_opacity(anim.overlay_opacity),
                    );
                }
            }
            let mut labels = Vec::new();
            if self.show_values {
                labels.push((0, row.y, -8.0, self.line_color));
            }
            if self.show_interval_values {
                labels.push((1, row.y_min, 16.0, self.interval_line_colors[0]));
                labels.push((2, row.y_max, -8.0, self.interval_line_colors[1]));
            }
            for (part, v, dy, color) in labels {
                let p = at(row.date, v);
                let text = TextMark::new(Point::new(p.x, p.y + dy), value_text(v), color)
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Alphabetic);
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::POINT_LABEL, &id, part),
                        z_order::AXIS_LABELS,
                        MarkPayload::Text(text),
                    )
                    .with_opacity(anim.overlay_opacity),
                );
            }
        }

        let hovered = view
            .hovered
            .as_ref()
            .and_then(|h| rows.iter().find(|r| *h == ItemId::Index(r.index)));
        if let Some(row) = hovered {
            let p = at(row.date, row.y);
            marks.push(
                RuleMarkSpec::vertical(MarkId::for_guide(role::HOVER_RULE, 0), p.x, plot.y0, plot.y1)
                    .with_stroke(grays.gray_700, 1.0)
                    .with_dash(Some((4.0, 4.0)))
                    .with_z_index(z_order::HOVER)
                    .mark(),
            );
            marks.push(Mark::new(
                MarkId::for_guide(role::HOVER_DOT, 0),
                z_order::HOVER,
                MarkPayload::Circle(CircleMark {
                    center: p,
                    radius: HOVER_DOT_RADIUS,
                    fill: self.line_color.into(),
                    stroke: theme.background().into(),
                    stroke_width: 2.0,
                }),
            ));
        }

        marks.extend(guides.reference_y(&self.ref_values));
        let overlays = guides.annotations(&self.annotations).into_iter().chain(
            self.regression.as_ref().and_then(|reg| {
                guides.regression_line(
                    rows.iter().map(|r| (r.date, r.y)),
                    reg.space,
                    reg.color.as_deref(),
                )
            }),
        );
        marks.extend(overlays.map(|m| m.with_opacity(anim.overlay_opacity)));

        let bisector = Bisector::new(rows.iter().map(|r| x.map(r.date)).collect());
        let targets = rows
            .iter()
            .map(|r| HitTarget::datum(ItemId::Index(r.index), r.index))
            .collect();
        ChartFrame::new(
            settings.resolved_size(),
            plot,
            marks,
            HitIndex::Bisect(bisector),
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

    fn series() -> Vec<IntervalDatum> {
        vec![
            IntervalDatum::new("2022", Some(14.0)).with_interval(12.0, 17.0),
            IntervalDatum::new("2020", Some(10.0)).with_interval(8.0, 11.0),
            IntervalDatum::new("2021", None),
            IntervalDatum::new("2023", Some(15.0)),
        ]
    }

    fn path(frame: &ChartFrame, id: MarkId) -> Option<&PathMark> {
        frame.marks.iter().find_map(|m| match &m.payload {
            MarkPayload::Path(p) if m.id == id => Some(p),
            _ => None,
        })
    }

    #[test]
    fn rows_drop_nulls_default_bounds_and_sort() {
        let rows = IntervalLineChartSpec::default().rows(&series());
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 0, 3]);
        assert_eq!((rows[2].y_min, rows[2].y_max), (15.0, 15.0));
    }

    #[test]
    fn single_point_band_has_zero_width() {
        let data = vec![IntervalDatum::new("2020", Some(10.0))];
        let spec = IntervalLineChartSpec::default();
        let rows = spec.rows(&data);
        assert_eq!((rows[0].y_min, rows[0].y_max), (10.0, 10.0));
        let frame = spec.layout(&data, &ViewState::default());
        let band = path(&frame, MarkId::for_guide(role::BAND, 0)).unwrap();
        assert_eq!(band.path.bounding_box().height(), 0.0);
    }

    #[test]
    fn hover_past_the_end_is_the_last_date() {
        let frame = IntervalLineChartSpec::default().layout(&series(), &ViewState::default());
        let past = Point::new(frame.plot.x1 + 50.0, frame.plot.y0);
        assert_eq!(frame.hit_test(past).unwrap().datum, Some(3));
        let first_x = frame.plot.x0;
        assert_eq!(frame.hit_test(Point::new(first_x, 0.0)).unwrap().datum, Some(1));
    }

    #[test]
    fn reversed_date_range_falls_back_to_the_data() {
        let spec = IntervalLineChartSpec::default()
            .with_date_range(Some("2022".into()), Some("2018".into()));
        let frame = spec.layout(&series(), &ViewState::default());
        let plain = IntervalLineChartSpec::default().layout(&series(), &ViewState::default());
        assert_eq!(frame.marks, plain.marks);
        let past = Point::new(frame.plot.x1 + 50.0, frame.plot.y0);
        assert_eq!(frame.hit_test(past).unwrap().datum, Some(3));
        assert_eq!(frame.hit_test(Point::new(frame.plot.x0, 0.0)).unwrap().datum, Some(1));
    }

    #[test]
    fn hovered_row_draws_rule_and_dot() {
        let spec = IntervalLineChartSpec::default();
        let frame = spec.layout(&series(), &ViewState::default());
        assert!(frame.marks.iter().all(|m| m.id != MarkId::for_guide(role::HOVER_RULE, 0)));
        let view = ViewState::default().with_hovered(Some(ItemId::Index(0)));
        let frame = spec.layout(&series(), &view);
        assert!(frame.marks.iter().any(|m| m.id == MarkId::for_guide(role::HOVER_RULE, 0)));
        assert!(frame.marks.iter().any(|m| m.id == MarkId::for_guide(role::HOVER_DOT, 0)));
    }

    #[test]
    fn animation_frame_drives_reveal_and_fades() {
        let spec = IntervalLineChartSpec::default();
        let frame = spec.layout_at(&series(), &ViewState::default(), AnimationFrame::HIDDEN);
        let line = path(&frame, MarkId::for_guide(role::LINE, 0)).unwrap();
        assert_eq!(line.reveal, 0.0);
        let band = frame
            .marks
            .iter()
            .find(|m| m.id == MarkId::for_guide(role::BAND, 0))
            .unwrap();
        assert_eq!(band.opacity, 0.0);
        let done = spec.layout(&series(), &ViewState::default());
        assert_eq!(path(&done, MarkId::for_guide(role::LINE, 0)).unwrap().reveal, 1.0);
    }

    #[test]
    fn positive_values_anchor_the_axis_at_zero() {
        let spec = IntervalLineChartSpec::default();
        let frame = spec.layout(&series(), &ViewState::default());
        let base = path(&frame, MarkId::for_guide(role::BASELINE, 0)).unwrap();
        assert!((base.path.bounding_box().y0 - frame.plot.y1).abs() < 1e-9);
    }
}
