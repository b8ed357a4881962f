// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlays positioned through a chart's scales: reference lines, highlight areas,
//! annotations and the regression line.
//!
//! All helpers take scales whose ranges are already in plot coordinates and return marks with
//! guide ids, so charts can freely mix and match them.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::{Brush, Color};
use vizkit_core::{
    Annotation, AnnotationAlign, CircleMark, CustomHighlightArea, HighlightArea, Mark, MarkId,
    MarkPayload, PathMark, RectMark, ReferenceValue, TextAnchor, TextBaseline, TextMark,
};
use vizkit_transforms::{LinearFit, linear_regression};

use crate::color::{Theme, parse_color_lenient};
use crate::role;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::ScaleContinuous;
use crate::z_order;

/// Default ring radius around an annotated point.
pub const CONNECTOR_RADIUS: f64 = 3.5;

const REFERENCE_DASH: (f64, f64) = (4.0, 4.0);

/// Coordinate space a regression line is fitted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegressionSpace {
    /// Fit projected pixel positions. The slope follows the plot's aspect ratio.
    #[default]
    Pixel,
    /// Fit data values, then project the fitted line.
    Data,
}

/// Shared inputs for overlay generation.
#[derive(Clone, Copy, Debug)]
pub struct GuideContext<'a> {
    /// Horizontal scale.
    pub x: &'a ScaleContinuous,
    /// Vertical scale.
    pub y: &'a ScaleContinuous,
    /// Plot rectangle.
    pub plot: Rect,
    /// Right-to-left text direction.
    pub rtl: bool,
    /// Color theme for default colors.
    pub theme: Theme,
}

impl GuideContext<'_> {
    fn text_color(&self, color: Option<&str>) -> Color {
        match color {
            Some(c) => parse_color_lenient(c),
            None => self.theme.grays().gray_700,
        }
    }

    /// Vertical dashed lines at x values, labeled near the top.
    ///
    /// Labels sit right of the line, or left of it (end-anchored) when the line is in the right
    /// quarter of the plot or the layout is right-to-left.
    pub fn reference_x(&self, refs: &[ReferenceValue]) -> Vec<Mark> {
        let mut out = Vec::new();
        for (i, r) in refs.iter().enumerate() {
            let Some(value) = r.value else {
                continue;
            };
            let color = self.text_color(r.color.as_deref());
            let x = self.x.map(value);
            out.push(
                RuleMarkSpec::vertical(
                    MarkId::for_guide(role::REFERENCE, i),
                    x,
                    self.plot.y0,
                    self.plot.y1,
                )
                .with_stroke(color, 1.5)
                .with_dash(Some(REFERENCE_DASH))
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
            );
            let flip = x - self.plot.x0 > 0.75 * self.plot.width() || self.rtl;
            let (dx, anchor) = if flip {
                (-5.0, TextAnchor::End)
            } else {
                (5.0, TextAnchor::Start)
            };
            let label = TextMark::new(
                Point::new(x + dx, self.plot.y0 + 12.5),
                r.text.clone(),
                color,
            )
            .with_anchor(anchor)
            .with_baseline(TextBaseline::Alphabetic);
            out.push(Mark::new(
                MarkId::for_guide(role::REFERENCE_LABEL, i),
                z_order::AXIS_LABELS,
                MarkPayload::Text(label),
            ));
        }
        out
    }

    /// Horizontal dashed lines at y values, labeled above the line at the plot's right edge.
    pub fn reference_y(&self, refs: &[ReferenceValue]) -> Vec<Mark> {
        let mut out = Vec::new();
        for (i, r) in refs.iter().enumerate() {
            let Some(value) = r.value else {
                continue;
            };
            let color = self.text_color(r.color.as_deref());
            let y = self.y.map(value);
            // Offset so x and y reference lines in one chart never share ids.
            let slot = (1 << 24) | i;
            out.push(
                RuleMarkSpec::horizontal(
                    MarkId::for_guide(role::REFERENCE, slot),
                    y,
                    self.plot.x0,
                    self.plot.x1,
                )
                .with_stroke(color, 1.5)
                .with_dash(Some(REFERENCE_DASH))
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
            );
            let (x, anchor) = if self.rtl {
                (self.plot.x0, TextAnchor::Start)
            } else {
                (self.plot.x1, TextAnchor::End)
            };
            let label = TextMark::new(Point::new(x, y - 5.0), r.text.clone(), color)
                .with_anchor(anchor)
                .with_baseline(TextBaseline::Alphabetic);
            out.push(Mark::new(
                MarkId::for_guide(role::REFERENCE_LABEL, slot),
                z_order::AXIS_LABELS,
                MarkPayload::Text(label),
            ));
        }
        out
    }

    /// A shaded rectangle; missing bounds extend to the plot edges.
    pub fn highlight_area(&self, area: &HighlightArea, fill: Color) -> Option<Mark> {
        if area.is_unbounded() {
            return None;
        }
        let x0 = area.x0.map_or(self.plot.x0, |v| self.x.map(v));
        let x1 = area.x1.map_or(self.plot.x1, |v| self.x.map(v));
        let y_top = area.y1.map_or(self.plot.y0, |v| self.y.map(v));
        let y_bottom = area.y0.map_or(self.plot.y1, |v| self.y.map(v));
        let rect = Rect::new(x0, y_top, x1, y_bottom).abs();
        Some(Mark::new(
            MarkId::for_guide(role::HIGHLIGHT, 0),
            z_order::HIGHLIGHT_AREAS,
            MarkPayload::Rect(RectMark {
                rect,
                fill: fill.into(),
            }),
        ))
    }

    /// Free-form highlight segments and polygons.
    ///
    /// Areas with fewer than four coordinates draw nothing.
    pub fn custom_highlight_areas(&self, areas: &[CustomHighlightArea]) -> Vec<Mark> {
        let default = self.theme.grays().gray_300;
        let mut out = Vec::new();
        for (i, area) in areas.iter().enumerate() {
            let points: Vec<Point> = area
                .coordinates
                .chunks_exact(2)
                .map(|c| Point::new(self.x.map(c[0]), self.y.map(c[1])))
                .collect();
            if points.len() < 2 {
                tracing::warn!(index = i, "custom highlight area needs two points");
                continue;
            }
            let stroke = area.stroke.as_deref().map_or(default, parse_color_lenient);
            let id = MarkId::for_guide(role::CUSTOM_HIGHLIGHT, i);
            let dash = area.dash;
            if area.is_segment() {
                out.push(
                    RuleMarkSpec::new(id, points[0], points[1])
                        .with_stroke(stroke, area.stroke_width.unwrap_or(1.0))
                        .with_dash(dash)
                        .with_z_index(z_order::HIGHLIGHT_AREAS)
                        .mark(),
                );
                continue;
            }
            let mut path = BezPath::new();
            path.move_to(points[0]);
            for p in &points[1..] {
                path.line_to(*p);
            }
            path.close_path();
            let fill = area.fill.as_deref().map_or(default, parse_color_lenient);
            let mut mark = PathMark::filled(path, fill);
            mark.stroke = stroke.into();
            mark.stroke_width = area.stroke_width.unwrap_or(0.0);
            mark.dash = dash;
            out.push(Mark::new(
                id,
                z_order::HIGHLIGHT_AREAS,
                MarkPayload::Path(mark),
            ));
        }
        out
    }

    /// Text callouts with optional connector rings and leader lines.
    pub fn annotations(&self, annotations: &[Annotation]) -> Vec<Mark> {
        let mut out = Vec::new();
        for (i, a) in annotations.iter().enumerate() {
            let color = self.text_color(a.color.as_deref());
            let target = Point::new(
                a.x_coordinate.map_or(self.plot.x0, |v| self.x.map(v)),
                a.y_coordinate.map_or(self.plot.y0, |v| self.y.map(v)),
            );
            let text_pos = Point::new(target.x + a.x_offset, target.y + a.y_offset - 8.0);

            if a.show_connector {
                let radius = a.connector_radius.unwrap_or(CONNECTOR_RADIUS);
                out.push(Mark::new(
                    MarkId::for_guide(role::ANNOTATION_RING, i),
                    z_order::ANNOTATIONS,
                    MarkPayload::Circle(CircleMark {
                        center: target,
                        radius,
                        fill: Brush::Solid(Color::TRANSPARENT),
                        stroke: color.into(),
                        stroke_width: 2.0,
                    }),
                ));
                let start = ring_exit(target, text_pos, radius);
                let end = Point::new(target.x + a.x_offset, target.y + a.y_offset);
                out.push(
                    RuleMarkSpec::new(MarkId::for_guide(role::ANNOTATION_LEADER, i), start, end)
                        .with_stroke(color, 2.0)
                        .with_z_index(z_order::ANNOTATIONS)
                        .mark(),
                );
            }

            let anchor = match a.align {
                Some(AnnotationAlign::Left) => TextAnchor::Start,
                Some(AnnotationAlign::Center) => TextAnchor::Middle,
                Some(AnnotationAlign::Right) => TextAnchor::End,
                None if self.rtl => TextAnchor::End,
                None => TextAnchor::Start,
            };
            let pad = match anchor {
                TextAnchor::Start => 4.0,
                TextAnchor::Middle => 0.0,
                TextAnchor::End => -4.0,
            };
            let text = TextMark::new(
                Point::new(text_pos.x + pad, text_pos.y),
                a.text.clone(),
                color,
            )
            .with_anchor(anchor)
            .with_baseline(TextBaseline::Hanging)
            .with_font_size(14.0);
            out.push(Mark::new(
                MarkId::for_guide(role::ANNOTATION, i),
                z_order::ANNOTATIONS,
                MarkPayload::Text(text),
            ));
        }
        out
    }

    /// A dashed least-squares line through `points` (data units), or `None` with fewer than
    /// two points.
    ///
    /// In pixel space the line starts at the plot's left edge, or where it leaves the bottom
    /// edge when it would start below the plot, and runs to the right edge.
    pub fn regression_line(
        &self,
        points: impl IntoIterator<Item = (f64, f64)>,
        space: RegressionSpace,
        color: Option<&str>,
    ) -> Option<Mark> {
        let color = self.text_color(color);
        let (p0, p1) = match space {
            RegressionSpace::Pixel => {
                let origin = self.plot.origin();
                let fit = linear_regression(points.into_iter().map(|(x, y)| {
                    (self.x.map(x) - origin.x, self.y.map(y) - origin.y)
                }))?;
                let (p0, p1) = pixel_segment(fit, self.plot.width(), self.plot.height());
                (p0 + origin.to_vec2(), p1 + origin.to_vec2())
            }
            RegressionSpace::Data => {
                let fit = linear_regression(points)?;
                let x0 = self.x.invert(self.plot.x0);
                let x1 = self.x.invert(self.plot.x1);
                (
                    Point::new(self.plot.x0, self.y.map(fit.y(x0))),
                    Point::new(self.plot.x1, self.y.map(fit.y(x1))),
                )
            }
        };
        Some(
            RuleMarkSpec::new(MarkId::for_guide(role::REGRESSION, 0), p0, p1)
                .with_stroke(color, 1.5)
                .with_dash(Some(REFERENCE_DASH))
                .with_z_index(z_order::ANNOTATIONS)
                .mark(),
        )
    }
}

/// Endpoints of a pixel-space fit inside a `width × height` plot anchored at the origin.
fn pixel_segment(fit: LinearFit, width: f64, height: f64) -> (Point, Point) {
    let (m, b) = (fit.slope, fit.intercept);
    let start = if b > height && m != 0.0 {
        Point::new((height - b) / m, height)
    } else {
        Point::new(0.0, b)
    };
    (start, Point::new(width, m * width + b))
}

/// The point on a ring of `radius` around `center` facing `toward`.
fn ring_exit(center: Point, toward: Point, radius: f64) -> Point {
    let d: Vec2 = toward - center;
    let len = d.hypot();
    if len == 0.0 {
        return center;
    }
    center + d * (radius / len)
}

/// A horizontal zero line across the plot.
pub fn baseline(y: f64, plot: Rect, theme: Theme) -> Mark {
    RuleMarkSpec::horizontal(MarkId::for_guide(role::BASELINE, 0), y, plot.x0, plot.x1)
        .with_stroke(theme.grays().gray_700, 1.0)
        .with_z_index(z_order::AXIS_RULES)
        .mark()
}

/// A vertical zero line across the plot.
pub fn baseline_vertical(x: f64, plot: Rect, theme: Theme) -> Mark {
    RuleMarkSpec::vertical(MarkId::for_guide(role::BASELINE, 1), x, plot.y0, plot.y1)
        .with_stroke(theme.grays().gray_700, 1.0)
        .with_z_index(z_order::AXIS_RULES)
        .mark()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::scale::ScaleLinear;
    use kurbo::Shape;

    fn scales(plot: Rect) -> (ScaleContinuous, ScaleContinuous) {
        (
            ScaleLinear::new((0.0, 100.0), (plot.x0, plot.x1)).into(),
            ScaleLinear::new((0.0, 100.0), (plot.y1, plot.y0)).into(),
        )
    }

    fn ctx<'a>(x: &'a ScaleContinuous, y: &'a ScaleContinuous, plot: Rect) -> GuideContext<'a> {
        GuideContext {
            x,
            y,
            plot,
            rtl: false,
            theme: Theme::Light,
        }
    }

    fn text(mark: &Mark) -> &TextMark {
        match &mark.payload {
            MarkPayload::Text(t) => t,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn reference_labels_flip_in_the_right_quarter() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (x, y) = scales(plot);
        let marks = ctx(&x, &y, plot).reference_x(&[
            ReferenceValue::new(10.0, "low"),
            ReferenceValue::new(90.0, "high"),
        ]);
        assert_eq!(marks.len(), 4);
        assert_eq!(text(&marks[1]).anchor, TextAnchor::Start);
        assert_eq!(text(&marks[3]).anchor, TextAnchor::End);
    }

    #[test]
    fn highlight_bounds_default_to_plot_edges() {
        let plot = Rect::new(10.0, 10.0, 110.0, 110.0);
        let (x, y) = scales(plot);
        let c = ctx(&x, &y, plot);
        assert!(c.highlight_area(&HighlightArea::default(), Color::BLACK).is_none());
        let mark = c
            .highlight_area(&HighlightArea::x_range(Some(50.0), None), Color::BLACK)
            .unwrap();
        assert_eq!(mark.bounds(), Some(Rect::new(60.0, 10.0, 110.0, 110.0)));
    }

    #[test]
    fn custom_areas_draw_segments_or_polygons() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (x, y) = scales(plot);
        let marks = ctx(&x, &y, plot).custom_highlight_areas(&[
            CustomHighlightArea::new([0.0, 0.0, 100.0, 100.0]),
            CustomHighlightArea::new([0.0, 0.0, 50.0, 0.0, 50.0, 50.0]),
            CustomHighlightArea::new([1.0]),
        ]);
        assert_eq!(marks.len(), 2, "a lone coordinate draws nothing");
        let MarkPayload::Path(poly) = &marks[1].payload else {
            panic!("polygon should be a path");
        };
        assert_eq!(poly.stroke_width, 0.0);
    }

    #[test]
    fn annotation_leader_starts_on_the_ring() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (x, y) = scales(plot);
        let a = Annotation::new("peak", 50.0, 50.0)
            .with_offset(0.0, 28.0)
            .with_connector(None);
        let marks = ctx(&x, &y, plot).annotations(&[a]);
        assert_eq!(marks.len(), 3);
        let MarkPayload::Path(leader) = &marks[1].payload else {
            panic!("leader should be a path");
        };
        let bounds = leader.path.control_box();
        assert!((bounds.y0 - (50.0 + CONNECTOR_RADIUS)).abs() < 1e-9);
        assert!((bounds.y1 - 78.0).abs() < 1e-9);
        assert_eq!(text(&marks[2]).pos, Point::new(54.0, 70.0));
    }

    #[test]
    fn pixel_regression_clips_to_the_bottom_edge() {
        let fit = LinearFit {
            slope: -1.0,
            intercept: 150.0,
        };
        let (p0, p1) = pixel_segment(fit, 100.0, 100.0);
        assert_eq!(p0, Point::new(50.0, 100.0));
        assert_eq!(p1, Point::new(100.0, 50.0));
    }

    #[test]
    fn data_regression_spans_the_plot() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (x, y) = scales(plot);
        let mark = ctx(&x, &y, plot)
            .regression_line(
                [(0.0, 0.0), (50.0, 50.0), (100.0, 100.0)],
                RegressionSpace::Data,
                None,
            )
            .unwrap();
        let bounds = mark.bounds().unwrap();
        assert!((bounds.width() - 100.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
        assert!(
            ctx(&x, &y, plot)
                .regression_line([(1.0, 1.0)], RegressionSpace::Pixel, None)
                .is_none()
        );
    }
}
