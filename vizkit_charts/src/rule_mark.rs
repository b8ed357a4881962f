// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! A "rule" is a straight stroked segment: baselines, gridlines, connectors, reference lines.

use kurbo::{BezPath, Point};
use peniko::Brush;
use vizkit_core::{Mark, MarkId, MarkPayload, PathMark};

use crate::z_order;

/// A rule mark spec (a stroked line segment).
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Start point in scene coordinates.
    pub p0: Point,
    /// End point in scene coordinates.
    pub p1: Point,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Dash pattern as `(dash, gap)`.
    pub dash: Option<(f64, f64)>,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// Creates a new rule between two points.
    pub fn new(id: MarkId, p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self {
            id,
            p0: p0.into(),
            p1: p1.into(),
            stroke: Brush::default(),
            stroke_width: 1.0,
            dash: None,
            z_index: z_order::SERIES_STROKE,
        }
    }

    /// Creates a horizontal rule.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, (x0, y), (x1, y))
    }

    /// Creates a vertical rule.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, (x, y0), (x, y1))
    }

    /// Sets stroke paint and width.
    pub fn with_stroke(mut self, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        self.stroke = stroke.into();
        self.stroke_width = stroke_width;
        self
    }

    /// Sets a dash pattern.
    pub fn with_dash(mut self, dash: Option<(f64, f64)>) -> Self {
        self.dash = dash;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the rule mark.
    pub fn mark(&self) -> Mark {
        let mut p = BezPath::new();
        p.move_to(self.p0);
        p.line_to(self.p1);
        let mut path = PathMark::stroked(p, self.stroke.clone(), self.stroke_width);
        path.dash = self.dash;
        Mark::new(self.id, self.z_index, MarkPayload::Path(path))
    }
}
