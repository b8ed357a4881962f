// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderable marks.

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::{Brush, Color};

use crate::id::ItemId;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// Stable identity of a rendered mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives the id of the `part`-th mark of `role` for a data item.
    ///
    /// Ids derived from label identifiers survive reordering of the input.
    pub fn for_item(role: u16, item: &ItemId, part: u16) -> Self {
        let mut hash = FNV_OFFSET ^ u64::from(role);
        hash = item.fnv1a(hash);
        hash ^= u64::from(part) << 48;
        Self(hash)
    }

    /// Derives the id of the `index`-th mark of `role` that is not tied to a data item
    /// (axis ticks, legend rows, overlays).
    pub fn for_guide(role: u16, index: usize) -> Self {
        Self((u64::from(role) << 48) | (index as u64 & 0x0000_ffff_ffff_ffff))
    }
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Centered on the anchor point.
    Middle,
    /// Alphabetic baseline at the anchor point.
    Alphabetic,
    /// Hanging baseline at the anchor point.
    Hanging,
}

/// A filled axis-aligned rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMark {
    /// Geometry in scene coordinates.
    pub rect: Rect,
    /// Fill paint.
    pub fill: Brush,
}

/// A circle with optional outline.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleMark {
    /// Center in scene coordinates.
    pub center: Point,
    /// Radius in scene units.
    pub radius: f64,
    /// Fill paint.
    pub fill: Brush,
    /// Outline paint.
    pub stroke: Brush,
    /// Outline width; `0.0` disables the outline.
    pub stroke_width: f64,
}

/// An arbitrary path (lines, areas, arrowheads).
#[derive(Clone, Debug, PartialEq)]
pub struct PathMark {
    /// Geometry in scene coordinates.
    pub path: BezPath,
    /// Fill paint.
    pub fill: Brush,
    /// Stroke paint.
    pub stroke: Brush,
    /// Stroke width; `0.0` disables the stroke.
    pub stroke_width: f64,
    /// Dash pattern as `(dash, gap)`.
    pub dash: Option<(f64, f64)>,
    /// Fraction of the path length that is drawn, for progressive reveal.
    pub reveal: f64,
}

impl PathMark {
    /// A stroked, unfilled path.
    pub fn stroked(path: BezPath, stroke: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            path,
            fill: Brush::Solid(Color::TRANSPARENT),
            stroke: stroke.into(),
            stroke_width,
            dash: None,
            reveal: 1.0,
        }
    }

    /// A filled path without stroke.
    pub fn filled(path: BezPath, fill: impl Into<Brush>) -> Self {
        Self {
            path,
            fill: fill.into(),
            stroke: Brush::Solid(Color::TRANSPARENT),
            stroke_width: 0.0,
            dash: None,
            reveal: 1.0,
        }
    }
}

/// Unshaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Rotation in degrees around `pos`.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Fill paint.
    pub fill: Brush,
}

impl TextMark {
    /// Creates a 12px text mark anchored at its start.
    pub fn new(pos: Point, text: impl Into<String>, fill: impl Into<Brush>) -> Self {
        Self {
            pos,
            text: text.into(),
            font_size: 12.0,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            fill: fill.into(),
        }
    }

    /// Sets the anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the rotation angle in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }
}

/// Mark geometry and paint.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rectangle.
    Rect(RectMark),
    /// Circle.
    Circle(CircleMark),
    /// Path.
    Path(PathMark),
    /// Text.
    Text(TextMark),
}

impl MarkPayload {
    /// Returns geometric bounds, or `None` for text (which needs shaping to measure).
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect),
            Self::Circle(c) => Some(Rect::from_center_size(
                c.center,
                (2.0 * c.radius, 2.0 * c.radius),
            )),
            Self::Path(p) => Some(p.path.bounding_box()),
            Self::Text(_) => None,
        }
    }
}

/// A renderable shape with stable identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable id used for diffing.
    pub id: MarkId,
    /// Render order; lower values draw first.
    pub z_index: i32,
    /// Group opacity in `[0, 1]`.
    pub opacity: f64,
    /// Geometry and paint.
    pub payload: MarkPayload,
}

impl Mark {
    /// Creates a fully opaque mark.
    pub fn new(id: MarkId, z_index: i32, payload: MarkPayload) -> Self {
        Self {
            id,
            z_index,
            opacity: 1.0,
            payload,
        }
    }

    /// Sets the group opacity (clamped to `[0, 1]`).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Returns geometric bounds (see [`MarkPayload::bounds`]).
    pub fn bounds(&self) -> Option<Rect> {
        self.payload.bounds()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::label::Label;

    #[test]
    fn item_ids_follow_labels_not_positions() {
        let a = MarkId::for_item(1, &ItemId::Label(Label::from("A")), 0);
        let again = MarkId::for_item(1, &ItemId::Label(Label::from("A")), 0);
        let other_part = MarkId::for_item(1, &ItemId::Label(Label::from("A")), 1);
        let other_role = MarkId::for_item(2, &ItemId::Label(Label::from("A")), 0);
        assert_eq!(a, again);
        assert_ne!(a, other_part, "parts of one item need distinct ids");
        assert_ne!(a, other_role, "roles need distinct ids");
    }

    #[test]
    fn circle_bounds_cover_the_diameter() {
        let payload = MarkPayload::Circle(CircleMark {
            center: Point::new(10.0, 10.0),
            radius: 2.0,
            fill: Brush::default(),
            stroke: Brush::default(),
            stroke_width: 0.0,
        });
        assert_eq!(payload.bounds(), Some(Rect::new(8.0, 8.0, 12.0, 12.0)));
    }
}
