// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static overlays positioned through a chart's scales.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

/// A horizontal or vertical reference line at a data value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ReferenceValue {
    /// Position in data units; `None` draws nothing.
    pub value: Option<f64>,
    /// Line label.
    pub text: String,
    /// CSS color; defaults to the theme's dark gray.
    pub color: Option<String>,
}

impl ReferenceValue {
    /// Creates a reference line.
    pub fn new(value: f64, text: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            text: text.into(),
            color: None,
        }
    }

    /// Sets the line color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Horizontal alignment of annotation text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum AnnotationAlign {
    /// Left-aligned (default outside RTL).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
}

/// A text callout pointing at a data coordinate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Annotation {
    /// Callout text.
    pub text: String,
    /// Annotated x in data units; `None` pins to the plot's left edge.
    pub x_coordinate: Option<f64>,
    /// Annotated y in data units; `None` pins to the plot's top edge.
    pub y_coordinate: Option<f64>,
    /// Text offset from the annotated point, in pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub x_offset: f64,
    /// Text offset from the annotated point, in pixels.
    #[cfg_attr(feature = "serde", serde(default))]
    pub y_offset: f64,
    /// Text alignment; `None` follows the reading direction.
    pub align: Option<AnnotationAlign>,
    /// CSS color for text and connector.
    pub color: Option<String>,
    /// Whether to draw a ring at the point and a leader line to the text.
    #[cfg_attr(feature = "serde", serde(default))]
    pub show_connector: bool,
    /// Ring radius; defaults to 3.5.
    pub connector_radius: Option<f64>,
}

impl Annotation {
    /// Creates an annotation at a data coordinate.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x_coordinate: Some(x),
            y_coordinate: Some(y),
            x_offset: 0.0,
            y_offset: 0.0,
            align: None,
            color: None,
            show_connector: false,
            connector_radius: None,
        }
    }

    /// Sets the pixel offset of the text from the annotated point.
    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.x_offset = dx;
        self.y_offset = dy;
        self
    }

    /// Draws a connector ring and leader line.
    pub fn with_connector(mut self, radius: Option<f64>) -> Self {
        self.show_connector = true;
        self.connector_radius = radius;
        self
    }
}

/// A shaded band in data coordinates. Missing bounds extend to the plot edge.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightArea {
    /// Lower x bound.
    pub x0: Option<f64>,
    /// Upper x bound.
    pub x1: Option<f64>,
    /// Lower y bound.
    pub y0: Option<f64>,
    /// Upper y bound.
    pub y1: Option<f64>,
}

impl HighlightArea {
    /// A vertical band spanning `x0..x1`.
    pub fn x_range(x0: Option<f64>, x1: Option<f64>) -> Self {
        Self {
            x0,
            x1,
            y0: None,
            y1: None,
        }
    }

    /// Returns `true` if no bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.x0.is_none() && self.x1.is_none() && self.y0.is_none() && self.y1.is_none()
    }
}

/// A free-form highlight given as flattened `[x0, y0, x1, y1, ...]` data coordinates.
///
/// Exactly four coordinates draw a line segment; more draw a closed polygon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CustomHighlightArea {
    /// Flattened coordinates.
    pub coordinates: Vec<f64>,
    /// CSS fill color for polygons.
    pub fill: Option<String>,
    /// CSS stroke color.
    pub stroke: Option<String>,
    /// Stroke width; defaults to 1.
    pub stroke_width: Option<f64>,
    /// Dash pattern `(dash, gap)`.
    pub dash: Option<(f64, f64)>,
}

impl CustomHighlightArea {
    /// Creates an area from flattened coordinates.
    pub fn new(coordinates: impl Into<Vec<f64>>) -> Self {
        Self {
            coordinates: coordinates.into(),
            fill: None,
            stroke: None,
            stroke_width: None,
            dash: None,
        }
    }

    /// Returns `true` if this area draws a single line segment.
    pub fn is_segment(&self) -> bool {
        self.coordinates.len() == 4
    }
}
