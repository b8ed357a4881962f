// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart sizing: resolve the outer size, then carve the plot rectangle out of it.

use kurbo::Rect;

/// Width used when neither the settings nor the container provide one.
pub const DEFAULT_WIDTH: f64 = 620.0;
/// Height used when neither the settings nor the container provide one.
pub const DEFAULT_HEIGHT: f64 = 480.0;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the plot for axes and labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
    /// Right margin.
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(20.0, 25.0, 20.0, 20.0)
    }
}

impl Margins {
    /// No margins.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates margins in top, bottom, left, right order.
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Swaps left and right, for right-to-left layouts.
    pub fn mirrored(self) -> Self {
        Self {
            left: self.right,
            right: self.left,
            ..self
        }
    }
}

/// Requested outer size of a chart.
///
/// An explicit width or height always wins. Otherwise the width comes from the container, then
/// [`DEFAULT_WIDTH`]; the height comes from `relative_height × width` when a relative height is
/// set, else the container, else [`DEFAULT_HEIGHT`]. The result is never shorter than
/// `min_height`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartSize {
    /// Explicit width.
    pub width: Option<f64>,
    /// Explicit height.
    pub height: Option<f64>,
    /// Height as a fraction of the width.
    pub relative_height: Option<f64>,
    /// Lower bound on the resolved height.
    pub min_height: f64,
}

impl ChartSize {
    /// A fixed size.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Sets the explicit width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the explicit height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the height as a fraction of the width.
    pub fn with_relative_height(mut self, relative_height: f64) -> Self {
        self.relative_height = Some(relative_height);
        self
    }

    /// Sets the minimum height.
    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height.max(0.0);
        self
    }

    /// Resolves the outer size, given the container's size if it is known.
    pub fn resolve(&self, container: Option<Size>) -> Size {
        let width = self
            .width
            .or(container.map(|c| c.width))
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_WIDTH);
        let height = self
            .height
            .or_else(|| match self.relative_height {
                Some(rh) => Some(width * rh),
                None => container.map(|c| c.height),
            })
            .filter(|h| *h > 0.0)
            .unwrap_or(DEFAULT_HEIGHT);
        Size::new(width, height.max(self.min_height))
    }
}

/// Output of the arrange pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// The plot rectangle: the view inset by the margins.
    pub plot: Rect,
}

impl ChartLayout {
    /// Places the plot inside a view of `size`, inset by `margins`.
    ///
    /// Margins larger than the view collapse the plot to zero size rather than inverting it.
    pub fn arrange(size: Size, margins: Margins) -> Self {
        let view = Rect::new(0.0, 0.0, size.width.max(0.0), size.height.max(0.0));
        let x0 = margins.left.max(0.0).min(view.x1);
        let y0 = margins.top.max(0.0).min(view.y1);
        let plot = Rect::new(
            x0,
            y0,
            (view.x1 - margins.right.max(0.0)).max(x0),
            (view.y1 - margins.bottom.max(0.0)).max(y0),
        );
        Self { view, plot }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn explicit_sizes_win() {
        let size = ChartSize::fixed(300.0, 200.0).resolve(Some(Size::new(900.0, 900.0)));
        assert_eq!(size, Size::new(300.0, 200.0));
    }

    #[test]
    fn container_then_defaults() {
        assert_eq!(
            ChartSize::default().resolve(Some(Size::new(800.0, 600.0))),
            Size::new(800.0, 600.0)
        );
        assert_eq!(
            ChartSize::default().resolve(None),
            Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
        );
    }

    #[test]
    fn relative_height_beats_the_container() {
        let size = ChartSize::default()
            .with_relative_height(0.5)
            .resolve(Some(Size::new(800.0, 100.0)));
        assert_eq!(size, Size::new(800.0, 400.0));
        let tall = ChartSize::default()
            .with_relative_height(0.1)
            .with_min_height(150.0)
            .resolve(None);
        assert_eq!(tall.height, 150.0, "min height clamps");
    }

    #[test]
    fn arrange_insets_the_plot() {
        let layout = ChartLayout::arrange(Size::new(620.0, 480.0), Margins::default());
        assert_eq!(layout.plot, Rect::new(20.0, 20.0, 600.0, 455.0));
        let tiny = ChartLayout::arrange(Size::new(10.0, 10.0), Margins::default());
        assert!(tiny.plot.width() >= 0.0 && tiny.plot.height() >= 0.0);
    }
}
