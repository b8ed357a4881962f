// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hit-testing.
//!
//! Each chart family resolves pointer positions differently:
//! - time series bisect on x and always resolve to a point,
//! - scatter plots use Voronoi cells so the nearest point wins,
//! - categorical charts hit the drawn shapes only.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::voronoi::Voronoi;

/// Nearest-by-x lookup over ascending x positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bisector {
    xs: Vec<f64>,
}

impl Bisector {
    /// Creates a bisector; `xs` must be sorted ascending.
    pub fn new(xs: Vec<f64>) -> Self {
        debug_assert!(
            xs.windows(2).all(|w| w[0] <= w[1]),
            "bisector positions must be sorted"
        );
        Self { xs }
    }

    /// Index of the position nearest to `x`.
    ///
    /// Exact midpoints resolve to the later position. Positions before the first or after the
    /// last resolve to the first or last index; only an empty bisector returns `None`.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        let last = self.xs.len().checked_sub(1)?;
        let i = self.xs[..last].partition_point(|v| *v < x);
        if i > 0 && x - self.xs[i - 1] < self.xs[i] - x {
            Some(i - 1)
        } else {
            Some(i)
        }
    }
}

/// A hit region for direct shape hits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
}

impl HitShape {
    /// Returns `true` if `p` lies inside the shape (edges included).
    pub fn contains(&self, p: Point) -> bool {
        match *self {
            Self::Rect(r) => {
                let r = r.abs();
                p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
            }
            Self::Circle { center, radius } => (p - center).hypot2() <= radius * radius,
        }
    }
}

/// Resolves pointer positions to target indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HitIndex {
    /// Nothing is hoverable.
    #[default]
    Empty,
    /// Nearest by x; target `i` is the `i`-th sorted position.
    Bisect(Bisector),
    /// Voronoi cell membership; target `i` is site `i`.
    Voronoi(Voronoi),
    /// Drawn shapes, in draw order, each with its target index.
    ///
    /// Later shapes are on top and win overlaps.
    Regions(Vec<(HitShape, usize)>),
}

impl HitIndex {
    /// Target under `p`, if any.
    pub fn hit(&self, p: Point) -> Option<usize> {
        let found = match self {
            Self::Empty => None,
            Self::Bisect(b) => b.nearest(p.x),
            Self::Voronoi(v) => v.find(p),
            Self::Regions(regions) => regions
                .iter()
                .rev()
                .find(|(shape, _)| shape.contains(p))
                .map(|(_, target)| *target),
        };
        tracing::trace!(x = p.x, y = p.y, ?found, "hit test");
        found
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    #[test]
    fn bisect_hits_exact_positions() {
        let b = Bisector::new(vec![10.0, 20.0, 40.0]);
        assert_eq!(b.nearest(10.0), Some(0));
        assert_eq!(b.nearest(20.0), Some(1));
        assert_eq!(b.nearest(40.0), Some(2));
    }

    #[test]
    fn bisect_never_misses() {
        let b = Bisector::new(vec![10.0, 20.0, 40.0]);
        assert_eq!(b.nearest(-100.0), Some(0));
        assert_eq!(b.nearest(1e9), Some(2), "past the end is the last point");
        assert_eq!(b.nearest(15.0), Some(1), "midpoints go to the later point");
        assert_eq!(b.nearest(29.0), Some(1));
        assert_eq!(Bisector::default().nearest(0.0), None);
    }

    #[test]
    fn regions_have_no_proximity_fallback() {
        let index = HitIndex::Regions(vec![
            (HitShape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)), 0),
            (
                HitShape::Circle {
                    center: Point::new(10.0, 10.0),
                    radius: 3.0,
                },
                1,
            ),
        ]);
        assert_eq!(index.hit(Point::new(5.0, 5.0)), Some(0));
        assert_eq!(index.hit(Point::new(9.0, 9.0)), Some(1), "top shape wins");
        assert_eq!(index.hit(Point::new(20.0, 20.0)), None);
        assert_eq!(HitIndex::Empty.hit(Point::ORIGIN), None);
    }
}
