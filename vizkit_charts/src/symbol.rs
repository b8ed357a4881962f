// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol helpers for connector ends.

use kurbo::{BezPath, Point, Vec2};

/// A filled triangular arrowhead whose tip is at `tip`, pointing along `direction`.
///
/// `size` is both the length and the base width of the triangle. A zero direction yields an
/// empty path.
pub fn arrowhead(tip: Point, direction: Vec2, size: f64) -> BezPath {
    let mut p = BezPath::new();
    let len = direction.hypot();
    if len == 0.0 || size <= 0.0 {
        return p;
    }
    let along = direction / len;
    let across = Vec2::new(-along.y, along.x);
    let base = tip - along * size;
    p.move_to(tip);
    p.line_to(base + across * (size * 0.5));
    p.line_to(base - across * (size * 0.5));
    p.close_path();
    p
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use kurbo::Shape;

    #[test]
    fn arrowhead_points_along_direction() {
        let p = arrowhead(Point::new(10.0, 0.0), Vec2::new(1.0, 0.0), 6.0);
        let b = p.bounding_box();
        assert_eq!(b.x1, 10.0, "tip is the rightmost point");
        assert_eq!(b.x0, 4.0);
        assert!((b.height() - 6.0).abs() < 1e-9, "base width equals size");
        assert!(arrowhead(Point::ORIGIN, Vec2::ZERO, 6.0).elements().is_empty());
    }
}
