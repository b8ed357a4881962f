// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Voronoi cells clipped to a rectangle.
//!
//! Each cell starts as the bounding rectangle and is clipped by the perpendicular bisector
//! against every other site. This is quadratic in the number of sites, which is fine for the
//! point counts a scatter plot can show legibly.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect};

const EPSILON: f64 = 1e-9;

/// Voronoi tessellation of a set of sites inside a rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Voronoi {
    bounds: Rect,
    cells: Vec<Vec<Point>>,
}

impl Voronoi {
    /// Computes the cells of `sites`, clipped to `bounds`.
    ///
    /// Coincident sites share one cell; lookups resolve them to the lowest index. Sites outside
    /// `bounds` may end up with empty cells.
    pub fn new(sites: &[Point], bounds: Rect) -> Self {
        let bounds = bounds.abs();
        let cells = sites
            .iter()
            .enumerate()
            .map(|(i, &site)| {
                let mut cell = vec![
                    Point::new(bounds.x0, bounds.y0),
                    Point::new(bounds.x1, bounds.y0),
                    Point::new(bounds.x1, bounds.y1),
                    Point::new(bounds.x0, bounds.y1),
                ];
                for (j, &other) in sites.iter().enumerate() {
                    if i == j || other == site || cell.is_empty() {
                        continue;
                    }
                    cell = clip(&cell, site, other);
                }
                cell
            })
            .collect();
        Self { bounds, cells }
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if there are no sites.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The clipped rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Polygon of the cell owned by site `index`.
    pub fn cell(&self, index: usize) -> &[Point] {
        self.cells.get(index).map_or(&[], Vec::as_slice)
    }

    /// Cell outline as a closed path.
    pub fn cell_path(&self, index: usize) -> BezPath {
        let mut path = BezPath::new();
        let cell = self.cell(index);
        if let Some((first, rest)) = cell.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }

    /// Index of the site whose cell contains `p`, or `None` outside the bounds.
    ///
    /// Points on a shared edge resolve to the lower index.
    pub fn find(&self, p: Point) -> Option<usize> {
        if !self.bounds.inflate(EPSILON, EPSILON).contains(p) {
            return None;
        }
        self.cells.iter().position(|cell| contains(cell, p))
    }
}

/// Keeps the part of a convex polygon closer to `site` than to `other`.
fn clip(polygon: &[Point], site: Point, other: Point) -> Vec<Point> {
    let normal = other - site;
    let mid = site.midpoint(other);
    // Signed distance along the normal; non-positive means on the site's side.
    let side = |p: Point| (p - mid).dot(normal);

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (k, &cur) in polygon.iter().enumerate() {
        let prev = polygon[(k + polygon.len() - 1) % polygon.len()];
        let (dc, dp) = (side(cur), side(prev));
        let cur_in = dc <= 0.0;
        let prev_in = dp <= 0.0;
        if cur_in != prev_in {
            let t = dp / (dp - dc);
            out.push(prev.lerp(cur, t));
        }
        if cur_in {
            out.push(cur);
        }
    }
    out
}

fn contains(cell: &[Point], p: Point) -> bool {
    if cell.len() < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    for (k, &a) in cell.iter().enumerate() {
        let b = cell[(k + 1) % cell.len()];
        let cross = (b - a).cross(p - a);
        if cross.abs() <= EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn every_site_finds_itself() {
        let sites = [
            Point::new(10.0, 10.0),
            Point::new(90.0, 15.0),
            Point::new(50.0, 50.0),
            Point::new(52.0, 51.0),
            Point::new(20.0, 80.0),
        ];
        let v = Voronoi::new(&sites, Rect::new(0.0, 0.0, 100.0, 100.0));
        for (i, s) in sites.iter().enumerate() {
            assert_eq!(v.find(*s), Some(i), "site {i}");
        }
    }

    #[test]
    fn nearest_site_wins_and_ties_go_low() {
        let sites = [Point::new(25.0, 50.0), Point::new(75.0, 50.0)];
        let v = Voronoi::new(&sites, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(v.find(Point::new(40.0, 0.0)), Some(0));
        assert_eq!(v.find(Point::new(60.0, 99.0)), Some(1));
        assert_eq!(v.find(Point::new(50.0, 50.0)), Some(0), "shared edge");
        assert_eq!(v.find(Point::new(150.0, 50.0)), None, "outside bounds");
    }

    #[test]
    fn coincident_sites_share_a_cell() {
        let sites = [Point::new(30.0, 30.0), Point::new(30.0, 30.0)];
        let v = Voronoi::new(&sites, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(v.find(Point::new(30.0, 30.0)), Some(0));
        assert_eq!(v.cell(1).len(), 4, "both keep the whole rectangle");
    }

    #[test]
    fn single_site_owns_everything() {
        let v = Voronoi::new(&[Point::new(5.0, 5.0)], Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(v.find(Point::new(9.0, 1.0)), Some(0));
        assert_eq!(v.cell_path(0).elements().len(), 5);
    }
}
