// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordinary least squares.

/// A fitted line `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    /// Slope.
    pub slope: f64,
    /// Intercept at `x = 0`.
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluates the line at `x`.
    pub fn y(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Solves the line for `y`, or `None` for a flat line.
    pub fn x(&self, y: f64) -> Option<f64> {
        (self.slope != 0.0).then(|| (y - self.intercept) / self.slope)
    }
}

/// Fits a line through `points` by ordinary least squares.
///
/// Non-finite points are skipped. Returns `None` with fewer than two usable points. When every
/// point shares one x, the fit is flat through the mean y.
pub fn linear_regression(points: impl IntoIterator<Item = (f64, f64)>) -> Option<LinearFit> {
    let mut n = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for (x, y) in points {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }
    if n < 2.0 {
        return None;
    }
    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return Some(LinearFit {
            slope: 0.0,
            intercept: sum_y / n,
        });
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = sum_y / n - slope * sum_x / n;
    Some(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn recovers_an_exact_line() {
        let fit = linear_regression([(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12, "slope {fit:?}");
        assert!((fit.intercept - 1.0).abs() < 1e-12, "intercept {fit:?}");
        assert_eq!(fit.x(5.0), Some(2.0));
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(linear_regression([(1.0, 1.0)]), None, "one point has no fit");
        let flat = linear_regression([(2.0, 1.0), (2.0, 3.0)]).unwrap();
        assert_eq!(flat, LinearFit { slope: 0.0, intercept: 2.0 });
        assert_eq!(flat.x(1.0), None);
    }
}
