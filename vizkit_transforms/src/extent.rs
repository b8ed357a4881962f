// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value extents.

/// Whether a computed extent is stretched to include zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroInclusion {
    /// All-positive data gets `min = 0`; all-negative data gets `max = 0`.
    #[default]
    Include,
    /// Use the data extent as-is (scatter axes, strips, bee swarms).
    Exclude,
}

/// Options for [`Extent::of`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtentOptions {
    /// Explicit minimum; bypasses zero inclusion for the lower bound.
    pub min: Option<f64>,
    /// Explicit maximum; bypasses zero inclusion for the upper bound.
    pub max: Option<f64>,
    /// Zero inclusion policy for bounds without an override.
    pub zero: ZeroInclusion,
}

impl ExtentOptions {
    /// Default options: no overrides, zero included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit minimum.
    pub fn with_min(mut self, min: Option<f64>) -> Self {
        self.min = min;
        self
    }

    /// Sets an explicit maximum.
    pub fn with_max(mut self, max: Option<f64>) -> Self {
        self.max = max;
        self
    }

    /// Sets the zero inclusion policy.
    pub fn with_zero(mut self, zero: ZeroInclusion) -> Self {
        self.zero = zero;
        self
    }
}

/// A resolved `[min, max]` value extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Extent {
    /// Creates an extent.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the raw `(min, max)` over present, finite values, or `None` if there are none.
    pub fn raw(values: impl IntoIterator<Item = Option<f64>>) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().flatten() {
            if !v.is_finite() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }

    /// Computes the effective extent of `values`.
    ///
    /// Missing and non-finite values are ignored. With nothing left, the data extent collapses to
    /// `0..0`. Zero inclusion then clamps `max < 0` to `0` and `min > 0` to `0`; an explicit
    /// override for a bound replaces that bound outright.
    pub fn of(values: impl IntoIterator<Item = Option<f64>>, options: &ExtentOptions) -> Self {
        let (raw_min, raw_max) = Self::raw(values).unwrap_or((0.0, 0.0));
        let include = options.zero == ZeroInclusion::Include;
        let min = options
            .min
            .unwrap_or(if include && raw_min > 0.0 { 0.0 } else { raw_min });
        let max = options
            .max
            .unwrap_or(if include && raw_max < 0.0 { 0.0 } else { raw_max });
        Self { min, max }
    }

    /// Width of the extent.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Returns `true` if `v` lies within the extent (inclusive).
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Smallest extent covering both.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn all_positive_data_starts_at_zero() {
        let e = Extent::of([Some(3.0), None, Some(7.0)], &ExtentOptions::new());
        assert_eq!(e, Extent::new(0.0, 7.0));
    }

    #[test]
    fn all_negative_data_ends_at_zero() {
        let e = Extent::of([Some(-3.0), Some(-7.0)], &ExtentOptions::new());
        assert_eq!(e, Extent::new(-7.0, 0.0));
    }

    #[test]
    fn mixed_signs_are_left_alone() {
        let e = Extent::of([Some(5.0), Some(-3.0)], &ExtentOptions::new());
        assert_eq!(e, Extent::new(-3.0, 5.0));
    }

    #[test]
    fn overrides_skip_the_clamp() {
        let opts = ExtentOptions::new().with_min(Some(2.0));
        let e = Extent::of([Some(3.0), Some(7.0)], &opts);
        assert_eq!(e, Extent::new(2.0, 7.0), "min override wins over zero inclusion");

        let opts = ExtentOptions::new().with_max(Some(-1.0));
        let e = Extent::of([Some(-3.0), Some(-7.0)], &opts);
        assert_eq!(e, Extent::new(-7.0, -1.0));
    }

    #[test]
    fn empty_or_all_null_collapses_to_zero() {
        let e = Extent::of([None, None], &ExtentOptions::new());
        assert_eq!(e, Extent::new(0.0, 0.0));
        let e = Extent::of(core::iter::empty(), &ExtentOptions::new());
        assert_eq!(e.span(), 0.0);
    }

    #[test]
    fn exclusion_keeps_the_data_extent() {
        let opts = ExtentOptions::new().with_zero(ZeroInclusion::Exclude);
        let e = Extent::of([Some(3.0), Some(f64::NAN), Some(7.0)], &opts);
        assert_eq!(e, Extent::new(3.0, 7.0), "NaN is treated as missing");
    }
}
