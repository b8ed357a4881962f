// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scale utilities.
//!
//! Scales map data values into scene coordinates. Chart layouts instantiate them with ranges
//! already offset into the plot rectangle, so mapped values can be used directly as mark
//! geometry.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::time;

/// Target tick count used when "nicing" a domain (matches the common `nice()` default).
pub const NICE_TICK_COUNT: usize = 10;

/// A continuous scale instance, as used by axes.
#[derive(Clone, Copy, Debug)]
pub enum ScaleContinuous {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Time scale.
    Time(ScaleTime),
}

impl ScaleContinuous {
    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        match self {
            Self::Linear(s) => s.map(x),
            Self::Time(s) => s.map(x),
        }
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        match self {
            Self::Linear(s) => s.invert(y),
            Self::Time(s) => s.invert(y),
        }
    }

    /// Returns tick values.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            Self::Linear(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
        }
    }
}

impl From<ScaleLinear> for ScaleContinuous {
    fn from(value: ScaleLinear) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleTime> for ScaleContinuous {
    fn from(value: ScaleTime) -> Self {
        Self::Time(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain to round tick boundaries.
    pub nice: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return 0.5 * (r0 + r1);
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return 0.5 * (d0 + d1);
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns "nice-ish" tick values inside the domain.
    ///
    /// `count` is a target; the result may hold more or fewer ticks so they land on round
    /// numbers.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|t| *t >= lo - 1e-9 * (hi - lo).abs() && *t <= hi + 1e-9 * (hi - lo).abs())
            .collect()
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    ///
    /// The domain is extended outward to the nearest tick step, keeping its orientation.
    pub fn resolved_domain(&self) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let (lo, hi) = ordered(self.domain);
        let ticks = nice_ticks(lo, hi, NICE_TICK_COUNT);
        let (Some(&first), Some(&last)) = (ticks.first(), ticks.last()) else {
            return self.domain;
        };
        if ticks.len() < 2 {
            return self.domain;
        }
        if self.domain.0 <= self.domain.1 {
            (first, last)
        } else {
            (last, first)
        }
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(), range)
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

pub(crate) fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step0 = span / count.max(1) as f64;
    let step = nice_step(step0);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n)
        .map(|i| clean_zero(start + step * i as f64))
        .collect()
}

pub(crate) fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Snaps values within floating-point noise of zero to zero.
fn clean_zero(v: f64) -> f64 {
    if v.abs() < 1e-12 { 0.0 } else { v }
}

/// A discrete band scale for categorical charts.
///
/// Padding is expressed as a fraction of the step (the distance between band starts), so
/// `padding_inner = 0.25` leaves a quarter of each step empty between bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

/// Specification for a band scale (count + padding, no range yet).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBandSpec {
    /// Number of bands.
    pub count: usize,
    /// Inner padding as a fraction of the step.
    pub padding_inner: f64,
    /// Outer padding as a fraction of the step.
    pub padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, without padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let span = (r1 - r0).abs();
        let denom = (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        span / denom
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the start of the band at `index`.
    ///
    /// Leftover space is split evenly on both ends.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let start = r0.min(r1);
        let span = (r1 - r0).abs();
        let step = self.step();
        let n = self.count as f64;
        let used = step * (n - self.padding_inner);
        let offset = (span - used) * 0.5;
        start + offset + step * index as f64
    }

    /// Returns the center of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.band_width()
    }

    /// Returns the band containing `pos`, if any.
    pub fn index_at(&self, pos: f64) -> Option<usize> {
        (0..self.count).find(|&i| {
            let x = self.x(i);
            pos >= x && pos <= x + self.band_width()
        })
    }
}

impl ScaleBandSpec {
    /// Creates a new band scale spec without padding.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleBand {
        ScaleBand::new(range, self.count).with_padding(self.padding_inner, self.padding_outer)
    }
}

/// Optional per-band thickness bounds.
///
/// These adjust the extent a band scale covers: the available space is shrunk to at most
/// `max * count`, or grown to at least `min * count`. When both are set, `min` wins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandThickness {
    /// Minimum step per band.
    pub min: Option<f64>,
    /// Maximum step per band.
    pub max: Option<f64>,
}

impl BandThickness {
    /// Resolves the band-scale extent for `count` bands given `available` space.
    pub fn extent(&self, available: f64, count: usize) -> f64 {
        let n = count as f64;
        match (self.min, self.max) {
            (Some(min), _) => available.max(min * n),
            (None, Some(max)) => available.min(max * n),
            (None, None) => available,
        }
    }
}

/// A square-root scale for bubble radii.
///
/// The domain is `[0, max]` and the range starts at a small positive radius, so zero-valued
/// points stay visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Smallest radius a sqrt scale produces by default.
pub const MIN_RADIUS: f64 = 0.25;

impl ScaleSqrt {
    /// Creates a sqrt scale mapping `domain` to `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Bubble scale: domain `[0, max_value]` (niced), range `[MIN_RADIUS, max_radius]`.
    pub fn radius(max_value: f64, max_radius: f64) -> Self {
        let domain = ScaleLinearSpec::new((0.0, max_value.max(0.0)))
            .with_nice(true)
            .resolved_domain();
        Self::new(domain, (MIN_RADIUS, max_radius))
    }

    fn transform(v: f64) -> f64 {
        if v < 0.0 { -(-v).sqrt() } else { v.sqrt() }
    }

    /// Maps a value into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = (Self::transform(self.domain.0), Self::transform(self.domain.1));
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (Self::transform(x) - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

/// A time scale: a linear scale over seconds since the Unix epoch with calendar ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp (seconds) into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range position back to a timestamp (seconds).
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// Returns calendar-aligned tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.inner.domain());
        time::time_ticks(lo, hi, count)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn linear_round_trips_through_invert() {
        let s = ScaleLinear::new((-3.0, 5.0), (300.0, 20.0));
        for x in [-3.0, -1.25, 0.0, 2.0, 5.0, 7.5] {
            assert!((s.invert(s.map(x)) - x).abs() < 1e-9, "round trip for {x}");
        }
    }

    #[test]
    fn degenerate_domain_maps_to_range_middle() {
        let s = ScaleLinear::new((0.0, 0.0), (0.0, 100.0));
        assert_eq!(s.map(0.0), 50.0);
        assert_eq!(s.map(42.0), 50.0);
    }

    #[test]
    fn nice_extends_outward_only() {
        let spec = ScaleLinearSpec::new((-3.0, 5.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(), (-3.0, 5.0), "already round");
        let spec = ScaleLinearSpec::new((0.0, 93.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(), (0.0, 100.0));
        let spec = ScaleLinearSpec::new((0.0, 0.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(), (0.0, 0.0), "degenerate stays put");
    }

    #[test]
    fn ticks_stay_inside_domain() {
        let s = ScaleLinear::new((0.0, 93.0), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks.first(), Some(&0.0));
        assert!(ticks.iter().all(|t| *t <= 93.0), "{ticks:?}");
    }

    #[test]
    fn band_padding_is_a_fraction_of_step() {
        let band = ScaleBand::new((0.0, 100.0), 4).with_padding(0.25, 0.0);
        let step = 100.0 / 3.75;
        assert!((band.step() - step).abs() < 1e-9);
        assert!((band.band_width() - 0.75 * step).abs() < 1e-9);
        assert!(band.x(0).abs() < 1e-9, "no outer padding");
        assert!((band.x(3) + band.band_width() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn band_index_lookup_ignores_gaps() {
        let band = ScaleBand::new((0.0, 100.0), 2).with_padding(0.5, 0.0);
        assert_eq!(band.index_at(10.0), Some(0));
        assert_eq!(band.index_at(50.0), None, "the gap is not a band");
        assert_eq!(band.index_at(90.0), Some(1));
    }

    #[test]
    fn thickness_caps_the_band_extent() {
        let caps = BandThickness {
            min: None,
            max: Some(20.0),
        };
        assert_eq!(caps.extent(500.0, 5), 100.0);
        assert_eq!(caps.extent(50.0, 5), 50.0);
        let floor = BandThickness {
            min: Some(20.0),
            max: Some(5.0),
        };
        assert_eq!(floor.extent(50.0, 5), 100.0, "min wins over max");
    }

    #[test]
    fn sqrt_radius_keeps_zero_visible() {
        let s = ScaleSqrt::radius(40.0, 20.0);
        assert_eq!(s.map(0.0), MIN_RADIUS);
        assert_eq!(s.domain(), (0.0, 40.0));
        assert!((s.map(40.0) - 20.0).abs() < 1e-9);
        assert!(s.map(10.0) > s.map(5.0), "monotonic");
    }

    #[test]
    fn time_round_trips_through_invert() {
        let s = ScaleTime::new((0.0, 86_400.0 * 365.0), (0.0, 600.0));
        let t = 86_400.0 * 100.0;
        assert!((s.invert(s.map(t)) - t).abs() < 1e-6);
    }
}
