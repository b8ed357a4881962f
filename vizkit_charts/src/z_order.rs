// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order conventions for chart-generated marks.
//!
//! Renderers sort by `(z_index, MarkId)`, so layouts only need coarse bands.

/// Highlight areas drawn behind everything else.
pub const HIGHLIGHT_AREAS: i32 = -100;
/// Gridlines drawn behind series.
pub const GRID_LINES: i32 = -50;
/// Interval bands and stacked areas.
pub const SERIES_FILL: i32 = 0;
/// Lines, connectors and rules.
pub const SERIES_STROKE: i32 = 10;
/// Points and bars drawn above lines.
pub const SERIES_POINTS: i32 = 20;
/// Highlighted points, drawn above the rest.
pub const SERIES_HIGHLIGHT: i32 = 25;
/// Zero baseline and reference lines.
pub const AXIS_RULES: i32 = 30;
/// Tick, category and value labels.
pub const AXIS_LABELS: i32 = 40;
/// Axis titles.
pub const AXIS_TITLES: i32 = 50;
/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels.
pub const LEGEND_LABELS: i32 = 70;
/// Annotations and the regression line.
pub const ANNOTATIONS: i32 = 80;
/// Hover guides (crosshair rule and focus dot).
pub const HOVER: i32 = 90;
