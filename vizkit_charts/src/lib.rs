// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart layouts for `vizkit_core`.
//!
//! Each chart family is a `*ChartSpec` whose `layout` turns a typed data slice plus a
//! [`ViewState`] into a [`ChartFrame`]: positioned marks with stable ids and a hit index.
//! Around the layouts sit the shared pieces they are built from:
//! - **Scales** map data values into screen coordinates.
//! - **Guides** (axes, reference lines, highlight areas, annotations, legends) are generated as
//!   `vizkit_core::Mark`s.
//! - **Interaction** and **animation** are explicit state machines driven by the host; layouts
//!   only read their output.
//!
//! Text shaping is out of scope; text marks store unshaped strings and legends take a
//! [`TextMeasurer`] for rough bounds.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod animation;
mod axis;
mod bar_chart;
mod bee_swarm_chart;
mod chart_spec;
mod color;
mod data_table;
mod dumbbell_chart;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod frame;
mod grouped_bar_chart;
mod guides;
mod hit;
mod interaction;
mod interval_line_chart;
mod layout;
mod legend;
mod map;
mod measure;
mod role;
mod rule_mark;
mod scale;
mod scatter_chart;
#[cfg(test)]
mod scenario_tests;
mod stacked_area_chart;
mod stacked_bar_chart;
mod strip_chart;
mod symbol;
mod time;
mod tooltip;
mod voronoi;
mod z_order;

pub use animation::{AnimateLine, AnimationFrame, AnimationPhase, AnimationSequencer};
pub use axis::{AxisOrient, AxisSpec, AxisStyle, GridStyle, StrokeStyle, TickFormatter};
pub use bar_chart::BarChartSpec;
pub use bee_swarm_chart::BeeSwarmChartSpec;
pub use chart_spec::{
    ChartSettings, DEFAULT_BAR_PADDING, DEFAULT_RADIUS, DEFAULT_TICK_COUNT, DEFAULT_TRUNCATE_BY,
};
pub use color::{CATEGORICAL, ColorScale, GRAY, Grays, MAIN, Palette, Theme, parse_color};
pub use data_table::{
    CellAlign, CellText, ChipColor, DataTableColumn, DataTableSpec, TableCell, TableView,
};
pub use dumbbell_chart::DumbbellChartSpec;
pub use format::{DEFAULT_PRECISION, format_number, format_tick, truncate_label};
pub use frame::{ChartFrame, EMPTY_STATE_TEXT, HitTarget};
pub use grouped_bar_chart::{BarOrientation, GroupedBarChartSpec, SUB_BAR_PADDING};
pub use guides::{CONNECTOR_RADIUS, GuideContext, RegressionSpace, baseline, baseline_vertical};
pub use hit::{Bisector, HitIndex, HitShape};
pub use interaction::{
    Callback, DEFAULT_OPACITY, DIM_OPACITY, InteractionController, InteractionEvent, Selection,
    ViewState,
};
pub use interval_line_chart::{IntervalLineChartSpec, IntervalRow};
pub use layout::{ChartLayout, ChartSize, DEFAULT_HEIGHT, DEFAULT_WIDTH, Margins, Size};
pub use legend::{
    ColorLegend, ColorLegendSpec, LegendEntry, NA_LABEL, THRESHOLD_NA_X, THRESHOLD_WIDTH,
    THRESHOLD_WIDTH_WITH_NA, ThresholdLegendSpec,
};
pub use map::{BaseMapRenderer, BaseMapSpec};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    BandThickness, MIN_RADIUS, NICE_TICK_COUNT, ScaleBand, ScaleBandSpec, ScaleContinuous,
    ScaleLinear, ScaleLinearSpec, ScaleSqrt, ScaleTime,
};
pub use scatter_chart::{RegressionLine, ScatterChartSpec};
pub use stacked_area_chart::{AreaRow, StackedAreaChartSpec};
pub use stacked_bar_chart::{StackedBarChartSpec, TIMELINE_STEP, Timeline};
pub use strip_chart::{StripChartSpec, StripStyle};
pub use symbol::arrowhead;
pub use time::{DEFAULT_DATE_FORMAT, format_date, parse_date, parse_date_label, time_ticks};
pub use tooltip::Template;
pub use voronoi::Voronoi;
pub use z_order::*;
