// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated vertical stacked bar chart.
//!
//! The data holds one stack per label and date. A [`Timeline`] picks the date shown; the value
//! axis covers every date so it stays fixed while the timeline plays. Bars are identified by
//! label, so a bar keeps its mark ids as it moves between frames.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Point, Rect};
use vizkit_core::{
    ItemId, Mark, MarkId, MarkPayload, RectMark, ReferenceValue, StackedBarDatum, TextAnchor,
    TextBaseline, TextMark,
};
use vizkit_transforms::{
    Extent, ExtentOptions, SortOrder, StackOffset, StackSort, stack, stack_order,
};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{
    ChartSettings, DEFAULT_BAR_PADDING, DEFAULT_TICK_COUNT, DEFAULT_TRUNCATE_BY,
};
use crate::color::Palette;
use crate::format::{format_number, truncate_label};
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, baseline};
use crate::hit::{HitIndex, HitShape};
use crate::interaction::{DEFAULT_OPACITY, DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::role;
use crate::scale::{BandThickness, ScaleBand, ScaleContinuous, ScaleLinear, ScaleLinearSpec};
use crate::time::{DEFAULT_DATE_FORMAT, format_date, parse_date_label, parse_date_lenient};
use crate::z_order;

/// Time between automatic timeline steps.
pub const TIMELINE_STEP: Duration = Duration::from_secs(2);

/// Height reserved above the plot for the timeline labels.
const TIMELINE_HEIGHT: f64 = 30.0;

/// Playback position over the distinct dates of a dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    dates: Vec<f64>,
    index: usize,
    playing: bool,
    last_step: Option<Duration>,
}

impl Timeline {
    /// Creates a timeline over `dates` (seconds), deduplicated and sorted ascending.
    ///
    /// With `autoplay` the timeline starts playing from the first date; otherwise it rests on
    /// the last one.
    pub fn new(dates: impl IntoIterator<Item = f64>, autoplay: bool) -> Self {
        let mut dates: Vec<f64> = dates.into_iter().filter(|d| d.is_finite()).collect();
        dates.sort_by(f64::total_cmp);
        dates.dedup();
        let index = if autoplay {
            0
        } else {
            dates.len().saturating_sub(1)
        };
        Self {
            dates,
            index,
            playing: autoplay,
            last_step: None,
        }
    }

    /// Creates a timeline over the dates in `data`, parsed with `format`.
    ///
    /// Unparsable dates are skipped.
    pub fn from_data(data: &[StackedBarDatum], format: &str, autoplay: bool) -> Self {
        let dates = data.iter().filter_map(|d| parse_date_lenient(&d.date, format));
        Self::new(dates, autoplay)
    }

    /// The distinct dates, ascending.
    pub fn dates(&self) -> &[f64] {
        &self.dates
    }

    /// Index of the current date.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current date, if there are any.
    pub fn current(&self) -> Option<f64> {
        self.dates.get(self.index).copied()
    }

    /// Returns `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Moves to the next date, wrapping to the first after the last.
    pub fn advance(&mut self) {
        if self.dates.is_empty() {
            return;
        }
        self.index = if self.index + 1 < self.dates.len() {
            self.index + 1
        } else {
            0
        };
    }

    /// Starts or pauses playback.
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        self.last_step = None;
        tracing::debug!(playing = self.playing, "timeline playback toggled");
    }

    /// Advances once per [`TIMELINE_STEP`] elapsed while playing.
    ///
    /// The first tick after starting only records the clock. Returns `true` if the date changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        if !self.playing {
            return false;
        }
        let Some(mut last) = self.last_step else {
            self.last_step = Some(now);
            return false;
        };
        let mut changed = false;
        while now.saturating_sub(last) >= TIMELINE_STEP {
            self.advance();
            last += TIMELINE_STEP;
            changed = true;
        }
        self.last_step = Some(last);
        changed
    }

    /// Jumps to `date`. Returns `false` if the timeline does not contain it.
    pub fn seek(&mut self, date: f64) -> bool {
        match self.dates.iter().position(|d| *d == date) {
            Some(i) => {
                self.index = i;
                true
            }
            None => false,
        }
    }
}

/// Settings for an animated stacked bar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedBarChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// One color per segment.
    pub colors: Palette,
    /// Inner padding between bars, as a fraction of the step.
    pub bar_padding: f64,
    /// Optional bounds on the per-bar step.
    pub thickness: BandThickness,
    /// Draw category labels.
    pub show_labels: bool,
    /// Draw stack totals.
    pub show_values: bool,
    /// Draw value gridlines and tick labels.
    pub show_ticks: bool,
    /// Target tick count.
    pub tick_count: usize,
    /// Category labels longer than this are truncated.
    pub truncate_by: usize,
    /// Value prefix.
    pub prefix: String,
    /// Value suffix.
    pub suffix: String,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// strftime pattern of the datum dates.
    pub date_format: String,
    /// Reorder bars on every frame.
    pub auto_sort: bool,
    /// Key used by `auto_sort`.
    pub sort_by: StackSort,
    /// Draw the timeline's date labels above the plot.
    pub show_timeline: bool,
    /// Show only the current date in the timeline.
    pub show_only_active_date: bool,
    /// Horizontal reference lines.
    pub ref_values: Vec<ReferenceValue>,
}

impl Default for StackedBarChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::default(),
            colors: Palette::categorical(),
            bar_padding: DEFAULT_BAR_PADDING,
            thickness: BandThickness::default(),
            show_labels: true,
            show_values: true,
            show_ticks: true,
            tick_count: DEFAULT_TICK_COUNT,
            truncate_by: DEFAULT_TRUNCATE_BY,
            prefix: String::new(),
            suffix: String::new(),
            max_value: None,
            date_format: String::from(DEFAULT_DATE_FORMAT),
            auto_sort: true,
            sort_by: StackSort::Total,
            show_timeline: true,
            show_only_active_date: false,
            ref_values: Vec::new(),
        }
    }
}

impl StackedBarChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the segment colors.
    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    /// Sets the bar padding.
    pub fn with_bar_padding(mut self, padding: f64) -> Self {
        self.bar_padding = padding;
        self
    }

    /// Bounds the per-bar step.
    pub fn with_thickness(mut self, thickness: BandThickness) -> Self {
        self.thickness = thickness;
        self
    }

    /// Toggles category labels.
    pub fn with_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Toggles stack totals.
    pub fn with_values(mut self, show: bool) -> Self {
        self.show_values = show;
        self
    }

    /// Toggles gridlines and tick labels.
    pub fn with_ticks(mut self, show: bool) -> Self {
        self.show_ticks = show;
        self
    }

    /// Sets the value prefix and suffix.
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    /// Overrides the upper value bound.
    pub fn with_max_value(mut self, max: f64) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Sets the date pattern.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets whether and by what bars are reordered on each frame.
    pub fn with_auto_sort(mut self, auto_sort: bool, sort_by: StackSort) -> Self {
        self.auto_sort = auto_sort;
        self.sort_by = sort_by;
        self
    }

    /// Toggles the timeline labels.
    pub fn with_timeline(mut self, show: bool, only_active_date: bool) -> Self {
        self.show_timeline = show;
        self.show_only_active_date = only_active_date;
        self
    }

    /// Adds reference lines.
    pub fn with_ref_values(mut self, refs: Vec<ReferenceValue>) -> Self {
        self.ref_values = refs;
        self
    }

    /// A timeline over the dates of `data`.
    pub fn timeline(&self, data: &[StackedBarDatum], autoplay: bool) -> Timeline {
        Timeline::from_data(data, &self.date_format, autoplay)
    }

    /// Lays out the frame of `data` at the timeline's current date.
    pub fn layout(
        &self,
        data: &[StackedBarDatum],
        timeline: &Timeline,
        view: &ViewState,
    ) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        let Some(current) = timeline.current().filter(|_| !data.is_empty()) else {
            return ChartFrame::empty(settings.resolved_size(), theme);
        };
        let grays = theme.grays();
        let extra = if self.show_timeline {
            Margins::new(TIMELINE_HEIGHT, 0.0, 0.0, 0.0)
        } else {
            Margins::ZERO
        };
        let layout = settings.arrange(extra);
        let plot = layout.plot;

        // Stack extents over every date keep the axis still during playback.
        let sums = data.iter().flat_map(|d| {
            let (pos, neg) = d.size.iter().flatten().fold((0.0, 0.0), |(p, n), v| {
                if *v >= 0.0 { (p + v, n) } else { (p, n + v) }
            });
            [Some(pos), Some(neg)]
        });
        let extent = Extent::of(sums, &ExtentOptions::new().with_max(self.max_value));

        let frame: Vec<usize> = (0..data.len())
            .filter(|&i| {
                parse_date_label(&data[i].date, &self.date_format).is_ok_and(|t| t == current)
            })
            .collect();
        let order: Vec<usize> = if self.auto_sort {
            let stacks: Vec<&[Option<f64>]> = frame.iter().map(|&i| data[i].size.as_slice()).collect();
            stack_order(&stacks, self.sort_by, SortOrder::Desc)
                .into_iter()
                .map(|k| frame[k])
                .collect()
        } else {
            frame
        };

        let n = order.len();
        let band_extent = self.thickness.extent(plot.width(), n);
        let band = ScaleBand::new((plot.x0, plot.x0 + band_extent), n)
            .with_padding(self.bar_padding, 0.0);
        let y = ScaleLinearSpec::new((extent.min, extent.max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));
        tracing::debug!(
            date = %format_date(current, &self.date_format),
            bars = n,
            min = extent.min,
            max = extent.max,
            "stacked bar frame"
        );

        let y_scale = ScaleContinuous::Linear(y);
        let mut marks = Vec::new();
        if self.show_ticks {
            let (prefix, suffix) = (self.prefix.clone(), self.suffix.clone());
            marks.extend(
                AxisSpec::left()
                    .with_inline_labels(true)
                    .with_tick_count(self.tick_count)
                    .with_style(AxisStyle::themed(theme))
                    .with_grid(GridStyle::themed(theme))
                    .with_tick_formatter(move |v, _| {
                        format_number(Some(v), &prefix, &suffix, None)
                    })
                    .marks(&y_scale, plot),
            );
        }

        if self.show_timeline {
            let dates = timeline.dates();
            let step = plot.width() / dates.len().max(1) as f64;
            for (i, date) in dates.iter().enumerate() {
                let active = i == timeline.index();
                if self.show_only_active_date && !active {
                    continue;
                }
                let fill = if active { grays.gray_700 } else { grays.gray_400 };
                let text = TextMark::new(
                    Point::new(plot.x0 + step * (i as f64 + 0.5), plot.y0 - TIMELINE_HEIGHT * 0.5),
                    format_date(*date, &self.date_format),
                    fill,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Middle);
                marks.push(Mark::new(
                    MarkId::for_guide(role::TIMELINE_LABEL, i),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(text),
                ));
            }
        }

        let zero = y.map(0.0);
        let mut regions = Vec::new();
        let mut targets = Vec::new();
        for (slot, &index) in order.iter().enumerate() {
            let d = &data[index];
            let id = ItemId::Label(d.label.clone());
            let x0 = band.x(slot);
            let x1 = x0 + band.band_width();
            for (j, segment) in stack(&d.size, StackOffset::Zero).into_iter().enumerate() {
                let Some((start, end)) = segment else {
                    continue;
                };
                let color = self.colors.get(j);
                let opacity = match view.selected_color {
                    Some(selected) if selected == color => 1.0,
                    Some(_) => DIM_OPACITY,
                    None => DEFAULT_OPACITY,
                };
                let (a, b) = (y.map(start), y.map(end));
                let rect = Rect::new(x0, a.min(b), x1, a.max(b));
                regions.push((HitShape::Rect(rect), targets.len()));
                targets.push(HitTarget::datum(id.clone(), index).with_series(j));
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "bars stack a handful of segments"
                )]
                let part = j as u16;
                marks.push(
                    Mark::new(
                        MarkId::for_item(role::SEGMENT, &id, part),
                        z_order::SERIES_FILL,
                        MarkPayload::Rect(RectMark {
                            rect,
                            fill: color.into(),
                        }),
                    )
                    .with_opacity(opacity),
                );
            }

            let cx = band.center(slot);
            let total = d.total();
            if self.show_values {
                let top = d
                    .size
                    .iter()
                    .flatten()
                    .filter(|v| **v >= 0.0)
                    .sum::<f64>();
                let text = TextMark::new(
                    Point::new(cx, y.map(top) - 5.0),
                    format_number(Some(total), &self.prefix, &self.suffix, None),
                    grays.gray_700,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Alphabetic);
                marks.push(Mark::new(
                    MarkId::for_item(role::BAR_VALUE, &id, 0),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(text),
                ));
            }
            if self.show_labels {
                let text = TextMark::new(
                    Point::new(cx, zero + 15.0),
                    truncate_label(&d.label.text(), self.truncate_by),
                    grays.gray_700,
                )
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Alphabetic);
                marks.push(Mark::new(
                    MarkId::for_item(role::BAR_LABEL, &id, 0),
                    z_order::AXIS_LABELS,
                    MarkPayload::Text(text),
                ));
            }
        }

        let (lo, _) = y.domain();
        marks.push(baseline(y.map(lo.max(0.0)), plot, theme));
        if !self.ref_values.is_empty() {
            let x = ScaleContinuous::Linear(ScaleLinear::new((plot.x0, plot.x1), (plot.x0, plot.x1)));
            let guides = GuideContext {
                x: &x,
                y: &y_scale,
                plot,
                rtl: settings.rtl,
                theme,
            };
            marks.extend(guides.reference_y(&self.ref_values));
        }

        ChartFrame::new(
            settings.resolved_size(),
            plot,
            marks,
            HitIndex::Regions(regions),
            targets,
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    fn data() -> Vec<StackedBarDatum> {
        vec![
            StackedBarDatum::new("A", "2020", [Some(1.0), Some(2.0)]),
            StackedBarDatum::new("B", "2020", [Some(4.0), None]),
            StackedBarDatum::new("A", "2021", [Some(6.0), Some(4.0)]),
            StackedBarDatum::new("B", "2021", [Some(2.0), Some(1.0)]),
        ]
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn timeline_starts_at_the_end_unless_autoplaying() {
        let spec = StackedBarChartSpec::default();
        let t = spec.timeline(&data(), false);
        assert_eq!(t.dates().len(), 2);
        assert_eq!(t.index(), 1);
        assert!(!t.is_playing());
        let t = spec.timeline(&data(), true);
        assert_eq!(t.index(), 0);
        assert!(t.is_playing());
    }

    #[test]
    fn timeline_ticks_every_two_seconds_and_wraps() {
        let mut t = Timeline::new([3.0, 1.0, 2.0, 1.0], true);
        assert_eq!(t.dates(), [1.0, 2.0, 3.0]);
        assert!(!t.tick(secs(10)));
        assert!(!t.tick(secs(11)));
        assert!(t.tick(secs(12)));
        assert_eq!(t.index(), 1);
        assert!(t.tick(secs(16)));
        assert_eq!(t.index(), 0, "two steps wrap past the last date");
        t.toggle_play();
        assert!(!t.tick(secs(30)));
        assert!(t.seek(3.0));
        assert_eq!(t.current(), Some(3.0));
        assert!(!t.seek(9.0));
    }

    #[test]
    fn frame_shows_current_date_sorted_by_total() {
        let spec = StackedBarChartSpec::default();
        let data = data();
        let mut timeline = spec.timeline(&data, false);
        let frame = spec.layout(&data, &timeline, &ViewState::default());
        let labels: Vec<&str> = frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .filter(|t| *t == "A" || *t == "B")
            .collect();
        assert_eq!(labels, ["A", "B"], "2021 totals are 10 and 3");
        let grid = |frame: &ChartFrame| -> Vec<Mark> {
            frame
                .marks
                .iter()
                .filter(|m| m.z_index == z_order::GRID_LINES)
                .cloned()
                .collect()
        };
        let grid_2021 = grid(&frame);

        timeline.advance();
        let frame = spec.layout(&data, &timeline, &ViewState::default());
        let segments = frame
            .marks
            .iter()
            .filter(|m| matches!(m.payload, MarkPayload::Rect(_)))
            .count();
        assert_eq!(segments, 3, "the null segment is skipped");
        let first = frame.target(&ItemId::Label("B".into())).unwrap();
        assert_eq!(first.datum, Some(1));
        assert_eq!(grid(&frame), grid_2021, "the value axis is shared by all dates");
    }

    #[test]
    fn no_dates_means_empty_frame() {
        let spec = StackedBarChartSpec::default();
        let data = vec![StackedBarDatum::new("A", "soon", [Some(1.0)])];
        let timeline = spec.timeline(&data, false);
        assert!(spec.layout(&data, &timeline, &ViewState::default()).is_empty());
    }
}
