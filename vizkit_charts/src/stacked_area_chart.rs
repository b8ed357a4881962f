// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked area chart over dates.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{BezPath, Point};
use peniko::Color;
use vizkit_core::{
    AreaDatum, HighlightArea, ItemId, Label, Mark, MarkId, MarkPayload, PathMark, ReferenceValue,
};
use vizkit_transforms::{Extent, ExtentOptions, StackOffset, stack};

use crate::axis::{AxisSpec, AxisStyle, GridStyle};
use crate::chart_spec::{ChartSettings, DEFAULT_TICK_COUNT};
use crate::color::{ColorScale, Palette};
use crate::format::format_number;
use crate::frame::{ChartFrame, HitTarget};
use crate::guides::{GuideContext, baseline};
use crate::hit::{Bisector, HitIndex};
use crate::interaction::{DIM_OPACITY, ViewState};
use crate::layout::Margins;
use crate::legend::ColorLegendSpec;
use crate::role;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleContinuous, ScaleLinearSpec, ScaleTime};
use crate::time::{DEFAULT_DATE_FORMAT, parse_date_lenient};
use crate::z_order;

/// One date after parsing, with its stacked `(lower, upper)` bounds per series.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaRow {
    /// Index of the datum in the input array.
    pub index: usize,
    /// Seconds since the Unix epoch.
    pub date: f64,
    /// Stacked bounds, one pair per series.
    pub bounds: Vec<(f64, f64)>,
}

/// Settings for a stacked area chart.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedAreaChartSpec {
    /// Size, margins, theme and interaction settings.
    pub chart: ChartSettings,
    /// Series colors, by series index.
    pub colors: Palette,
    /// Series names, by series index; used by the legend.
    pub color_domain: Vec<String>,
    /// Legend title.
    pub color_legend_title: Option<String>,
    /// strftime pattern of the datum dates.
    pub date_format: String,
    /// Target tick count on the date axis.
    pub x_tick_count: usize,
    /// Target tick count on the value axis.
    pub y_tick_count: usize,
    /// Lower bound override.
    pub min_value: Option<f64>,
    /// Upper bound override.
    pub max_value: Option<f64>,
    /// Horizontal reference lines.
    pub ref_values: Vec<ReferenceValue>,
    /// Shaded date range; each end open when absent.
    pub highlight_area: (Option<Label>, Option<Label>),
    /// Shaded range fill; theme panel gray when absent.
    pub highlight_area_color: Option<Color>,
}

impl Default for StackedAreaChartSpec {
    fn default() -> Self {
        Self {
            chart: ChartSettings::with_default_margins(Margins::new(20.0, 25.0, 30.0, 20.0)),
            colors: Palette::categorical(),
            color_domain: Vec::new(),
            color_legend_title: None,
            date_format: String::from(DEFAULT_DATE_FORMAT),
            x_tick_count: 10,
            y_tick_count: DEFAULT_TICK_COUNT,
            min_value: None,
            max_value: None,
            ref_values: Vec::new(),
            highlight_area: (None, None),
            highlight_area_color: None,
        }
    }
}

impl StackedAreaChartSpec {
    /// Sets the shared chart settings.
    pub fn with_chart(mut self, chart: ChartSettings) -> Self {
        self.chart = chart;
        self
    }

    /// Sets the series colors and names.
    pub fn with_colors(mut self, colors: Palette, domain: Vec<String>) -> Self {
        self.colors = colors;
        self.color_domain = domain;
        self
    }

    /// Sets the legend title.
    pub fn with_color_legend_title(mut self, title: impl Into<String>) -> Self {
        self.color_legend_title = Some(title.into());
        self
    }

    /// Sets the date pattern.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the tick count targets.
    pub fn with_tick_counts(mut self, x: usize, y: usize) -> Self {
        self.x_tick_count = x;
        self.y_tick_count = y;
        self
    }

    /// Overrides the value extent bounds.
    pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Sets the reference lines.
    pub fn with_ref_values(mut self, refs: Vec<ReferenceValue>) -> Self {
        self.ref_values = refs;
        self
    }

    /// Shades a date range.
    pub fn with_highlight_area(
        mut self,
        from: Option<Label>,
        to: Option<Label>,
        color: Option<Color>,
    ) -> Self {
        self.highlight_area = (from, to);
        self.highlight_area_color = color;
        self
    }

    /// The series legend, in series order.
    pub fn legend(&self) -> ColorLegendSpec {
        let scale = ColorScale::new(self.color_domain.iter().cloned(), self.colors.clone());
        let legend = ColorLegendSpec::from_scale(&scale).with_theme(self.chart.theme);
        match &self.color_legend_title {
            Some(title) => legend.with_title(title.clone()),
            None => legend,
        }
    }

    /// Parsed rows sorted by date, each stacked from zero.
    ///
    /// Missing series values stack as zero so every area stays closed.
    pub fn rows(&self, data: &[AreaDatum]) -> Vec<AreaRow> {
        let series = data.iter().map(|d| d.y.len()).max().unwrap_or(0);
        let mut rows: Vec<AreaRow> = data
            .iter()
            .enumerate()
            .filter_map(|(index, d)| {
                let date = parse_date_lenient(&d.date, &self.date_format)?;
                let values: Vec<Option<f64>> = (0..series)
                    .map(|j| {
                        let v = d.y.get(j).copied().flatten().filter(|v| v.is_finite());
                        Some(v.unwrap_or(0.0))
                    })
                    .collect();
                let bounds = stack(&values, StackOffset::Zero)
                    .into_iter()
                    .map(|b| b.unwrap_or((0.0, 0.0)))
                    .collect();
                Some(AreaRow {
                    index,
                    date,
                    bounds,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.date.total_cmp(&b.date));
        rows
    }

    /// Lays out `data`.
    pub fn layout(&self, data: &[AreaDatum], view: &ViewState) -> ChartFrame {
        let settings = &self.chart;
        let theme = settings.theme;
        let rows = self.rows(data);
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return ChartFrame::empty(settings.resolved_size(), theme);
        };
        let grays = theme.grays();
        let plot = settings.arrange(Margins::ZERO).plot;
        let series = first.bounds.len();

        let x = ScaleTime::new((first.date, last.date), (plot.x0, plot.x1));
        let extent = Extent::of(
            rows.iter()
                .flat_map(|r| r.bounds.iter().flat_map(|&(a, b)| [Some(a), Some(b)])),
            &ExtentOptions::new()
                .with_min(self.min_value)
                .with_max(self.max_value),
        );
        let y = ScaleLinearSpec::new((extent.min, extent.max))
            .with_nice(true)
            .instantiate((plot.y1, plot.y0));
        tracing::debug!(rows = rows.len(), series, y_domain = ?y.domain(), "stacked area layout");

        let x_scale = ScaleContinuous::Time(x);
        let y_scale = ScaleContinuous::Linear(y);
        let guides = GuideContext {
            x: &x_scale,
            y: &y_scale,
            plot,
            rtl: settings.rtl,
            theme,
        };
        let mut marks = Vec::new();

        let parse_bound = |label: &Option<Label>| {
            label
                .as_ref()
                .and_then(|l| parse_date_lenient(l, &self.date_format))
        };
        let area = HighlightArea::x_range(
            parse_bound(&self.highlight_area.0),
            parse_bound(&self.highlight_area.1),
        );
        let area_fill = self.highlight_area_color.unwrap_or(grays.gray_300);
        marks.extend(guides.highlight_area(&area, area_fill));

        marks.extend(
            AxisSpec::left()
                .with_tick_count(self.y_tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_grid(GridStyle::themed(theme))
                .with_tick_formatter(|v, _| format_number(Some(v), "", "", None))
                .marks(&y_scale, plot),
        );
        marks.extend(
            AxisSpec::bottom()
                .with_tick_count(self.x_tick_count)
                .with_style(AxisStyle::themed(theme))
                .with_date_format(self.date_format.clone())
                .marks(&x_scale, plot),
        );

        for j in 0..series {
            let color = self.colors.get(j);
            let mut path = BezPath::new();
            for (i, row) in rows.iter().enumerate() {
                let p = Point::new(x.map(row.date), y.map(row.bounds[j].1));
                if i == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
            for row in rows.iter().rev() {
                path.line_to(Point::new(x.map(row.date), y.map(row.bounds[j].0)));
            }
            path.close_path();
            let opacity = match view.selected_color {
                Some(selected) if selected == color => 1.0,
                Some(_) => DIM_OPACITY,
                None => 1.0,
            };
            marks.push(
                Mark::new(
                    MarkId::for_guide(role::AREA, j),
                    z_order::SERIES_FILL,
                    MarkPayload::Path(PathMark::filled(path, color)),
                )
                .with_opacity(opacity),
            );
        }
        marks.push(baseline(y.map(y.domain().0.max(0.0)), plot, theme));

        let hovered = view
            .hovered
            .as_ref()
            .and_then(|h| rows.iter().find(|r| *h == ItemId::Index(r.index)));
        if let Some(row) = hovered {
            let px = x.map(row.date);
            marks.push(
                RuleMarkSpec::vertical(MarkId::for_guide(role::HOVER_RULE, 0), px, plot.y0, plot.y1)
                    .with_stroke(grays.gray_700, 1.0)
                    .with_dash(Some((4.0, 4.0)))
                    .with_z_index(z_order::HOVER)
                    .mark(),
            );
        }
        marks.extend(guides.reference_y(&self.ref_values));

        let bisector = Bisector::new(rows.iter().map(|r| x.map(r.date)).collect());
        let targets = rows
            .iter()
            .map(|r| HitTarget::datum(ItemId::Index(r.index), r.index))
            .collect();
        ChartFrame::new(
            settings.resolved_size(),
            plot,
            marks,
            HitIndex::Bisect(bisector),
            targets,
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use kurbo::Shape;

    fn data() -> Vec<AreaDatum> {
        vec![
            AreaDatum::new("2021", [Some(2.0), Some(3.0)]),
            AreaDatum::new("2020", [Some(1.0), None]),
            AreaDatum::new("2022", [Some(4.0), Some(1.0)]),
        ]
    }

    #[test]
    fn rows_are_sorted_and_stacked_from_zero() {
        let rows = StackedAreaChartSpec::default().rows(&data());
        let dates: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(dates, vec![1, 0, 2]);
        assert_eq!(rows[0].bounds, vec![(0.0, 1.0), (1.0, 1.0)]);
        assert_eq!(rows[1].bounds, vec![(0.0, 2.0), (2.0, 5.0)]);
    }

    #[test]
    fn each_series_is_one_filled_area_in_its_color() {
        let spec = StackedAreaChartSpec::default();
        let frame = spec.layout(&data(), &ViewState::default());
        let fills: Vec<_> = frame
            .marks
            .iter()
            .filter_map(|m| match &m.payload {
                MarkPayload::Path(p)
                    if m.id == MarkId::for_guide(role::AREA, 0)
                        || m.id == MarkId::for_guide(role::AREA, 1) =>
                {
                    Some(p.fill.clone())
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![spec.colors.get(0).into(), spec.colors.get(1).into()]
        );
    }

    #[test]
    fn top_series_reaches_the_stack_total() {
        let frame = StackedAreaChartSpec::default().layout(&data(), &ViewState::default());
        let top = frame
            .marks
            .iter()
            .find_map(|m| match &m.payload {
                MarkPayload::Path(p) if m.id == MarkId::for_guide(role::AREA, 1) => Some(p),
                _ => None,
            })
            .unwrap();
        // The niced domain is 0..5 and the 2021 stack totals 5.
        assert!((top.path.bounding_box().y0 - frame.plot.y0).abs() < 1e-9);
    }

    #[test]
    fn hover_bisects_dates() {
        let frame = StackedAreaChartSpec::default().layout(&data(), &ViewState::default());
        let p = Point::new(frame.plot.x1 + 10.0, frame.plot.y1);
        assert_eq!(frame.hit_test(p).unwrap().datum, Some(2));
    }

    #[test]
    fn legend_follows_series_names() {
        let spec = StackedAreaChartSpec::default()
            .with_colors(Palette::categorical(), vec!["Urban".into(), "Rural".into()]);
        let labels: Vec<String> = spec.legend().entries.into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Urban", "Rural"]);
    }
}
