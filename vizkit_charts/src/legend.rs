// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color legends.
//!
//! Legends double as highlight controls: hovering an entry yields its color, which callers pass
//! to [`InteractionController::hover_color`](crate::InteractionController::hover_color) so the
//! chart dims every other category.
//!
//! Both legends follow a measure/arrange split: the `*Spec` is unpositioned, and `at` produces a
//! positioned legend that can generate marks and resolve pointer hits.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect, Shape};
use peniko::Color;
use vizkit_core::{
    Mark, MarkId, MarkPayload, PathMark, RectMark, TextAnchor, TextBaseline, TextMark,
};

use crate::color::{ColorScale, GRAY, Theme};
use crate::format::format_number;
use crate::interaction::DIM_OPACITY;
use crate::layout::Size;
use crate::measure::TextMeasurer;
use crate::role;
use crate::z_order;

/// Label used for the no-data entry.
pub const NA_LABEL: &str = "NA";

/// One legend entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    /// Entry text.
    pub label: String,
    /// Swatch color.
    pub color: Color,
}

impl LegendEntry {
    /// Creates an entry.
    pub fn new(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// An unpositioned categorical legend: swatches with labels, wrapped into rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorLegendSpec {
    /// Entries in display order.
    pub entries: Vec<LegendEntry>,
    /// Optional title above the entries.
    pub title: Option<String>,
    /// Swatch square size.
    pub swatch_size: f64,
    /// Gap between a swatch and its label.
    pub label_dx: f64,
    /// Horizontal gap between entries.
    pub entry_gap: f64,
    /// Vertical gap between rows.
    pub row_gap: f64,
    /// Label font size.
    pub font_size: f64,
    /// Theme for label text.
    pub theme: Theme,
}

impl ColorLegendSpec {
    /// Creates a legend from explicit entries.
    pub fn new(entries: Vec<LegendEntry>) -> Self {
        Self {
            entries,
            title: None,
            swatch_size: 12.0,
            label_dx: 4.0,
            entry_gap: 16.0,
            row_gap: 4.0,
            font_size: 12.0,
            theme: Theme::Light,
        }
    }

    /// One entry per color-scale key, in domain order.
    pub fn from_scale(scale: &ColorScale) -> Self {
        let entries = scale
            .domain()
            .iter()
            .enumerate()
            .map(|(i, key)| LegendEntry::new(key.clone(), scale.palette().get(i)))
            .collect();
        Self::new(entries)
    }

    /// Appends a no-data entry with the gray sentinel.
    pub fn with_na(mut self) -> Self {
        self.entries.push(LegendEntry::new(NA_LABEL, GRAY));
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the theme used for text and hover outlines.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    fn row_height(&self) -> f64 {
        self.swatch_size.max(self.font_size)
    }

    /// Positions the legend at `origin`, wrapping rows at `max_width`.
    ///
    /// An entry wider than `max_width` gets a row of its own.
    pub fn at(&self, origin: Point, max_width: f64, measurer: &impl TextMeasurer) -> ColorLegend {
        let row_height = self.row_height();
        let mut y = origin.y;
        let mut title = None;
        if let Some(text) = &self.title {
            let (w, h) = measurer.measure(text, self.font_size);
            title = Some((Point::new(origin.x, y), text.clone(), w));
            y += h + self.row_gap;
        }

        let mut x = origin.x;
        let mut entries = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (text_w, _) = measurer.measure(&entry.label, self.font_size);
            let width = self.swatch_size + self.label_dx + text_w;
            if x > origin.x && x + width - origin.x > max_width {
                x = origin.x;
                y += row_height + self.row_gap;
            }
            let swatch = Rect::from_origin_size(
                (x, y + (row_height - self.swatch_size) * 0.5),
                (self.swatch_size, self.swatch_size),
            );
            entries.push(PlacedEntry {
                entry: entry.clone(),
                swatch,
                label: Point::new(swatch.x1 + self.label_dx, y + row_height * 0.5),
                bounds: Rect::new(x, y, x + width, y + row_height),
            });
            x += width + self.entry_gap;
        }

        ColorLegend {
            title,
            entries,
            font_size: self.font_size,
            theme: self.theme,
        }
    }

    /// Size the legend needs when wrapped at `max_width`.
    pub fn measure(&self, max_width: f64, measurer: &impl TextMeasurer) -> Size {
        let b = self.at(Point::ORIGIN, max_width, measurer).bounds();
        Size::new(b.width(), b.height())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct PlacedEntry {
    entry: LegendEntry,
    swatch: Rect,
    label: Point,
    bounds: Rect,
}

/// A positioned categorical legend.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorLegend {
    title: Option<(Point, String, f64)>,
    entries: Vec<PlacedEntry>,
    font_size: f64,
    theme: Theme,
}

impl ColorLegend {
    /// Legend marks; entries other than `hovered` are dimmed.
    pub fn marks(&self, hovered: Option<Color>) -> Vec<Mark> {
        let text_fill = self.theme.grays().gray_700;
        let mut out = Vec::with_capacity(self.entries.len() * 2 + 1);
        if let Some((pos, text, _)) = &self.title {
            out.push(Mark::new(
                MarkId::for_guide(role::LEGEND_TITLE, 0),
                z_order::LEGEND_LABELS,
                MarkPayload::Text(
                    TextMark::new(*pos, text.clone(), text_fill)
                        .with_baseline(TextBaseline::Hanging)
                        .with_font_size(self.font_size),
                ),
            ));
        }
        for (i, placed) in self.entries.iter().enumerate() {
            let mut swatch = Mark::new(
                MarkId::for_guide(role::LEGEND_SWATCH, i),
                z_order::LEGEND_SWATCHES,
                MarkPayload::Rect(RectMark {
                    rect: placed.swatch,
                    fill: placed.entry.color.into(),
                }),
            );
            if hovered.is_some_and(|c| c != placed.entry.color) {
                swatch = swatch.with_opacity(DIM_OPACITY);
            }
            out.push(swatch);
            out.push(Mark::new(
                MarkId::for_guide(role::LEGEND_LABEL, i),
                z_order::LEGEND_LABELS,
                MarkPayload::Text(
                    TextMark::new(placed.label, placed.entry.label.clone(), text_fill)
                        .with_anchor(TextAnchor::Start)
                        .with_font_size(self.font_size),
                ),
            ));
        }
        out
    }

    /// Color of the entry under `p`.
    pub fn hit(&self, p: Point) -> Option<Color> {
        self.entries
            .iter()
            .find(|e| e.bounds.contains(p))
            .map(|e| e.entry.color)
    }

    /// Bounds of every entry and the title.
    pub fn bounds(&self) -> Rect {
        let mut rects = self.entries.iter().map(|e| e.bounds);
        let title = self.title.as_ref().map(|(pos, _, w)| {
            Rect::from_origin_size(*pos, (*w, self.font_size))
        });
        let first = title.or_else(|| rects.next());
        let Some(first) = first else {
            return Rect::ZERO;
        };
        rects.fold(first, |acc, r| acc.union(r))
    }
}

/// Width of a threshold legend.
pub const THRESHOLD_WIDTH: f64 = 360.0;
/// Width of the binned part when a no-data swatch is shown.
pub const THRESHOLD_WIDTH_WITH_NA: f64 = 320.0;
/// Left edge of the no-data swatch.
pub const THRESHOLD_NA_X: f64 = 335.0;

const BIN_HEIGHT: f64 = 8.0;
const LABEL_Y: f64 = 25.0;

/// A threshold legend: equal-width color bins with the thresholds between them.
///
/// `colors` should hold one more color than `thresholds`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdLegendSpec {
    /// Bin colors.
    pub colors: Vec<Color>,
    /// Bin boundaries.
    pub thresholds: Vec<f64>,
    /// No-data swatch color, if shown.
    pub na_color: Option<Color>,
    /// Theme for text and hover outlines.
    pub theme: Theme,
}

impl ThresholdLegendSpec {
    /// Creates a threshold legend.
    pub fn new(colors: Vec<Color>, thresholds: Vec<f64>) -> Self {
        Self {
            colors,
            thresholds,
            na_color: None,
            theme: Theme::Light,
        }
    }

    /// Shows a no-data swatch.
    pub fn with_na_color(mut self, color: Color) -> Self {
        self.na_color = Some(color);
        self
    }

    /// Sets the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn bins_width(&self) -> f64 {
        if self.na_color.is_some() {
            THRESHOLD_WIDTH_WITH_NA
        } else {
            THRESHOLD_WIDTH
        }
    }

    fn bin_rects(&self, origin: Point) -> Vec<(Rect, Color)> {
        let n = self.colors.len();
        if n == 0 {
            return Vec::new();
        }
        let bin = self.bins_width() / n as f64;
        let mut out: Vec<(Rect, Color)> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let x = origin.x + i as f64 * bin + 1.0;
                (
                    Rect::new(x, origin.y + 1.0, x + bin - 2.0, origin.y + 1.0 + BIN_HEIGHT),
                    c,
                )
            })
            .collect();
        if let Some(na) = self.na_color {
            let x = origin.x + THRESHOLD_NA_X;
            out.push((
                Rect::new(x, origin.y + 1.0, x + 24.0, origin.y + 1.0 + BIN_HEIGHT),
                na,
            ));
        }
        out
    }

    /// Legend marks at `origin`; the bin matching `hovered` gets a dark outline.
    pub fn marks(&self, origin: Point, hovered: Option<Color>) -> Vec<Mark> {
        let grays = self.theme.grays();
        let mut out = Vec::new();
        for (i, (rect, color)) in self.bin_rects(origin).into_iter().enumerate() {
            out.push(Mark::new(
                MarkId::for_guide(role::LEGEND_SWATCH, i),
                z_order::LEGEND_SWATCHES,
                MarkPayload::Rect(RectMark {
                    rect,
                    fill: color.into(),
                }),
            ));
            if hovered == Some(color) {
                out.push(Mark::new(
                    MarkId::for_guide(role::LEGEND_SWATCH, (1 << 24) | i),
                    z_order::LEGEND_SWATCHES,
                    MarkPayload::Path(PathMark::stroked(rect.to_path(0.1), grays.gray_700, 1.0)),
                ));
            }
        }
        let bin = self.bins_width() / self.colors.len().max(1) as f64;
        for (i, t) in self.thresholds.iter().enumerate() {
            out.push(Mark::new(
                MarkId::for_guide(role::LEGEND_LABEL, i),
                z_order::LEGEND_LABELS,
                MarkPayload::Text(
                    TextMark::new(
                        Point::new(origin.x + (i + 1) as f64 * bin, origin.y + LABEL_Y),
                        format_number(Some(*t), "", "", None),
                        grays.gray_700,
                    )
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Alphabetic),
                ),
            ));
        }
        if self.na_color.is_some() {
            out.push(Mark::new(
                MarkId::for_guide(role::LEGEND_LABEL, self.thresholds.len()),
                z_order::LEGEND_LABELS,
                MarkPayload::Text(
                    TextMark::new(
                        Point::new(origin.x + THRESHOLD_NA_X + 2.5, origin.y + LABEL_Y),
                        NA_LABEL,
                        grays.gray_700,
                    )
                    .with_baseline(TextBaseline::Alphabetic),
                ),
            ));
        }
        out
    }

    /// Color of the bin under `p` for a legend at `origin`.
    pub fn hit(&self, origin: Point, p: Point) -> Option<Color> {
        self.bin_rects(origin)
            .into_iter()
            .find(|(r, _)| r.contains(p))
            .map(|(_, c)| c)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::color::Palette;
    use crate::measure::HeuristicTextMeasurer;
    use alloc::vec;

    #[test]
    fn entries_wrap_into_rows() {
        let scale = ColorScale::new(["Africa", "Americas", "Asia", "Europe"], Palette::categorical());
        let spec = ColorLegendSpec::from_scale(&scale);
        let one_row = spec.measure(1000.0, &HeuristicTextMeasurer);
        let wrapped = spec.measure(120.0, &HeuristicTextMeasurer);
        assert!(wrapped.height > one_row.height, "narrow legends wrap");
        assert!(wrapped.width <= one_row.width);
    }

    #[test]
    fn hovering_an_entry_yields_its_color() {
        let scale = ColorScale::new(["A", "B"], Palette::categorical());
        let legend = ColorLegendSpec::from_scale(&scale)
            .with_na()
            .at(Point::ORIGIN, 1000.0, &HeuristicTextMeasurer);
        let marks = legend.marks(None);
        assert_eq!(marks.len(), 6, "swatch and label per entry");
        let MarkPayload::Rect(na) = &marks[4].payload else {
            panic!("expected the NA swatch");
        };
        assert_eq!(legend.hit(na.rect.center()), Some(GRAY));
        assert_eq!(legend.hit(Point::new(-5.0, -5.0)), None);

        let dimmed = legend.marks(Some(scale.palette().get(0)));
        assert_eq!(dimmed[0].opacity, 1.0);
        assert_eq!(dimmed[2].opacity, DIM_OPACITY);
    }

    #[test]
    fn threshold_bins_shrink_for_na() {
        let colors = vec![Color::BLACK, Color::WHITE, GRAY, Color::TRANSPARENT];
        let plain = ThresholdLegendSpec::new(colors.clone(), vec![1.0, 2.0, 3.0]);
        let bins = plain.bin_rects(Point::ORIGIN);
        assert!((bins[3].0.x1 - 359.0).abs() < 1e-9, "last bin ends at 360 - 1");

        let na = ThresholdLegendSpec::new(colors, vec![1.0, 2.0, 3.0]).with_na_color(GRAY);
        let bins = na.bin_rects(Point::ORIGIN);
        assert_eq!(bins.len(), 5);
        assert!((bins[3].0.x1 - 319.0).abs() < 1e-9);
        assert_eq!(bins[4].0.x0, THRESHOLD_NA_X);
        assert_eq!(na.hit(Point::ORIGIN, Point::new(340.0, 5.0)), Some(GRAY));
    }

    #[test]
    fn threshold_labels_sit_on_bin_boundaries() {
        let spec = ThresholdLegendSpec::new(vec![Color::BLACK, Color::WHITE], vec![1500.0]);
        let marks = spec.marks(Point::ORIGIN, None);
        let label = marks
            .iter()
            .find_map(|m| match &m.payload {
                MarkPayload::Text(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(label.text, "1.5K");
        assert_eq!(label.pos, Point::new(180.0, 25.0));
    }
}
