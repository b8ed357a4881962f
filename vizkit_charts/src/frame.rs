// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout output shared by every chart family.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use vizkit_core::{ItemId, Mark, MarkId, MarkPayload, TextAnchor, TextMark};

use crate::color::Theme;
use crate::hit::HitIndex;
use crate::layout::Size;
use crate::role;
use crate::z_order;

/// Text shown in place of an empty chart.
pub const EMPTY_STATE_TEXT: &str = "No data available";

/// A hoverable item of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HitTarget {
    /// Identifier of the item.
    pub id: ItemId,
    /// Index of the datum in the input array, or `None` for label-only items.
    pub datum: Option<usize>,
    /// Sub-series index for multi-value datums (grouped bars, dumbbell dots).
    pub series: Option<usize>,
}

impl HitTarget {
    /// A target for the datum at `index`.
    pub fn datum(id: ItemId, index: usize) -> Self {
        Self {
            id,
            datum: Some(index),
            series: None,
        }
    }

    /// Narrows the target to one sub-series.
    pub fn with_series(mut self, series: usize) -> Self {
        self.series = Some(series);
        self
    }
}

/// One laid-out chart.
#[derive(Clone, Debug, Default)]
pub struct ChartFrame {
    /// Outer chart size.
    pub size: Size,
    /// Plot rectangle inside the margins.
    pub plot: Rect,
    /// Marks in emission order.
    pub marks: Vec<Mark>,
    /// Pointer resolution; indices refer to `targets`.
    pub hit: HitIndex,
    /// Hoverable items.
    pub targets: Vec<HitTarget>,
    empty: bool,
}

impl ChartFrame {
    /// A frame with marks and hit targets.
    pub fn new(
        size: Size,
        plot: Rect,
        marks: Vec<Mark>,
        hit: HitIndex,
        targets: Vec<HitTarget>,
    ) -> Self {
        Self {
            size,
            plot,
            marks,
            hit,
            targets,
            empty: false,
        }
    }

    /// The placeholder frame for a chart without data.
    pub fn empty(size: Size, theme: Theme) -> Self {
        tracing::debug!(width = size.width, height = size.height, "empty data; placeholder frame");
        let center = Point::new(size.width * 0.5, size.height * 0.5);
        let text = TextMark::new(center, EMPTY_STATE_TEXT, theme.grays().gray_600)
            .with_anchor(TextAnchor::Middle)
            .with_font_size(14.0);
        Self {
            size,
            plot: Rect::from_origin_size(Point::ORIGIN, (size.width, size.height)),
            marks: vec![Mark::new(
                MarkId::for_guide(role::EMPTY_STATE, 0),
                z_order::ANNOTATIONS,
                MarkPayload::Text(text),
            )],
            hit: HitIndex::Empty,
            targets: Vec::new(),
            empty: true,
        }
    }

    /// Returns `true` for the empty-state placeholder.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Target under `p`, if any.
    pub fn hit_test(&self, p: Point) -> Option<&HitTarget> {
        self.hit.hit(p).and_then(|i| self.targets.get(i))
    }

    /// Target for an item id.
    pub fn target(&self, id: &ItemId) -> Option<&HitTarget> {
        self.targets.iter().find(|t| t.id == *id)
    }

    /// Marks ordered by z-index, keeping emission order within a layer.
    pub fn sorted_marks(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.iter().collect();
        out.sort_by_key(|m| m.z_index);
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn empty_frame_is_a_single_centered_text() {
        let frame = ChartFrame::empty(Size::new(200.0, 100.0), Theme::Light);
        assert!(frame.is_empty());
        let [mark] = frame.marks.as_slice() else {
            panic!("expected one mark, got {}", frame.marks.len());
        };
        let MarkPayload::Text(text) = &mark.payload else {
            panic!("expected text");
        };
        assert_eq!(text.text, EMPTY_STATE_TEXT);
        assert_eq!(text.pos, Point::new(100.0, 50.0));
        assert_eq!(frame.hit_test(Point::new(100.0, 50.0)), None);
    }
}
