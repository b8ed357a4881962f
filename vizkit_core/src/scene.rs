// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-to-frame mark diffing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Rect;

use crate::mark::{Mark, MarkId};

/// A change between two frames.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkDiff {
    /// A mark that was not present in the previous frame.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Render order.
        z_index: i32,
        /// Geometric bounds, if known.
        bounds: Option<Rect>,
        /// New mark.
        new: Box<Mark>,
    },
    /// A mark whose geometry, paint, opacity or order changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Previous render order.
        old_z_index: i32,
        /// New render order.
        new_z_index: i32,
        /// Previous mark.
        old: Box<Mark>,
        /// New mark.
        new: Box<Mark>,
    },
    /// A mark that is no longer present.
    Exit {
        /// Mark id.
        id: MarkId,
        /// Last known mark.
        old: Box<Mark>,
    },
}

impl MarkDiff {
    /// Returns the id of the mark this diff applies to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id, .. } => *id,
        }
    }
}

/// Retains the previous frame and diffs new frames against it.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks in the current frame.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if the current frame is empty.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Looks up a mark of the current frame.
    pub fn get(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Replaces the current frame with `marks` and returns the changes.
    ///
    /// Enter and update diffs follow the order of `marks`; exit diffs follow id order. When two
    /// marks share an id, the later one wins.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut diffs = Vec::new();
        let mut seen: HashSet<MarkId> = HashSet::with_capacity(marks.len());
        let mut next: HashMap<MarkId, Mark> = HashMap::with_capacity(marks.len());

        for mark in marks {
            if !seen.insert(mark.id) {
                tracing::debug!(id = mark.id.0, "duplicate mark id in frame; keeping the last");
                diffs.retain(|d: &MarkDiff| d.id() != mark.id);
            }
            match self.marks.get(&mark.id) {
                None => diffs.push(MarkDiff::Enter {
                    id: mark.id,
                    z_index: mark.z_index,
                    bounds: mark.bounds(),
                    new: Box::new(mark.clone()),
                }),
                Some(old) if *old != mark => diffs.push(MarkDiff::Update {
                    id: mark.id,
                    old_z_index: old.z_index,
                    new_z_index: mark.z_index,
                    old: Box::new(old.clone()),
                    new: Box::new(mark.clone()),
                }),
                Some(_) => {}
            }
            next.insert(mark.id, mark);
        }

        let mut exits: Vec<MarkId> = self
            .marks
            .keys()
            .filter(|id| !next.contains_key(*id))
            .copied()
            .collect();
        exits.sort_unstable();
        for id in exits {
            if let Some(old) = self.marks.remove(&id) {
                diffs.push(MarkDiff::Exit {
                    id,
                    old: Box::new(old),
                });
            }
        }

        self.marks = next;
        diffs
    }

    /// Returns the current frame sorted by `(z_index, id)`.
    pub fn sorted_marks(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::mark::{MarkPayload, RectMark};
    use alloc::vec;
    use peniko::Brush;

    fn rect_mark(id: u64, x: f64) -> Mark {
        Mark::new(
            MarkId(id),
            0,
            MarkPayload::Rect(RectMark {
                rect: Rect::new(x, 0.0, x + 1.0, 1.0),
                fill: Brush::default(),
            }),
        )
    }

    #[test]
    fn tick_reports_enter_update_exit() {
        let mut scene = Scene::new();
        let first = scene.tick(vec![rect_mark(1, 0.0), rect_mark(2, 0.0)]);
        assert_eq!(first.len(), 2);
        assert!(
            first.iter().all(|d| matches!(d, MarkDiff::Enter { .. })),
            "first frame only enters"
        );

        let second = scene.tick(vec![rect_mark(1, 0.0), rect_mark(3, 0.0), rect_mark(2, 5.0)]);
        assert_eq!(second.len(), 2, "unchanged marks produce no diff");
        assert!(matches!(second[0], MarkDiff::Enter { id: MarkId(3), .. }));
        assert!(matches!(second[1], MarkDiff::Update { id: MarkId(2), .. }));

        let third = scene.tick(vec![rect_mark(3, 0.0)]);
        let exits: Vec<_> = third.iter().map(MarkDiff::id).collect();
        assert_eq!(exits, vec![MarkId(1), MarkId(2)]);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn opacity_changes_are_updates() {
        let mut scene = Scene::new();
        scene.tick(vec![rect_mark(1, 0.0)]);
        let diffs = scene.tick(vec![rect_mark(1, 0.0).with_opacity(0.3)]);
        assert!(
            matches!(diffs.as_slice(), [MarkDiff::Update { .. }]),
            "dimming a mark must reach the renderer"
        );
    }
}
