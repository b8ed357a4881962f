// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extents plus stable item identifiers.

extern crate alloc;

use alloc::vec::Vec;

use vizkit_core::{Datum, ItemId, Label};

use crate::extent::{Extent, ExtentOptions};

/// How items are identified across recomputes.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum IdStrategy {
    /// Identify items by position in the input array.
    ///
    /// Identifiers only survive recomputes over identically ordered input.
    #[default]
    Positional,
    /// Identify items by label and lay them out in this order.
    ///
    /// Labels missing from the data still get a (label-only) slot; data whose label is not
    /// listed gets none.
    LabelOrder(Vec<Label>),
}

/// Options for [`normalize`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeOptions {
    /// Extent overrides and zero inclusion.
    pub extent: ExtentOptions,
    /// Identifier strategy.
    pub ids: IdStrategy,
}

impl NormalizeOptions {
    /// Sets the extent options.
    pub fn with_extent(mut self, extent: ExtentOptions) -> Self {
        self.extent = extent;
        self
    }

    /// Sets the identifier strategy.
    pub fn with_ids(mut self, ids: IdStrategy) -> Self {
        self.ids = ids;
        self
    }
}

/// One ordered layout position.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    /// Identifier of the item in this slot.
    pub id: ItemId,
    /// Label drawn for this slot.
    pub label: Label,
    /// Index of the datum filling this slot, or `None` for a label-only slot.
    pub datum: Option<usize>,
}

/// Output of [`normalize`].
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    /// Effective value extent.
    pub extent: Extent,
    /// Layout positions in order.
    pub slots: Vec<Slot>,
    ids: Vec<ItemId>,
}

impl Normalized {
    /// Effective minimum.
    pub fn min(&self) -> f64 {
        self.extent.min
    }

    /// Effective maximum.
    pub fn max(&self) -> f64 {
        self.extent.max
    }

    /// Identifier of the datum at `index` in the input array.
    pub fn id_of(&self, index: usize) -> Option<&ItemId> {
        self.ids.get(index)
    }

    /// Position of the slot holding `id`.
    pub fn slot_of(&self, id: &ItemId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == *id)
    }

    /// Slots filled by a datum, as `(slot index, datum index)`.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.datum.map(|d| (i, d)))
    }
}

/// Computes the value extent of `data` and assigns identifiers and layout slots.
///
/// The extent covers every datum, including those left without a slot by a label order.
pub fn normalize<D: Datum>(data: &[D], options: &NormalizeOptions) -> Normalized {
    let extent = Extent::of(data.iter().flat_map(|d| d.values()), &options.extent);

    match &options.ids {
        IdStrategy::Positional => {
            let ids: Vec<ItemId> = (0..data.len()).map(ItemId::Index).collect();
            let slots = data
                .iter()
                .enumerate()
                .map(|(i, d)| Slot {
                    id: ItemId::Index(i),
                    label: d.label().cloned().unwrap_or(Label::Number(i as f64)),
                    datum: Some(i),
                })
                .collect();
            Normalized { extent, slots, ids }
        }
        IdStrategy::LabelOrder(order) => {
            let ids: Vec<ItemId> = data
                .iter()
                .enumerate()
                .map(|(i, d)| match d.label() {
                    Some(l) => ItemId::Label(l.clone()),
                    None => ItemId::Index(i),
                })
                .collect();
            let slots = order
                .iter()
                .map(|label| {
                    let datum = data.iter().position(|d| d.label() == Some(label));
                    if datum.is_none() {
                        tracing::debug!(%label, "label order entry has no data; label-only slot");
                    }
                    Slot {
                        id: ItemId::Label(label.clone()),
                        label: label.clone(),
                        datum,
                    }
                })
                .collect();
            for d in data {
                if let Some(l) = d.label()
                    && !order.contains(l)
                {
                    tracing::warn!(label = %l, "datum label missing from label order; not laid out");
                }
            }
            Normalized { extent, slots, ids }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;
    use vizkit_core::{BarDatum, GroupedBarDatum};

    fn bars() -> Vec<BarDatum> {
        vec![
            BarDatum::new("A", Some(5.0)),
            BarDatum::new("B", Some(-3.0)),
            BarDatum::new("C", None),
        ]
    }

    #[test]
    fn positional_ids_follow_array_order() {
        let n = normalize(&bars(), &NormalizeOptions::default());
        assert_eq!(n.extent, Extent::new(-3.0, 5.0));
        assert_eq!(n.slots.len(), 3, "null sizes keep their slot");
        assert_eq!(n.id_of(1), Some(&ItemId::Index(1)));
        assert_eq!(n.slots[2].label, Label::from("C"));
    }

    #[test]
    fn label_order_controls_slots() {
        let order = vec![Label::from("C"), Label::from("Z"), Label::from("A")];
        let opts = NormalizeOptions::default().with_ids(IdStrategy::LabelOrder(order));
        let n = normalize(&bars(), &opts);

        let labels: Vec<_> = n.slots.iter().map(|s| s.label.text()).collect();
        assert_eq!(labels, vec!["C", "Z", "A"]);
        assert_eq!(n.slots[1].datum, None, "Z has no data");
        assert_eq!(n.slots[2].datum, Some(0));
        assert_eq!(n.id_of(1), Some(&ItemId::Label(Label::from("B"))));
        assert_eq!(n.slot_of(&ItemId::Label(Label::from("B"))), None);
        assert_eq!(n.extent, Extent::new(-3.0, 5.0), "B still counts toward the extent");
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let data = vec![
            GroupedBarDatum::new("x", [Some(5.0), None, Some(3.0)]),
            GroupedBarDatum::new("y", [Some(1.0), Some(2.0), None]),
        ];
        let opts = NormalizeOptions::default();
        assert_eq!(normalize(&data, &opts), normalize(&data, &opts));
    }

    #[test]
    fn filled_skips_label_only_slots() {
        let order = vec![Label::from("B"), Label::from("Q")];
        let opts = NormalizeOptions::default().with_ids(IdStrategy::LabelOrder(order));
        let n = normalize(&bars(), &opts);
        let filled: Vec<_> = n.filled().collect();
        assert_eq!(filled, vec![(0, 1)]);
    }
}
