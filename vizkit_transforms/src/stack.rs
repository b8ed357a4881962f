// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack offsets for stacked bars and areas.

extern crate alloc;

use alloc::vec::Vec;

use crate::table::SortOrder;

/// Stack baseline offset mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackOffset {
    /// Stack positive values upward and negative values downward from 0.
    #[default]
    Zero,
    /// Like [`StackOffset::Zero`], scaled so the absolute values of each stack sum to 1.
    Normalize,
}

/// Ordering key for the stacks of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackSort {
    /// Order by the sum of all segments.
    Total,
    /// Order by the value of one segment.
    Segment(usize),
}

/// Computes `(start, end)` offsets for each segment of one stack.
///
/// Missing and non-finite segments produce `None` and leave their siblings where they would be
/// without them.
pub fn stack(values: &[Option<f64>], offset: StackOffset) -> Vec<Option<(f64, f64)>> {
    let scale = match offset {
        StackOffset::Zero => 1.0,
        StackOffset::Normalize => {
            let sum: f64 = values
                .iter()
                .flatten()
                .filter(|v| v.is_finite())
                .map(|v| v.abs())
                .sum();
            if sum > 0.0 { 1.0 / sum } else { 0.0 }
        }
    };

    let mut pos = 0.0;
    let mut neg = 0.0;
    values
        .iter()
        .map(|v| {
            let v = (*v)?;
            if !v.is_finite() {
                return None;
            }
            let v = v * scale;
            if v >= 0.0 {
                let start = pos;
                pos += v;
                Some((start, pos))
            } else {
                let start = neg;
                neg += v;
                Some((start, neg))
            }
        })
        .collect()
}

/// Returns the indices of `stacks` ordered by `key`.
///
/// The sort is stable; missing segment values order as `0`.
pub fn stack_order<S: AsRef<[Option<f64>]>>(
    stacks: &[S],
    key: StackSort,
    order: SortOrder,
) -> Vec<usize> {
    let value = |s: &S| -> f64 {
        let s = s.as_ref();
        match key {
            StackSort::Total => s.iter().flatten().filter(|v| v.is_finite()).sum(),
            StackSort::Segment(i) => s.get(i).copied().flatten().unwrap_or(0.0),
        }
    };
    let mut idx: Vec<usize> = (0..stacks.len()).collect();
    idx.sort_by(|&a, &b| {
        let ord = value(&stacks[a]).total_cmp(&value(&stacks[b]));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    idx
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::vec;

    #[test]
    fn zero_offset_splits_signs() {
        let s = stack(&[Some(2.0), Some(-1.0), None, Some(3.0)], StackOffset::Zero);
        assert_eq!(
            s,
            vec![Some((0.0, 2.0)), Some((0.0, -1.0)), None, Some((2.0, 5.0))]
        );
    }

    #[test]
    fn normalize_offset_sums_to_one() {
        let s = stack(&[Some(1.0), Some(3.0)], StackOffset::Normalize);
        assert_eq!(s, vec![Some((0.0, 0.25)), Some((0.25, 1.0))]);
        let empty = stack(&[None, Some(0.0)], StackOffset::Normalize);
        assert_eq!(empty, vec![None, Some((0.0, 0.0))], "all-zero stacks stay flat");
    }

    #[test]
    fn order_by_total_or_segment() {
        let stacks = vec![
            vec![Some(1.0), Some(1.0)],
            vec![Some(5.0), None],
            vec![Some(0.5), Some(4.0)],
        ];
        assert_eq!(
            stack_order(&stacks, StackSort::Total, SortOrder::Desc),
            vec![1, 2, 0]
        );
        assert_eq!(
            stack_order(&stacks, StackSort::Segment(1), SortOrder::Desc),
            vec![2, 0, 1]
        );
    }
}
