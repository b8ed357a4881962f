// Copyright 2025 the Vizkit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-module behavior checks: scales, normalization, hit testing and selection together.

extern crate std;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Point;
use vizkit_core::{
    BarDatum, GroupedBarDatum, IntervalDatum, ItemId, MarkId, MarkPayload, ScatterDatum,
};
use vizkit_transforms::{
    Extent, ExtentOptions, IdStrategy, NormalizeOptions, ZeroInclusion, normalize,
};

use crate::{
    BarChartSpec, BarOrientation, GroupedBarChartSpec, InteractionController, IntervalLineChartSpec,
    ScaleLinear, ScaleTime, ScatterChartSpec, Selection, ViewState, role,
};

fn rect_count(marks: &[vizkit_core::Mark]) -> usize {
    marks
        .iter()
        .filter(|m| matches!(m.payload, MarkPayload::Rect(_)))
        .count()
}

fn circle_center(marks: &[vizkit_core::Mark], id: MarkId) -> Option<Point> {
    marks.iter().find_map(|m| match &m.payload {
        MarkPayload::Circle(c) if m.id == id => Some(c.center),
        _ => None,
    })
}

#[test]
fn mixed_sign_bars_keep_both_extremes() {
    let data = vec![BarDatum::new("A", Some(5.0)), BarDatum::new("B", Some(-3.0))];
    let norm = normalize(&data, &NormalizeOptions::default());
    assert_eq!((norm.min(), norm.max()), (-3.0, 5.0));

    let frame = BarChartSpec::default().layout(&data, &ViewState::default());
    let rects: Vec<_> = frame
        .marks
        .iter()
        .filter_map(|m| match &m.payload {
            MarkPayload::Rect(r) => Some(r.rect),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2);
    // Both bars share the zero line: one ends on it, the other starts on it.
    assert!((rects[0].y1 - rects[1].y0).abs() < 1e-9);
}

#[test]
fn single_interval_point_degenerates_to_the_line() {
    let data = vec![IntervalDatum::new("2020", Some(10.0))];
    let rows = IntervalLineChartSpec::default().rows(&data);
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].y_min, rows[0].y, rows[0].y_max), (10.0, 10.0, 10.0));
}

#[test]
fn grouped_null_sub_values_draw_nothing() {
    let data = vec![GroupedBarDatum::new("A", [Some(5.0), None, Some(3.0)])];
    for orientation in [BarOrientation::Horizontal, BarOrientation::Vertical] {
        let frame = GroupedBarChartSpec::new(orientation).layout(&data, &ViewState::default());
        assert_eq!(rect_count(&frame.marks), 2, "{orientation:?}");
    }
}

#[test]
fn second_click_resets_and_reports_none() {
    let seen: Rc<RefCell<Vec<Option<u32>>>> = Rc::default();
    let log = seen.clone();
    let mut controller = InteractionController::new()
        .with_reset_on_double_click(true)
        .with_on_click(move |item: Option<&u32>| log.borrow_mut().push(item.copied()));
    controller.click(7);
    assert!(matches!(controller.selection(), Selection::Clicked { item: 7, .. }));
    controller.click(7);
    assert!(controller.selection().is_idle());
    assert_eq!(*seen.borrow(), vec![Some(7), None]);
}

#[test]
fn every_scatter_point_hits_itself() {
    let data: Vec<ScatterDatum> = [(1.0, 4.0), (2.0, 2.0), (3.5, 7.0), (8.0, 1.0), (6.0, 6.0)]
        .into_iter()
        .map(|(x, y)| ScatterDatum::new(x, y))
        .collect();
    let frame = ScatterChartSpec::default().layout(&data, &ViewState::default());
    for i in 0..data.len() {
        let center = circle_center(&frame.marks, MarkId::for_item(role::POINT, &ItemId::Index(i), 0))
            .unwrap();
        assert_eq!(frame.hit_test(center).unwrap().datum, Some(i));
    }
}

#[test]
fn bisection_hits_exact_points_and_clamps_past_the_end() {
    let data = vec![
        IntervalDatum::new("2019", Some(3.0)),
        IntervalDatum::new("2020", Some(5.0)),
        IntervalDatum::new("2021", Some(4.0)),
    ];
    let frame = IntervalLineChartSpec::default().layout(&data, &ViewState::default());
    for i in 0..data.len() {
        let p = circle_center(&frame.marks, MarkId::for_item(role::DOT, &ItemId::Index(i), 0))
            .unwrap();
        assert_eq!(frame.hit_test(p).unwrap().datum, Some(i));
    }
    let past = Point::new(frame.plot.x1 + 100.0, frame.plot.y0);
    assert_eq!(frame.hit_test(past).unwrap().datum, Some(2));
}

#[test]
fn sign_of_the_data_pins_zero() {
    let options = ExtentOptions::new();
    let positive = Extent::of([Some(3.0), None, Some(9.0)], &options);
    assert_eq!(positive.min, 0.0);
    let negative = Extent::of([Some(-3.0), Some(-9.0)], &options);
    assert_eq!(negative.max, 0.0);
    let overridden = Extent::of([Some(3.0)], &options.with_min(Some(2.0)));
    assert_eq!(overridden.min, 2.0);
    let excluded = Extent::of(
        [Some(3.0), Some(9.0)],
        &ExtentOptions::new().with_zero(ZeroInclusion::Exclude),
    );
    assert_eq!(excluded.min, 3.0);
}

#[test]
fn scales_invert_what_they_map() {
    let linear = ScaleLinear::new((-3.0, 5.0), (400.0, 20.0));
    let time = ScaleTime::new((1.5e9, 1.7e9), (50.0, 650.0));
    for v in [-3.0, -0.25, 0.0, 1.0, 4.75] {
        assert!((linear.invert(linear.map(v)) - v).abs() < 1e-9);
    }
    for t in [1.5e9, 1.61e9, 1.7e9] {
        assert!((time.invert(time.map(t)) - t).abs() < 1e-3);
    }
}

#[test]
fn normalizing_twice_is_stable() {
    let data = vec![
        BarDatum::new("B", Some(2.0)),
        BarDatum::new("A", None),
        BarDatum::new("C", Some(-1.0)),
    ];
    for ids in [
        IdStrategy::Positional,
        IdStrategy::LabelOrder(vec!["C".into(), "A".into(), "B".into()]),
    ] {
        let options = NormalizeOptions::default().with_ids(ids);
        assert_eq!(normalize(&data, &options), normalize(&data, &options));
    }
}
