// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Allocation and reconciliation properties over arbitrary inputs.

use core::f64::consts::TAU;

use circle_chart::{CapType, ChartStyle, ChartView, DataSource, SegmentSource, color_range};
use kurbo::Rect;
use peniko::Color;
use quickcheck_macros::quickcheck;

const EPS: f64 = 1e-9;

fn source(values: &[u16], max: u16) -> DataSource {
    DataSource::from_values(values.iter().map(|v| f64::from(*v)), f64::from(max))
}

#[quickcheck]
fn arcs_never_exceed_the_circle(values: Vec<u16>, max: u16) -> bool {
    let source = source(&values, max);
    let sum: f64 = (0..values.len()).map(|i| source.arc_angle(i)).sum();
    if sum > TAU + EPS {
        return false;
    }
    if source.total_value() > 0.0 {
        // Full exactly when the arcs close the ring.
        source.is_full_circle() == ((sum - TAU).abs() < EPS)
    } else {
        sum == 0.0
    }
}

#[quickcheck]
fn arcs_are_contiguous_from_zero(values: Vec<u16>, max: u16) -> bool {
    let source = source(&values, max);
    if source.start_angle(0) != 0.0 {
        return false;
    }
    (1..values.len()).all(|i| (source.start_angle(i) - source.end_angle(i - 1)).abs() < EPS)
}

#[quickcheck]
fn end_angle_of_last_matches_the_arc_sum(values: Vec<u16>, max: u16) -> bool {
    let source = source(&values, max);
    let sum: f64 = (0..values.len()).map(|i| source.arc_angle(i)).sum();
    (source.end_angle_of_last() - sum).abs() < EPS
}

#[quickcheck]
fn color_ramps_hit_both_endpoints(begin: (u8, u8, u8), end: (u8, u8, u8), count: u8) -> bool {
    let begin = Color::from_rgb8(begin.0, begin.1, begin.2);
    let end = Color::from_rgb8(end.0, end.1, end.2);
    let count = usize::from(count);
    let ramp = color_range(begin, end, count);
    match count {
        0 => ramp.is_empty(),
        1 => ramp == [begin],
        _ => ramp.len() == count && ramp[0] == begin && ramp[count - 1] == end,
    }
}

#[quickcheck]
fn reload_mirrors_the_data_source(values: Vec<u16>, max: u16) -> bool {
    let mut chart = ChartView::new(Rect::new(0.0, 0.0, 120.0, 80.0), ChartStyle::default())
        .with_data_source(source(&values, max));
    chart.reload(false, || {});

    let Some(source) = chart.data_source() else {
        return false;
    };
    if chart.layer_count() != values.len() {
        return false;
    }
    let full = source.is_full_circle();
    (0..values.len()).all(|i| {
        let Some(layer) = chart.layer(i) else {
            return false;
        };
        layer.start_angle() == source.start_angle(i)
            && layer.end_angle() == source.end_angle(i)
            && layer.cap_type() == CapType::for_position(i, values.len(), full)
    })
}

#[test]
fn shrinking_then_growing_reuses_positions() {
    let mut chart = ChartView::new(Rect::new(0.0, 0.0, 100.0, 100.0), ChartStyle::default())
        .with_data_source(source(&[5, 5, 5, 5], 40));
    chart.reload(false, || {});
    let first = chart.layer(0).map(|layer| layer.id());

    let data = chart.data_source_mut().expect("attached");
    data.remove(3);
    data.remove(2);
    chart.reload(true, || {});
    assert_eq!(chart.layer_count(), 2);

    chart
        .data_source_mut()
        .expect("attached")
        .append(circle_chart::ChartSegment::new(10.0, "ten"));
    chart.reload(true, || {});
    assert_eq!(chart.layer_count(), 3);
    assert_eq!(chart.layer(0).map(|layer| layer.id()), first, "layer 0 kept its identity");
    assert_eq!(chart.layer(2).map(|layer| layer.cap_type()), Some(CapType::End));

    for _ in 0..8 {
        chart.tick(0.25);
    }
    assert!(!chart.is_animating(), "all transitions settled");
}
