// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted segments and their angle allocation.
//!
//! A chart is fed by an ordered list of [`ChartSegment`]s plus a reference maximum. The circle
//! represents `max(reference_max, Σ value)`, so segments never more than fill the ring. When the
//! reference maximum exceeds the total, the ring is left partially open.
//!
//! The allocation helpers are plain functions over `(&[ChartSegment], reference_max)`; the
//! [`SegmentSource`] trait exposes them as provided methods for any type that can hand out its
//! segments and reference maximum. [`DataSource`] is the stock implementation.
//!
//! Angles are recomputed from scratch on every query; nothing is cached between mutations.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use core::f64::consts::TAU;

/// A single weighted value of the chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSegment {
    /// The weight of the segment. Negative or non-finite values are drawn as empty wedges.
    pub value: f64,
    /// A free-form label carried alongside the value.
    pub label: String,
}

impl ChartSegment {
    /// Creates a new segment.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// The portion of a value that takes part in angle allocation.
fn weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sum of all segment weights.
///
/// Negative and non-finite values count as `0`, so this is the sum of the positive finite
/// values rather than the raw `Σ value`.
pub fn total_value(segments: &[ChartSegment]) -> f64 {
    segments.iter().map(|s| weight(s.value)).sum()
}

/// The value represented by a full circle: `max(reference_max, total_value)`.
pub fn effective_max(segments: &[ChartSegment], reference_max: f64) -> f64 {
    total_value(segments).max(reference_max)
}

/// Whether the segments fill the entire circle.
pub fn is_full_circle(segments: &[ChartSegment], reference_max: f64) -> bool {
    effective_max(segments, reference_max) <= total_value(segments)
}

/// Sweep of `segment` on a circle worth `max`.
fn sweep(segment: &ChartSegment, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    weight(segment.value) / max * TAU
}

/// The sweep of the segment at `index`, in radians. Out-of-range indices yield `0`.
pub fn arc_angle(segments: &[ChartSegment], reference_max: f64, index: usize) -> f64 {
    let Some(segment) = segments.get(index) else {
        return 0.0;
    };
    sweep(segment, effective_max(segments, reference_max))
}

/// The angle at which the segment at `index` begins. Out-of-range indices yield `0`.
///
/// Linear in the number of segments: the effective maximum is computed once per call.
pub fn start_angle(segments: &[ChartSegment], reference_max: f64, index: usize) -> f64 {
    if index >= segments.len() {
        return 0.0;
    }
    let max = effective_max(segments, reference_max);
    segments[..index].iter().map(|s| sweep(s, max)).sum()
}

/// The angle at which the segment at `index` ends. Out-of-range indices yield `0`.
pub fn end_angle(segments: &[ChartSegment], reference_max: f64, index: usize) -> f64 {
    if index >= segments.len() {
        return 0.0;
    }
    start_angle(segments, reference_max, index) + arc_angle(segments, reference_max, index)
}

/// Read/write access to a segment list and its reference maximum.
///
/// Implementors only provide storage; item access, mutation and angle allocation come for free
/// and always agree with the free functions of this module.
pub trait SegmentSource {
    /// The segments in draw order.
    fn segments(&self) -> &[ChartSegment];

    /// Mutable access to the segments.
    fn segments_mut(&mut self) -> &mut Vec<ChartSegment>;

    /// The configured reference maximum (never negative).
    fn reference_max(&self) -> f64;

    /// Replaces the reference maximum. Implementations should clamp negative values to `0`.
    fn set_reference_max(&mut self, value: f64);

    /// Number of segments.
    fn number_of_items(&self) -> usize {
        self.segments().len()
    }

    /// The segment at `index`, if any.
    fn item(&self, index: usize) -> Option<&ChartSegment> {
        self.segments().get(index)
    }

    /// The index of the first segment equal to `segment`.
    fn index_of(&self, segment: &ChartSegment) -> Option<usize> {
        self.segments().iter().position(|s| s == segment)
    }

    /// Sum of all segment weights.
    fn total_value(&self) -> f64 {
        total_value(self.segments())
    }

    /// The value represented by a full circle.
    fn effective_max(&self) -> f64 {
        effective_max(self.segments(), self.reference_max())
    }

    /// Whether the segments fill the entire circle.
    fn is_full_circle(&self) -> bool {
        is_full_circle(self.segments(), self.reference_max())
    }

    /// Appends a segment.
    fn append(&mut self, segment: ChartSegment) {
        self.segments_mut().push(segment);
    }

    /// Inserts `segment` at `index`, returning `false` (and leaving the list untouched) if
    /// `index > number_of_items()`.
    fn insert(&mut self, segment: ChartSegment, index: usize) -> bool {
        let segments = self.segments_mut();
        if index > segments.len() {
            return false;
        }
        segments.insert(index, segment);
        true
    }

    /// Removes and returns the segment at `index`, if any.
    fn remove(&mut self, index: usize) -> Option<ChartSegment> {
        let segments = self.segments_mut();
        (index < segments.len()).then(|| segments.remove(index))
    }

    /// Removes every segment.
    fn empty(&mut self) {
        self.segments_mut().clear();
    }

    /// Sweep of the segment at `index`.
    fn arc_angle(&self, index: usize) -> f64 {
        arc_angle(self.segments(), self.reference_max(), index)
    }

    /// Start angle of the segment at `index`.
    fn start_angle(&self, index: usize) -> f64 {
        start_angle(self.segments(), self.reference_max(), index)
    }

    /// End angle of the segment at `index`.
    fn end_angle(&self, index: usize) -> f64 {
        end_angle(self.segments(), self.reference_max(), index)
    }

    /// End angle of the last segment, or `0` when there are none.
    fn end_angle_of_last(&self) -> f64 {
        self.number_of_items()
            .checked_sub(1)
            .map_or(0.0, |last| self.end_angle(last))
    }
}

/// A plain owned segment list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSource {
    segments: Vec<ChartSegment>,
    reference_max: f64,
}

impl DataSource {
    /// Creates a data source from existing segments.
    pub fn new(segments: Vec<ChartSegment>, reference_max: f64) -> Self {
        Self {
            segments,
            reference_max: reference_max.max(0.0),
        }
    }

    /// Creates a data source from bare values; each segment is labelled with its value.
    pub fn from_values(values: impl IntoIterator<Item = f64>, reference_max: f64) -> Self {
        let segments = values
            .into_iter()
            .map(|v| ChartSegment::new(v, alloc::format!("{v}")))
            .collect();
        Self::new(segments, reference_max)
    }
}

impl SegmentSource for DataSource {
    fn segments(&self) -> &[ChartSegment] {
        &self.segments
    }

    fn segments_mut(&mut self) -> &mut Vec<ChartSegment> {
        &mut self.segments
    }

    fn reference_max(&self) -> f64 {
        self.reference_max
    }

    fn set_reference_max(&mut self, value: f64) {
        // `f64::max` discards NaN.
        self.reference_max = value.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn partially_filled_ring() {
        let source = DataSource::from_values([10.0, 20.0, 30.0], 100.0);
        assert_eq!(source.total_value(), 60.0);
        assert_eq!(source.effective_max(), 100.0);
        assert!(!source.is_full_circle(), "60 of 100 leaves the ring open");
        assert!(close(source.arc_angle(0), 0.1 * TAU));
        assert!(close(source.arc_angle(1), 0.2 * TAU));
        assert!(close(source.arc_angle(2), 0.3 * TAU));
        assert!(close(source.end_angle_of_last(), 0.6 * TAU));
    }

    #[test]
    fn total_above_reference_fills_the_ring() {
        let source = DataSource::from_values([50.0, 50.0], 50.0);
        assert_eq!(source.effective_max(), 100.0);
        assert!(source.is_full_circle(), "sum exceeds the reference max");
        assert!(close(source.end_angle(1), TAU));
    }

    #[test]
    fn angles_are_contiguous() {
        let source = DataSource::from_values([3.0, 1.0, 4.0, 1.0, 5.0], 20.0);
        assert_eq!(source.start_angle(0), 0.0);
        for i in 0..4 {
            assert!(
                close(source.end_angle(i), source.start_angle(i + 1)),
                "gap between {i} and {}",
                i + 1
            );
        }
    }

    #[test]
    fn out_of_range_lookups_are_absent() {
        let mut source = DataSource::from_values([1.0, 2.0], 10.0);
        assert!(source.item(2).is_none());
        assert_eq!(source.start_angle(5), 0.0);
        assert_eq!(source.end_angle(5), 0.0);
        assert_eq!(source.arc_angle(5), 0.0);
        assert!(source.remove(2).is_none());
        assert!(!source.insert(ChartSegment::new(1.0, "x"), 3));
        assert_eq!(source.number_of_items(), 2);
    }

    #[test]
    fn mutation_helpers() {
        let mut source = DataSource::default();
        source.append(ChartSegment::new(1.0, "a"));
        source.append(ChartSegment::new(3.0, "c"));
        assert!(source.insert(ChartSegment::new(2.0, "b"), 1));
        assert!(source.insert(ChartSegment::new(4.0, "d"), 3));
        let labels: Vec<_> = source.segments().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c", "d"]);
        assert_eq!(source.index_of(&ChartSegment::new(3.0, "c")), Some(2));
        assert_eq!(source.index_of(&ChartSegment::new(3.0, "z")), None);
        assert_eq!(source.remove(0), Some(ChartSegment::new(1.0, "a")));
        source.empty();
        assert_eq!(source.number_of_items(), 0);
        assert_eq!(source.end_angle_of_last(), 0.0);
    }

    #[test]
    fn malformed_values_degrade_to_empty_wedges() {
        let source = DataSource::from_values([-5.0, f64::NAN, 10.0], 0.0);
        assert_eq!(source.arc_angle(0), 0.0);
        assert_eq!(source.arc_angle(1), 0.0);
        assert!(close(source.arc_angle(2), TAU));
        assert!(close(source.start_angle(2), 0.0));

        let zero = DataSource::from_values([0.0, 0.0], 0.0);
        assert_eq!(zero.end_angle(1), 0.0);
    }

    #[test]
    fn total_value_ignores_negative_and_non_finite_values() {
        let source = DataSource::from_values([-5.0, 10.0, f64::INFINITY], 0.0);
        assert_eq!(source.total_value(), 10.0);
    }

    #[test]
    fn allocation_stays_consistent_on_long_lists() {
        let source = DataSource::from_values((1..=2000).map(f64::from), 0.0);
        assert!(source.is_full_circle(), "no reference max");
        assert!(close(source.end_angle_of_last(), TAU));
        // Triangular numbers: the start of item `i` covers `i * (i + 1) / 2` of the total.
        let total = 2000.0 * 2001.0 / 2.0;
        assert!(close(source.start_angle(1000), 1000.0 * 1001.0 / 2.0 / total * TAU));
    }

    #[test]
    fn reference_max_is_never_negative() {
        let mut source = DataSource::new(Vec::new(), -3.0);
        assert_eq!(source.reference_max(), 0.0);
        source.set_reference_max(f64::NAN);
        assert_eq!(source.reference_max(), 0.0);
        source.set_reference_max(12.0);
        assert_eq!(source.reference_max(), 12.0);
    }
}
