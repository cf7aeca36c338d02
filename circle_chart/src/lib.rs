// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An animated ring chart core.
//!
//! This crate turns an ordered list of values into contiguous arcs of a ring and keeps a set
//! of drawable layers in sync with that list:
//! - **Data sources** ([`SegmentSource`]) own the values and derive every angle from them.
//! - **Layers** ([`SegmentLayer`]) hold one arc each and tween their properties through an
//!   [`Animator`] that the host ticks.
//! - **The chart** ([`ChartView`]) reconciles layers with the data on every reload, draws
//!   through a [`DrawingBackend`] and maps touches back to segment indices.
//!
//! Rendering, text and platform event loops are out of scope; hosts supply a backend and a
//! clock.
//!
//! ```
//! use circle_chart::{ChartStyle, ChartView, DataSource};
//! use kurbo::{BezPath, Rect};
//! use peniko::Color;
//!
//! let mut chart = ChartView::new(Rect::new(0.0, 0.0, 200.0, 200.0), ChartStyle::default())
//!     .with_data_source(DataSource::from_values([10.0, 20.0, 30.0], 100.0));
//! chart.reload(true, || {});
//! chart.tick(1.0);
//!
//! let mut fills: Vec<(BezPath, Color)> = Vec::new();
//! chart.draw(&mut fills);
//! assert_eq!(chart.layer_count(), 3);
//! ```

#![no_std]

extern crate alloc;

mod animation;
mod backend;
mod chart;
mod color_range;
mod data_source;
mod geometry;
mod layer;
mod selection;
mod style;

pub use animation::{
    AnimatedValue, Animator, DEFAULT_ANIMATION_DURATION, Easing, LayerId, Property,
};
pub use backend::DrawingBackend;
pub use chart::{Callback, ChartCompletion, ChartView, IndexHandler};
pub use color_range::color_range;
pub use data_source::{
    ChartSegment, DataSource, SegmentSource, arc_angle, effective_max, end_angle,
    is_full_circle, start_angle, total_value,
};
pub use geometry::{CapType, PATH_TOLERANCE, SegmentGeometry, point_on_circle};
pub use layer::{LayerTree, SegmentLayer};
pub use selection::{
    GROW_INCREMENT, LayerStyle, SelectionContext, SelectionStyle, SelectionTreatment,
};
pub use style::ChartStyle;
