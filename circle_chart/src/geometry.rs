// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring segment geometry.
//!
//! A segment is an annulus wedge inside a square frame: the outer radius is half the frame width
//! minus `padding`, and the inner radius sits `line_width` further in. Exposed ends of the ring
//! get a round cap, a disc whose diameter is the ring thickness, centered on the mid radius.
//!
//! The same shapes are used for filling and for hit-testing, so a touch registers exactly where
//! the segment is visible.

use kurbo::{BezPath, Circle, CircleSegment, Point, Rect, Shape, Vec2};
use smallvec::SmallVec;

/// Flattening tolerance used when converting arcs to Bézier paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Which ends of a segment are drawn with a round cap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapType {
    /// No caps.
    #[default]
    None,
    /// A cap at the start angle.
    Begin,
    /// A cap at the end angle.
    End,
    /// Caps at both ends.
    BothEnds,
}

impl CapType {
    /// The cap type for the layer at `index` in a ring of `layer_count` layers.
    ///
    /// A full ring has no exposed ends. Otherwise the first layer owns the opening edge, the
    /// last owns the closing edge, and a lone layer owns both.
    pub fn for_position(index: usize, layer_count: usize, is_full_circle: bool) -> Self {
        if is_full_circle {
            return Self::None;
        }
        match index {
            0 if layer_count == 1 => Self::BothEnds,
            0 if layer_count > 1 => Self::Begin,
            i if layer_count > 1 && i == layer_count - 1 => Self::End,
            _ => Self::None,
        }
    }

    /// Whether a cap is drawn at the start angle.
    pub fn has_begin(self) -> bool {
        matches!(self, Self::Begin | Self::BothEnds)
    }

    /// Whether a cap is drawn at the end angle.
    pub fn has_end(self) -> bool {
        matches!(self, Self::End | Self::BothEnds)
    }
}

/// `center + radius * (cos angle, sin angle)`.
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}

/// A snapshot of everything needed to draw or hit-test one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentGeometry {
    /// The square frame the ring is inscribed in.
    pub bounds: Rect,
    /// Ring thickness.
    pub line_width: f64,
    /// Inset of the outer edge from the frame.
    pub padding: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Which ends carry a round cap.
    pub cap_type: CapType,
}

impl SegmentGeometry {
    /// Creates an uncapped segment.
    pub fn new(
        bounds: Rect,
        line_width: f64,
        padding: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        Self {
            bounds,
            line_width,
            padding,
            start_angle,
            end_angle,
            cap_type: CapType::None,
        }
    }

    /// Sets the cap type.
    pub fn with_cap_type(mut self, cap_type: CapType) -> Self {
        self.cap_type = cap_type;
        self
    }

    /// Center of the frame.
    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// `bounds.width / 2 - padding`.
    pub fn outer_radius(&self) -> f64 {
        self.bounds.width() / 2.0 - self.padding
    }

    /// `outer_radius - line_width`.
    pub fn inner_radius(&self) -> f64 {
        self.outer_radius() - self.line_width
    }

    /// The annulus wedge between the start and end angles.
    pub fn base_segment(&self) -> CircleSegment {
        Circle::new(self.center(), self.outer_radius()).segment(
            self.inner_radius(),
            self.start_angle,
            self.end_angle - self.start_angle,
        )
    }

    /// The wedge as a closed path: outer arc forward, inner arc back.
    pub fn base_segment_path(&self) -> BezPath {
        self.base_segment().to_path(PATH_TOLERANCE)
    }

    /// The round cap disc attached at `angle`.
    pub fn cap(&self, angle: f64) -> Circle {
        let (outer, inner) = (self.outer_radius(), self.inner_radius());
        let cap_radius = (outer - inner).max(inner - outer) / 2.0;
        let center = point_on_circle(self.center(), 0.5 * (outer + inner), angle);
        Circle::new(center, cap_radius)
    }

    /// The cap disc as a path.
    pub fn cap_path(&self, angle: f64) -> BezPath {
        self.cap(angle).to_path(PATH_TOLERANCE)
    }

    /// Every region that is filled when drawing: the wedge, then the exposed caps.
    pub fn fill_paths(&self) -> SmallVec<[BezPath; 3]> {
        let mut paths = SmallVec::new();
        paths.push(self.base_segment_path());
        if self.cap_type.has_begin() {
            paths.push(self.cap_path(self.start_angle));
        }
        if self.cap_type.has_end() {
            paths.push(self.cap_path(self.end_angle));
        }
        paths
    }

    /// Whether `point` lies inside the wedge or one of its exposed caps.
    pub fn contains(&self, point: Point) -> bool {
        // Test the flattened paths that `fill_paths` hands to the backend, not the exact circles.
        self.fill_paths().iter().any(|path| path.contains(point))
    }
}
