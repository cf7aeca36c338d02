// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing seam.
//!
//! Rendering is left to the host: layers only ever ask for a closed path to be filled with a
//! solid color. Any vector backend (Vello, an SVG writer, a canvas) can sit behind this trait.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::BezPath;
use peniko::Color;

/// A sink for filled regions.
pub trait DrawingBackend {
    /// Fills the closed `path` with `color` (non-zero winding).
    fn fill(&mut self, path: &BezPath, color: Color);
}

/// Records every fill, in order.
impl DrawingBackend for Vec<(BezPath, Color)> {
    fn fill(&mut self, path: &BezPath, color: Color) {
        self.push((path.clone(), color));
    }
}
