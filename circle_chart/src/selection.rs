// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual treatments for selected segments.
//!
//! Each [`SelectionStyle`] maps to a [`SelectionTreatment`], a pure function from a layer's
//! resting style and selection state to the style it should animate to.

use core::fmt::Debug;

use peniko::Color;

/// How far a selected segment grows outwards with [`SelectionStyle::Grow`].
pub const GROW_INCREMENT: f64 = 20.0;

/// Selection feedback styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionStyle {
    /// Selection is tracked and reported but not drawn.
    None,
    /// Selected segments bulge outwards by [`GROW_INCREMENT`].
    #[default]
    Grow,
    /// While anything is selected, every other segment switches to the inactive palette.
    DesaturateNonSelected,
}

impl SelectionStyle {
    /// The treatment implementing this style.
    pub fn treatment(self) -> &'static dyn SelectionTreatment {
        match self {
            Self::None => &Plain,
            Self::Grow => &Grow {
                increment: GROW_INCREMENT,
            },
            Self::DesaturateNonSelected => &Desaturate,
        }
    }
}

/// The animatable style of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerStyle {
    /// Ring thickness.
    pub line_width: f64,
    /// Inset from the frame.
    pub padding: f64,
    /// Fill color.
    pub color: Color,
}

/// Inputs to a [`SelectionTreatment`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionContext {
    /// The style the layer has when nothing is going on.
    pub resting: LayerStyle,
    /// The layer's entry in the inactive (grayscale) palette.
    pub inactive_color: Color,
    /// Whether this layer is selected.
    pub selected: bool,
    /// Whether any layer of the chart is selected.
    pub any_selected: bool,
}

/// A swappable selection look.
pub trait SelectionTreatment: Debug + Sync {
    /// The style a layer should take given its selection context.
    fn style(&self, cx: &SelectionContext) -> LayerStyle;
}

#[derive(Debug)]
struct Plain;

impl SelectionTreatment for Plain {
    fn style(&self, cx: &SelectionContext) -> LayerStyle {
        cx.resting
    }
}

#[derive(Debug)]
struct Grow {
    increment: f64,
}

impl SelectionTreatment for Grow {
    fn style(&self, cx: &SelectionContext) -> LayerStyle {
        if !cx.selected {
            return cx.resting;
        }
        LayerStyle {
            line_width: cx.resting.line_width + self.increment,
            padding: cx.resting.padding - self.increment,
            ..cx.resting
        }
    }
}

#[derive(Debug)]
struct Desaturate;

impl SelectionTreatment for Desaturate {
    fn style(&self, cx: &SelectionContext) -> LayerStyle {
        if cx.any_selected && !cx.selected {
            LayerStyle {
                color: cx.inactive_color,
                ..cx.resting
            }
        } else {
            cx.resting
        }
    }
}
