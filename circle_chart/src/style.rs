// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-wide appearance settings.

use core::f64::consts::FRAC_PI_2;

use peniko::Color;
use peniko::color::palette::css;

use crate::animation::DEFAULT_ANIMATION_DURATION;
use crate::selection::SelectionStyle;

/// Appearance of a [`ChartView`](crate::ChartView).
///
/// Segment colors are a ramp from `begin_color` to `end_color`; the inactive pair feeds the
/// grayscale ramp used by [`SelectionStyle::DesaturateNonSelected`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartStyle {
    /// Ring thickness.
    pub line_width: f64,
    /// Inset of the ring from the chart frame.
    pub padding: f64,
    /// Color of the first segment.
    pub begin_color: Color,
    /// Color of the last segment.
    pub end_color: Color,
    /// Inactive color of the first segment.
    pub inactive_begin_color: Color,
    /// Inactive color of the last segment.
    pub inactive_end_color: Color,
    /// Color of the full ring drawn beneath the segments.
    pub background_color: Color,
    /// Selection feedback.
    pub selection_style: SelectionStyle,
    /// Screen angle at which angle `0` is drawn; `-π/2` puts it at 12 o'clock.
    pub origin_angle: f64,
    /// Duration of reload and selection transitions, in seconds.
    pub animation_duration: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 25.0,
            padding: 0.0,
            begin_color: css::LIME,
            end_color: css::YELLOW,
            inactive_begin_color: Color::new([0.5, 0.5, 0.5, 1.0]),
            inactive_end_color: Color::new([0.15, 0.15, 0.15, 1.0]),
            background_color: Color::new([0.7, 0.7, 0.7, 0.66]),
            selection_style: SelectionStyle::Grow,
            origin_angle: -FRAC_PI_2,
            animation_duration: DEFAULT_ANIMATION_DURATION,
        }
    }
}

impl ChartStyle {
    /// Sets the ring thickness.
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    /// Sets the inset of the ring from the chart frame.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the color ramp endpoints.
    pub fn with_colors(mut self, begin: Color, end: Color) -> Self {
        self.begin_color = begin;
        self.end_color = end;
        self
    }

    /// Sets the inactive color ramp endpoints.
    pub fn with_inactive_colors(mut self, begin: Color, end: Color) -> Self {
        self.inactive_begin_color = begin;
        self.inactive_end_color = end;
        self
    }

    /// Sets the background ring color.
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Sets the selection feedback.
    pub fn with_selection_style(mut self, style: SelectionStyle) -> Self {
        self.selection_style = style;
        self
    }

    /// Sets the screen angle of angle `0`.
    pub fn with_origin_angle(mut self, angle: f64) -> Self {
        self.origin_angle = angle;
        self
    }

    /// Sets the transition duration, in seconds.
    pub fn with_animation_duration(mut self, seconds: f64) -> Self {
        self.animation_duration = seconds.max(0.0);
        self
    }
}
