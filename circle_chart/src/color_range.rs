// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Evenly spaced color ramps.
//!
//! Segment colors are derived from a `begin`/`end` pair, so a chart with `n` segments always
//! starts at `begin` and finishes at `end` regardless of how many segments sit in between.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

/// Returns `count` colors linearly interpolated from `begin` to `end`.
///
/// Each sRGB component (including alpha) is interpolated independently at `t = i / (count - 1)`.
/// The first element is exactly `begin` and the last is exactly `end`. A `count` of `1` yields
/// `[begin]`, and `0` yields an empty ramp.
pub fn color_range(begin: Color, end: Color, count: usize) -> Vec<Color> {
    match count {
        0 => Vec::new(),
        1 => alloc::vec![begin],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| lerp_color(begin, end, i as f64 / last))
                .collect()
        }
    }
}

/// Per-component interpolation between two colors.
///
/// Written as `a * (1 - t) + b * t` so both endpoints are reproduced exactly.
pub(crate) fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "color components are f32; progress only needs f32 precision"
    )]
    let t = t as f32;
    let mut components = [0.0_f32; 4];
    for (out, (x, y)) in components
        .iter_mut()
        .zip(a.components.iter().zip(b.components.iter()))
    {
        *out = x * (1.0 - t) + y * t;
    }
    Color::new(components)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;

    const BLACK: Color = Color::new([0.0, 0.0, 0.0, 1.0]);
    const WHITE: Color = Color::new([1.0, 1.0, 1.0, 1.0]);
    const RED: Color = Color::new([1.0, 0.0, 0.0, 1.0]);
    const BLUE: Color = Color::new([0.0, 0.0, 1.0, 1.0]);

    #[test]
    fn empty_and_single_ramps() {
        assert!(color_range(RED, BLUE, 0).is_empty(), "zero count is empty");
        assert_eq!(color_range(RED, BLUE, 1), alloc::vec![RED]);
    }

    #[test]
    fn two_piece_ramp_is_just_the_endpoints() {
        assert_eq!(color_range(BLACK, WHITE, 2), alloc::vec![BLACK, WHITE]);
    }

    #[test]
    fn three_piece_ramp_has_a_mid_grey() {
        let grey = Color::new([0.5, 0.5, 0.5, 1.0]);
        assert_eq!(color_range(BLACK, WHITE, 3), alloc::vec![BLACK, grey, WHITE]);
        assert_eq!(color_range(WHITE, BLACK, 3), alloc::vec![WHITE, grey, BLACK]);
    }

    #[test]
    fn five_piece_red_to_blue() {
        let ramp = color_range(RED, BLUE, 5);
        assert_eq!(
            ramp,
            alloc::vec![
                RED,
                Color::new([0.75, 0.0, 0.25, 1.0]),
                Color::new([0.5, 0.0, 0.5, 1.0]),
                Color::new([0.25, 0.0, 0.75, 1.0]),
                BLUE,
            ]
        );
    }

    #[test]
    fn alpha_is_interpolated_too() {
        let clear = Color::new([0.0, 0.0, 0.0, 0.0]);
        let ramp = color_range(clear, BLACK, 3);
        assert_eq!(ramp[1].components[3], 0.5);
    }

    #[test]
    fn endpoints_survive_awkward_counts() {
        let ramp = color_range(css::TOMATO, css::TEAL, 7);
        assert_eq!(ramp.len(), 7);
        assert_eq!(ramp[0], css::TOMATO);
        assert_eq!(ramp[6], css::TEAL);
    }
}
