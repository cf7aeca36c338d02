// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a single chart frame.

use circle_chart::DrawingBackend;
use kurbo::{BezPath, Rect};
use peniko::Color;

/// Records fills in paint order and serializes them as one SVG document.
#[derive(Debug)]
pub(crate) struct SvgFrame {
    fills: Vec<(BezPath, Color)>,
    view_box: Rect,
}

impl SvgFrame {
    pub(crate) fn new(view_box: Rect) -> Self {
        Self {
            fills: Vec::new(),
            view_box,
        }
    }

    pub(crate) fn to_svg_string(&self) -> String {
        let view_box = self.view_box;
        let mut out = String::new();

        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
        out.push_str(&format!(
            r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
            view_box.x0,
            view_box.y0,
            view_box.width(),
            view_box.height(),
            view_box.width(),
            view_box.height()
        ));
        out.push('\n');

        for (path, color) in &self.fills {
            let d = path.to_svg();
            out.push_str(&format!(r#"<path d="{d}""#));
            write_fill_attr(&mut out, *color);
            out.push_str("/>\n");
        }

        out.push_str("</svg>\n");
        out
    }
}

impl DrawingBackend for SvgFrame {
    fn fill(&mut self, path: &BezPath, color: Color) {
        self.fills.push((path.clone(), color));
    }
}

fn svg_fill(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let fill = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let fill_opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (fill, fill_opacity)
}

fn write_fill_attr(out: &mut String, color: Color) {
    let (value, opacity) = svg_fill(color);
    out.push_str(&format!(r#" fill="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" fill-opacity="{o}""#));
    }
}
