// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted `circle_chart` session.
//!
//! Every step of the script is played to completion on a fixed clock and each tick is dumped
//! as an SVG frame into `circle_chart_demo.html`. Set `RUST_LOG` to see the chart's own events.

mod html;
mod svg;

use std::cell::Cell;
use std::rc::Rc;

use circle_chart::{
    ChartSegment, ChartStyle, ChartView, DataSource, SegmentSource, SelectionStyle,
};
use kurbo::{Point, Rect};
use peniko::color::palette::css;
use tracing_subscriber::EnvFilter;

const HOST: Rect = Rect::new(0.0, 0.0, 240.0, 240.0);
const FRAME_DT: f64 = 0.125;
const MAX_FRAMES: usize = 16;
const OUTPUT: &str = "circle_chart_demo.html";

fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,circle_chart=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let values = [
        10.0, 20.0, 40.0, 30.0, 10.0, 80.0, 90.0, 100.0, 200.0, 250.0, 80.0, 90.0,
    ];
    let mut chart = ChartView::new(HOST, ChartStyle::default())
        .with_data_source(DataSource::from_values(values, 1000.0));
    chart.set_select_handler(|index| tracing::info!(index, "segment selected"));
    chart.set_deselect_handler(|index| tracing::info!(index, "segment deselected"));

    let mut sections = Vec::new();

    chart.reload(true, || tracing::info!("initial load finished"));
    sections.push(record("Initial load", &mut chart));

    chart.select(1);
    sections.push(record("Select segment 1", &mut chart));

    if let Some(source) = chart.data_source_mut() {
        source.append(ChartSegment::new(60.0, "appended"));
    }
    chart.reload(true, || {});
    sections.push(record("Append a segment", &mut chart));

    if let Some(source) = chart.data_source_mut() {
        source.remove(0);
        source.remove(0);
    }
    chart.reload(true, || {});
    sections.push(record("Remove the first two segments", &mut chart));

    if let Some(source) = chart.data_source_mut() {
        source.segments_mut().reverse();
    }
    chart.reload(true, || {});
    sections.push(record("Reverse the data", &mut chart));

    if let Some(source) = chart.data_source_mut() {
        source.set_reference_max(0.0);
    }
    chart.reload(true, || {});
    sections.push(record("Close the ring", &mut chart));

    chart.set_selection_style(SelectionStyle::DesaturateNonSelected);
    chart.reload(true, || {});
    let tap = tap_point(&chart, 4);
    chart.touch_ended(tap);
    sections.push(record("Desaturate around a tapped segment", &mut chart));

    let depleted = Rc::new(Cell::new(false));
    let flag = depleted.clone();
    let from_angle = chart
        .data_source()
        .map_or(0.0, SegmentSource::end_angle_of_last);
    chart.animate_depletion(css::RED, from_angle, 0.5, move || flag.set(true));
    sections.push(record("Deplete", &mut chart));
    tracing::info!(finished = depleted.get(), "depletion");

    chart.reload(true, || {});
    sections.push(record("Reload after depletion", &mut chart));

    chart.empty(true);
    sections.push(record("Empty", &mut chart));

    let html = html::render_report("circle_chart demo", &sections);
    std::fs::write(OUTPUT, html)?;
    tracing::info!(path = OUTPUT, "wrote report");
    Ok(())
}

/// Plays the pending transitions, capturing one frame per tick.
fn record(title: &str, chart: &mut ChartView) -> html::Section {
    let mut frames = vec![frame(chart)];
    for _ in 0..MAX_FRAMES {
        if !chart.is_animating() {
            break;
        }
        chart.tick(FRAME_DT);
        frames.push(frame(chart));
    }
    html::Section::new(title, frames)
}

fn frame(chart: &ChartView) -> String {
    // Grown segments bulge past the frame.
    let mut svg = svg::SvgFrame::new(HOST.inflate(24.0, 24.0));
    chart.draw(&mut svg);
    svg.to_svg_string()
}

/// A host point in the middle of the segment at `index`.
fn tap_point(chart: &ChartView, index: usize) -> Point {
    let Some(layer) = chart.layer(index) else {
        return HOST.center();
    };
    let geometry = layer.model_geometry();
    let radius = 0.5 * (geometry.inner_radius() + geometry.outer_radius());
    let angle = 0.5 * (geometry.start_angle + geometry.end_angle);
    chart.chart_transform() * circle_chart::point_on_circle(geometry.center(), radius, angle)
}
