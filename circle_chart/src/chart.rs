// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart controller: reconciles layers with a data source.
//!
//! [`ChartView::reload`] walks `max(items, layers)` indices in one transaction:
//! - an index without data schedules its layer for removal,
//! - an index without a layer gets a new one (with an entry sweep when animated),
//! - every other index updates its layer in place and lets the property tweens do the rest.
//!
//! Identity is positional: layer `i` always shows item `i`. Reordering the data is therefore
//! indistinguishable from changing values, and the data must not be mutated between the start
//! and the end of a single `reload` call.
//!
//! Removed layers leave the live list at once but stay in the layer tree until their exit
//! transition completes, in a nested transaction of their own.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use core::f64::consts::TAU;
use core::fmt;

use kurbo::{Affine, Point, Rect};
use peniko::Color;
use smallvec::SmallVec;

use crate::animation::{Animator, LayerId};
use crate::backend::DrawingBackend;
use crate::color_range::color_range;
use crate::data_source::{DataSource, SegmentSource};
use crate::geometry::CapType;
use crate::layer::{LayerTree, SegmentLayer};
use crate::selection::{LayerStyle, SelectionContext, SelectionStyle};
use crate::style::ChartStyle;

/// Duration of the collapse that precedes a depletion animation, in seconds.
const DEPLETION_COLLAPSE_DURATION: f64 = 0.25;

/// A one-shot callback run by the chart once a transition has finished.
pub type Callback = Box<dyn FnOnce()>;

/// A callback receiving a segment index.
pub type IndexHandler = Box<dyn FnMut(usize)>;

/// Work the chart performs when one of its transactions completes.
pub enum ChartCompletion {
    /// Run a caller-supplied callback.
    Notify(Callback),
    /// Detach a layer whose exit transition has finished, then run the callback, if any.
    Detach {
        /// The exiting layer.
        layer: LayerId,
        /// Runs after the layer is gone.
        then: Option<Callback>,
    },
    /// Drop the collapsed layers and play the single depletion segment.
    Deplete {
        /// Layers that collapsed towards the depletion angle.
        collapsed: Vec<LayerId>,
        /// Color of the depletion segment.
        color: Color,
        /// Angle the depletion segment starts from.
        from_angle: f64,
        /// Duration of the depletion sweep, in seconds.
        duration: f64,
        /// Runs once the depletion segment is gone.
        then: Callback,
    },
}

impl fmt::Debug for ChartCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notify(_) => f.write_str("Notify"),
            Self::Detach { layer, .. } => f
                .debug_struct("Detach")
                .field("layer", layer)
                .finish_non_exhaustive(),
            Self::Deplete {
                collapsed,
                from_angle,
                duration,
                ..
            } => f
                .debug_struct("Deplete")
                .field("collapsed", collapsed)
                .field("from_angle", from_angle)
                .field("duration", duration)
                .finish_non_exhaustive(),
        }
    }
}

/// An animated ring chart bound to a [`SegmentSource`].
///
/// Without a data source every data-driven operation (`reload`, `empty`, selection,
/// `animate_*`) silently does nothing. Layout, drawing and ticking work regardless, so the
/// background ring is always visible.
pub struct ChartView<D = DataSource> {
    data_source: Option<D>,
    style: ChartStyle,
    host_bounds: Rect,
    frame: Rect,
    tree: LayerTree,
    background: LayerId,
    layers: Vec<LayerId>,
    palette: Vec<Color>,
    inactive_palette: Vec<Color>,
    animator: Animator<ChartCompletion>,
    initial_load_complete: bool,
    select_handler: IndexHandler,
    deselect_handler: IndexHandler,
}

impl<D: fmt::Debug> fmt::Debug for ChartView<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartView")
            .field("data_source", &self.data_source)
            .field("style", &self.style)
            .field("host_bounds", &self.host_bounds)
            .field("frame", &self.frame)
            .field("tree", &self.tree)
            .field("background", &self.background)
            .field("layers", &self.layers)
            .field("palette", &self.palette)
            .field("inactive_palette", &self.inactive_palette)
            .field("animator", &self.animator)
            .field("initial_load_complete", &self.initial_load_complete)
            .finish_non_exhaustive()
    }
}

/// The largest square with its origin at zero that fits in `host`.
fn square_frame(host: Rect) -> Rect {
    let side = host.width().min(host.height()).max(0.0);
    Rect::new(0.0, 0.0, side, side)
}

fn selection_context(
    style: &ChartStyle,
    palette: &[Color],
    inactive_palette: &[Color],
    index: usize,
    selected: bool,
    any_selected: bool,
) -> SelectionContext {
    SelectionContext {
        resting: LayerStyle {
            line_width: style.line_width,
            padding: style.padding,
            color: palette.get(index).copied().unwrap_or(style.begin_color),
        },
        inactive_color: inactive_palette
            .get(index)
            .copied()
            .unwrap_or(style.inactive_begin_color),
        selected,
        any_selected,
    }
}

fn apply_layer_style(
    layer: &mut SegmentLayer,
    target: LayerStyle,
    animator: &mut Animator<ChartCompletion>,
) {
    layer.set_line_width(target.line_width, animator);
    layer.set_padding(target.padding, animator);
    layer.set_color(target.color, animator);
}

impl<D: SegmentSource> ChartView<D> {
    /// Creates a chart hosted in `host_bounds`, without a data source.
    pub fn new(host_bounds: Rect, style: ChartStyle) -> Self {
        let frame = square_frame(host_bounds);
        let mut tree = LayerTree::new();
        let background = tree.create(
            frame,
            0.0,
            TAU,
            style.line_width,
            style.padding,
            style.background_color,
        );
        tree.insert_at(0, background);
        Self {
            data_source: None,
            style,
            host_bounds,
            frame,
            tree,
            background,
            layers: Vec::new(),
            palette: Vec::new(),
            inactive_palette: Vec::new(),
            animator: Animator::new(style.animation_duration),
            initial_load_complete: false,
            select_handler: Box::new(|_| {}),
            deselect_handler: Box::new(|_| {}),
        }
    }

    /// Attaches a data source.
    pub fn with_data_source(mut self, source: D) -> Self {
        self.data_source = Some(source);
        self
    }

    /// Replaces the data source, returning the previous one. Takes effect on the next reload.
    pub fn set_data_source(&mut self, source: Option<D>) -> Option<D> {
        core::mem::replace(&mut self.data_source, source)
    }

    /// The attached data source.
    pub fn data_source(&self) -> Option<&D> {
        self.data_source.as_ref()
    }

    /// Mutable access to the attached data source. Call [`reload`](Self::reload) afterwards.
    pub fn data_source_mut(&mut self) -> Option<&mut D> {
        self.data_source.as_mut()
    }

    /// Current appearance settings.
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Replaces the appearance settings. Takes effect on the next reload.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Sets the ring thickness. Takes effect on the next reload.
    pub fn set_line_width(&mut self, line_width: f64) {
        self.style.line_width = line_width;
    }

    /// Sets the ring inset. Takes effect on the next reload.
    pub fn set_padding(&mut self, padding: f64) {
        self.style.padding = padding;
    }

    /// Sets the color ramp endpoints. Takes effect on the next reload.
    pub fn set_colors(&mut self, begin: Color, end: Color) {
        self.style.begin_color = begin;
        self.style.end_color = end;
    }

    /// Sets the inactive color ramp endpoints. Takes effect on the next reload.
    pub fn set_inactive_colors(&mut self, begin: Color, end: Color) {
        self.style.inactive_begin_color = begin;
        self.style.inactive_end_color = end;
    }

    /// Sets the background ring color. Takes effect on the next reload.
    pub fn set_background_color(&mut self, color: Color) {
        self.style.background_color = color;
    }

    /// Sets the selection feedback. Takes effect on the next reload or selection change.
    pub fn set_selection_style(&mut self, selection_style: SelectionStyle) {
        self.style.selection_style = selection_style;
    }

    /// Registers the callback fired when a segment becomes selected.
    pub fn set_select_handler(&mut self, handler: impl FnMut(usize) + 'static) {
        self.select_handler = Box::new(handler);
    }

    /// Registers the callback fired when a segment stops being selected.
    pub fn set_deselect_handler(&mut self, handler: impl FnMut(usize) + 'static) {
        self.deselect_handler = Box::new(handler);
    }

    /// The square frame segments are drawn in, in chart coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Maps chart coordinates to host coordinates.
    ///
    /// The frame is centered in the host bounds and rotated by the style's origin angle.
    pub fn chart_transform(&self) -> Affine {
        Affine::translate(self.host_bounds.center().to_vec2())
            * Affine::rotate(self.style.origin_angle)
            * Affine::translate(-self.frame.center().to_vec2())
    }

    /// Fits the chart into new host bounds.
    pub fn layout(&mut self, host_bounds: Rect) {
        self.host_bounds = host_bounds;
        self.frame = square_frame(host_bounds);
        for layer in self.tree.iter_mut() {
            layer.set_frame(self.frame);
        }
    }

    /// Number of live segment layers (exiting layers excluded).
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// The live layer at `index`.
    pub fn layer(&self, index: usize) -> Option<&SegmentLayer> {
        self.layers.get(index).and_then(|id| self.tree.get(*id))
    }

    /// The full ring drawn beneath the segments.
    pub fn background_layer(&self) -> Option<&SegmentLayer> {
        self.tree.get(self.background)
    }

    /// Segment colors computed by the last reload.
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// The scheduler driving the chart's transitions.
    pub fn animator(&self) -> &Animator<ChartCompletion> {
        &self.animator
    }

    /// Whether any transition or completion is still pending.
    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    /// Synchronizes layers with the data source.
    ///
    /// `on_complete` runs from a later [`tick`](Self::tick), once the inserted and updated
    /// layers have settled. Exiting layers complete independently.
    pub fn reload(&mut self, animated: bool, on_complete: impl FnOnce() + 'static) {
        let Some(source) = self.data_source.as_ref() else {
            tracing::debug!("reload skipped: no data source");
            return;
        };
        let style = self.style;
        let count = source.number_of_items();
        let full_circle = source.is_full_circle();
        self.palette = color_range(style.begin_color, style.end_color, count);
        self.inactive_palette = color_range(
            style.inactive_begin_color,
            style.inactive_end_color,
            count,
        );

        let treatment = style.selection_style.treatment();
        let any_selected = self
            .layers
            .iter()
            .take(count)
            .any(|id| self.tree.get(*id).is_some_and(SegmentLayer::is_selected));
        let ref_count = count.max(self.layers.len());
        let mut to_remove: SmallVec<[usize; 8]> = SmallVec::new();
        let mut inserted = 0_usize;

        self.animator.begin();
        self.animator
            .set_completion(ChartCompletion::Notify(Box::new(on_complete)));
        self.animator.set_disable_actions(!animated);
        self.animator.set_duration(style.animation_duration);

        if let Some(background) = self.tree.get_mut(self.background) {
            background.set_frame(self.frame);
            background.set_line_width(style.line_width, &mut self.animator);
            background.set_padding(style.padding, &mut self.animator);
            background.set_color(style.background_color, &mut self.animator);
        }

        for index in 0..ref_count {
            if source.item(index).is_none() {
                to_remove.push(index);
                continue;
            }
            let start = source.start_angle(index);
            let end = source.end_angle(index);

            let Some(&id) = self.layers.get(index) else {
                let cx = selection_context(
                    &style,
                    &self.palette,
                    &self.inactive_palette,
                    index,
                    false,
                    any_selected,
                );
                let target = treatment.style(&cx);
                let id = self.tree.create(
                    self.frame,
                    start,
                    end,
                    target.line_width,
                    target.padding,
                    target.color,
                );
                self.tree.attach(id);
                self.layers.push(id);
                inserted += 1;

                if animated && let Some(layer) = self.tree.get(id) {
                    let entry = if full_circle {
                        0.0
                    } else if self.initial_load_complete {
                        TAU
                    } else {
                        start
                    };
                    layer.animate_insertion(entry, None, &mut self.animator);
                }
                continue;
            };

            let Some(layer) = self.tree.get_mut(id) else {
                continue;
            };
            let cx = selection_context(
                &style,
                &self.palette,
                &self.inactive_palette,
                index,
                layer.is_selected(),
                any_selected,
            );
            layer.set_frame(self.frame);
            layer.set_start_angle(start, &mut self.animator);
            layer.set_end_angle(end, &mut self.animator);
            apply_layer_style(layer, treatment.style(&cx), &mut self.animator);
        }

        // Highest index first so the remaining indices stay valid.
        for &index in to_remove.iter().rev() {
            if index >= self.layers.len() {
                continue;
            }
            let id = self.layers.remove(index);
            if let Some(layer) = self.tree.get_mut(id) {
                layer.set_selected(false);
                layer.animate_removal(
                    0.0,
                    0.0,
                    ChartCompletion::Detach { layer: id, then: None },
                    &mut self.animator,
                );
            }
        }

        let layer_count = self.layers.len();
        for (index, id) in self.layers.iter().enumerate() {
            if let Some(layer) = self.tree.get_mut(*id) {
                layer.set_cap_type(CapType::for_position(index, layer_count, full_circle));
            }
        }

        self.initial_load_complete = true;
        self.animator.commit();
        tracing::debug!(
            items = count,
            inserted,
            removed = to_remove.len(),
            full_circle,
            animated,
            "reload"
        );
    }

    /// Removes every segment from the data source and reloads.
    pub fn empty(&mut self, animated: bool) {
        let Some(source) = self.data_source.as_mut() else {
            return;
        };
        source.empty();
        self.reload(animated, || {});
    }

    /// Advances transitions by `dt` seconds and runs the completions that became due.
    pub fn tick(&mut self, dt: f64) {
        for completion in self.animator.tick(dt) {
            match completion {
                ChartCompletion::Notify(callback) => callback(),
                ChartCompletion::Detach { layer, then } => {
                    self.detach(layer);
                    if let Some(callback) = then {
                        callback();
                    }
                }
                ChartCompletion::Deplete {
                    collapsed,
                    color,
                    from_angle,
                    duration,
                    then,
                } => {
                    for layer in collapsed {
                        self.detach(layer);
                    }
                    self.play_depletion_segment(color, from_angle, duration, then);
                }
            }
        }
    }

    fn detach(&mut self, layer: LayerId) {
        self.animator.forget(layer);
        self.tree.detach(layer);
    }

    /// Paints the background ring and every attached layer, as currently presented.
    pub fn draw(&self, backend: &mut impl DrawingBackend) {
        let transform = self.chart_transform();
        for layer in self.tree.iter() {
            layer.draw(backend, &self.animator, transform);
        }
    }

    /// Index of the first live layer under `point` (host coordinates).
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let local = self.chart_transform().inverse() * point;
        self.layers.iter().position(|id| {
            self.tree
                .get(*id)
                .is_some_and(|layer| layer.contains(local, &self.animator))
        })
    }

    /// Handles the end of a touch at `point` (host coordinates).
    ///
    /// Tapping a segment toggles its selection; every other selected segment is deselected.
    pub fn touch_ended(&mut self, point: Point) {
        let has_items = self
            .data_source
            .as_ref()
            .is_some_and(|source| source.number_of_items() > 0);
        if !has_items {
            return;
        }
        let hit = self.hit_test(point);
        for index in 0..self.layers.len() {
            let selected = self.is_selected(index);
            if hit == Some(index) {
                self.set_selection(index, !selected);
            } else if selected {
                self.set_selection(index, false);
            }
        }
        self.apply_selection_style();
    }

    /// Selects the segment at `index`, deselecting any other.
    pub fn select(&mut self, index: usize) {
        if self.data_source.is_none() || index >= self.layers.len() {
            return;
        }
        for other in 0..self.layers.len() {
            if other != index {
                self.set_selection(other, false);
            }
        }
        self.set_selection(index, true);
        self.apply_selection_style();
    }

    /// Deselects the segment at `index`.
    pub fn deselect(&mut self, index: usize) {
        if self.data_source.is_none() || index >= self.layers.len() {
            return;
        }
        if self.set_selection(index, false) {
            self.apply_selection_style();
        }
    }

    /// Whether the live layer at `index` is selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.layer(index).is_some_and(SegmentLayer::is_selected)
    }

    /// Flips the selection flag and fires the matching handler. Returns whether it changed.
    fn set_selection(&mut self, index: usize, selected: bool) -> bool {
        let Some(layer) = self.layers.get(index).and_then(|id| self.tree.get_mut(*id)) else {
            return false;
        };
        if layer.is_selected() == selected {
            return false;
        }
        layer.set_selected(selected);
        tracing::debug!(index, selected, "selection changed");
        if selected {
            (self.select_handler)(index);
        } else {
            (self.deselect_handler)(index);
        }
        true
    }

    fn apply_selection_style(&mut self) {
        let style = self.style;
        let treatment = style.selection_style.treatment();
        let any_selected = (0..self.layers.len()).any(|index| self.is_selected(index));

        self.animator.begin();
        self.animator.set_duration(style.animation_duration);
        for (index, id) in self.layers.iter().enumerate() {
            let Some(layer) = self.tree.get_mut(*id) else {
                continue;
            };
            let cx = selection_context(
                &style,
                &self.palette,
                &self.inactive_palette,
                index,
                layer.is_selected(),
                any_selected,
            );
            apply_layer_style(layer, treatment.style(&cx), &mut self.animator);
        }
        self.animator.commit();
    }

    /// Animates any subset of color, start angle and end angle on every live layer at once.
    pub fn animate_segments(
        &mut self,
        color: Option<Color>,
        start_angle: Option<f64>,
        end_angle: Option<f64>,
        on_complete: impl FnOnce() + 'static,
    ) {
        if self.data_source.is_none() {
            return;
        }
        self.animator.begin();
        self.animator.set_duration(self.style.animation_duration);
        self.animator
            .set_completion(ChartCompletion::Notify(Box::new(on_complete)));
        for id in &self.layers {
            let Some(layer) = self.tree.get_mut(*id) else {
                continue;
            };
            if let Some(color) = color {
                layer.set_color(color, &mut self.animator);
            }
            if let Some(angle) = start_angle {
                layer.set_start_angle(angle, &mut self.animator);
            }
            if let Some(angle) = end_angle {
                layer.set_end_angle(angle, &mut self.animator);
            }
        }
        self.animator.commit();
    }

    /// Collapses the chart into one segment spanning `0..from_angle` and sweeps it away.
    ///
    /// Every live layer first recolors and closes towards `from_angle`, then is removed. A
    /// single segment capped at both ends then shrinks to nothing over `duration` seconds,
    /// after which `on_complete` runs. Reload afterwards to bring the data back.
    pub fn animate_depletion(
        &mut self,
        color: Color,
        from_angle: f64,
        duration: f64,
        on_complete: impl FnOnce() + 'static,
    ) {
        if self.data_source.is_none() {
            return;
        }
        let collapsed = core::mem::take(&mut self.layers);
        self.animator.begin();
        self.animator.set_duration(DEPLETION_COLLAPSE_DURATION);
        for id in &collapsed {
            let Some(layer) = self.tree.get_mut(*id) else {
                continue;
            };
            layer.set_selected(false);
            layer.set_color(color, &mut self.animator);
            layer.set_end_angle(from_angle, &mut self.animator);
        }
        self.animator.set_completion(ChartCompletion::Deplete {
            collapsed,
            color,
            from_angle,
            duration,
            then: Box::new(on_complete),
        });
        self.animator.commit();
    }

    fn play_depletion_segment(
        &mut self,
        color: Color,
        from_angle: f64,
        duration: f64,
        then: Callback,
    ) {
        let id = self.tree.create(
            self.frame,
            0.0,
            from_angle,
            self.style.line_width,
            self.style.padding,
            color,
        );
        self.tree.attach(id);
        let Some(layer) = self.tree.get_mut(id) else {
            return;
        };
        layer.set_cap_type(CapType::BothEnds);
        self.animator.begin();
        self.animator.set_duration(duration);
        layer.animate_removal(
            0.0,
            0.0,
            ChartCompletion::Detach {
                layer: id,
                then: Some(then),
            },
            &mut self.animator,
        );
        self.animator.commit();
    }
}
