// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable ring segments and the ordered tree that holds them.
//!
//! A [`SegmentLayer`] keeps *model* values (where the layer is heading). While the layer is
//! attached to a [`LayerTree`], writing one of the animatable properties records a tween on the
//! [`Animator`] from the currently presented value to the new one, unless the open transaction
//! disables actions. Detached layers take new values immediately, which keeps a freshly created
//! layer from sweeping in from its default values when it is first attached.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};
use peniko::Color;

use crate::animation::{AnimatedValue, Animator, LayerId, Property};
use crate::backend::DrawingBackend;
use crate::geometry::{CapType, SegmentGeometry};

/// A single drawable arc of the ring.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentLayer {
    id: LayerId,
    frame: Rect,
    start_angle: f64,
    end_angle: f64,
    line_width: f64,
    padding: f64,
    color: Color,
    cap_type: CapType,
    selected: bool,
    attached: bool,
}

impl SegmentLayer {
    /// Creates a detached, uncapped layer.
    pub fn new(
        id: LayerId,
        frame: Rect,
        start_angle: f64,
        end_angle: f64,
        line_width: f64,
        padding: f64,
        color: Color,
    ) -> Self {
        Self {
            id,
            frame,
            start_angle,
            end_angle,
            line_width,
            padding,
            color,
            cap_type: CapType::None,
            selected: false,
            attached: false,
        }
    }

    /// The layer identity.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The square frame the ring is inscribed in.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Model start angle.
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Model end angle.
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Model ring thickness.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Model inset from the frame.
    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Model fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Which ends are capped.
    pub fn cap_type(&self) -> CapType {
        self.cap_type
    }

    /// Whether the layer is currently selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the layer is part of a [`LayerTree`].
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Moves the layer to a new frame. Frames are never animated.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// Changes which ends are capped. Cap changes are never animated.
    pub fn set_cap_type(&mut self, cap_type: CapType) {
        self.cap_type = cap_type;
    }

    /// Marks the layer as selected or not. Visual treatment is up to the owner.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Sets the start angle.
    pub fn set_start_angle<C>(&mut self, value: f64, animator: &mut Animator<C>) {
        self.set_property(Property::StartAngle, AnimatedValue::Scalar(value), animator);
    }

    /// Sets the end angle.
    pub fn set_end_angle<C>(&mut self, value: f64, animator: &mut Animator<C>) {
        self.set_property(Property::EndAngle, AnimatedValue::Scalar(value), animator);
    }

    /// Sets the ring thickness.
    pub fn set_line_width<C>(&mut self, value: f64, animator: &mut Animator<C>) {
        self.set_property(Property::LineWidth, AnimatedValue::Scalar(value), animator);
    }

    /// Sets the inset from the frame.
    pub fn set_padding<C>(&mut self, value: f64, animator: &mut Animator<C>) {
        self.set_property(Property::Padding, AnimatedValue::Scalar(value), animator);
    }

    /// Sets the fill color.
    pub fn set_color<C>(&mut self, value: Color, animator: &mut Animator<C>) {
        self.set_property(Property::Color, AnimatedValue::Color(value), animator);
    }

    fn model_value(&self, property: Property) -> AnimatedValue {
        match property {
            Property::StartAngle => AnimatedValue::Scalar(self.start_angle),
            Property::EndAngle => AnimatedValue::Scalar(self.end_angle),
            Property::LineWidth => AnimatedValue::Scalar(self.line_width),
            Property::Padding => AnimatedValue::Scalar(self.padding),
            Property::Color => AnimatedValue::Color(self.color),
        }
    }

    fn write_model_value(&mut self, property: Property, value: AnimatedValue) {
        match (property, value) {
            (Property::StartAngle, AnimatedValue::Scalar(v)) => self.start_angle = v,
            (Property::EndAngle, AnimatedValue::Scalar(v)) => self.end_angle = v,
            (Property::LineWidth, AnimatedValue::Scalar(v)) => self.line_width = v,
            (Property::Padding, AnimatedValue::Scalar(v)) => self.padding = v,
            (Property::Color, AnimatedValue::Color(c)) => self.color = c,
            _ => {}
        }
    }

    fn set_property<C>(
        &mut self,
        property: Property,
        value: AnimatedValue,
        animator: &mut Animator<C>,
    ) {
        let presented = self.presented(property, animator);
        if self.attached && !animator.actions_disabled() && presented != value {
            animator.animate(self.id, property, presented, value);
        } else {
            animator.cancel(self.id, property);
        }
        self.write_model_value(property, value);
    }

    fn presented<C>(&self, property: Property, animator: &Animator<C>) -> AnimatedValue {
        animator
            .presented(self.id, property)
            .unwrap_or_else(|| self.model_value(property))
    }

    fn presented_scalar<C>(&self, property: Property, animator: &Animator<C>) -> f64 {
        match self.presented(property, animator) {
            AnimatedValue::Scalar(v) => v,
            AnimatedValue::Color(_) => 0.0,
        }
    }

    /// The color currently on screen.
    pub fn presented_color<C>(&self, animator: &Animator<C>) -> Color {
        self.presented(Property::Color, animator)
            .as_color()
            .unwrap_or(self.color)
    }

    /// The geometry currently on screen, including in-flight tweens.
    pub fn presentation<C>(&self, animator: &Animator<C>) -> SegmentGeometry {
        SegmentGeometry::new(
            self.frame,
            self.presented_scalar(Property::LineWidth, animator),
            self.presented_scalar(Property::Padding, animator),
            self.presented_scalar(Property::StartAngle, animator),
            self.presented_scalar(Property::EndAngle, animator),
        )
        .with_cap_type(self.cap_type)
    }

    /// The geometry the layer is heading towards.
    pub fn model_geometry(&self) -> SegmentGeometry {
        SegmentGeometry::new(
            self.frame,
            self.line_width,
            self.padding,
            self.start_angle,
            self.end_angle,
        )
        .with_cap_type(self.cap_type)
    }

    /// Plays the first appearance of the layer: both angles run from the given values to the
    /// current model angles. `from_end` defaults to `from_start`.
    pub fn animate_insertion<C>(
        &self,
        from_start: f64,
        from_end: Option<f64>,
        animator: &mut Animator<C>,
    ) {
        let from_end = from_end.unwrap_or(from_start);
        animator.animate(
            self.id,
            Property::StartAngle,
            AnimatedValue::Scalar(from_start),
            AnimatedValue::Scalar(self.start_angle),
        );
        animator.animate(
            self.id,
            Property::EndAngle,
            AnimatedValue::Scalar(from_end),
            AnimatedValue::Scalar(self.end_angle),
        );
    }

    /// Moves both angles to their exit values inside a transaction of its own that completes
    /// with `on_complete`.
    ///
    /// The completion is reported exactly once, after the exit transition has settled; its
    /// receiver is expected to detach the layer (see [`LayerTree::detach`]).
    pub fn animate_removal<C>(
        &mut self,
        exit_start: f64,
        exit_end: f64,
        on_complete: C,
        animator: &mut Animator<C>,
    ) {
        animator.begin();
        animator.set_completion(on_complete);
        self.set_start_angle(exit_start, animator);
        self.set_end_angle(exit_end, animator);
        animator.commit();
    }

    /// Fills the wedge and its exposed caps, as currently presented, through `transform`.
    pub fn draw<C>(
        &self,
        backend: &mut impl DrawingBackend,
        animator: &Animator<C>,
        transform: Affine,
    ) {
        let color = self.presented_color(animator);
        for path in self.presentation(animator).fill_paths() {
            backend.fill(&(transform * path), color);
        }
    }

    /// Whether `point` (in frame coordinates) hits the layer as currently presented.
    pub fn contains<C>(&self, point: Point, animator: &Animator<C>) -> bool {
        self.presentation(animator).contains(point)
    }
}

/// An ordered set of layers; order is paint order.
#[derive(Debug, Default)]
pub struct LayerTree {
    layers: HashMap<LayerId, SegmentLayer>,
    order: Vec<LayerId>,
    next_id: u64,
}

impl LayerTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a detached layer owned by the tree and returns its id.
    pub fn create(
        &mut self,
        frame: Rect,
        start_angle: f64,
        end_angle: f64,
        line_width: f64,
        padding: f64,
        color: Color,
    ) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.insert(
            id,
            SegmentLayer::new(id, frame, start_angle, end_angle, line_width, padding, color),
        );
        id
    }

    /// Attaches `id` on top of every other layer.
    pub fn attach(&mut self, id: LayerId) {
        self.insert_at(self.order.len(), id);
    }

    /// Attaches `id` at paint position `index` (clamped to the number of attached layers).
    pub fn insert_at(&mut self, index: usize, id: LayerId) {
        let Some(layer) = self.layers.get_mut(&id) else {
            return;
        };
        if layer.attached {
            return;
        }
        layer.attached = true;
        self.order.insert(index.min(self.order.len()), id);
    }

    /// Detaches and drops the layer, returning it.
    pub fn detach(&mut self, id: LayerId) -> Option<SegmentLayer> {
        self.order.retain(|&other| other != id);
        let mut layer = self.layers.remove(&id)?;
        layer.attached = false;
        Some(layer)
    }

    /// The layer with the given id.
    pub fn get(&self, id: LayerId) -> Option<&SegmentLayer> {
        self.layers.get(&id)
    }

    /// Mutable access to the layer with the given id.
    pub fn get_mut(&mut self, id: LayerId) -> Option<&mut SegmentLayer> {
        self.layers.get_mut(&id)
    }

    /// Attached layers in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &SegmentLayer> + '_ {
        self.order.iter().filter_map(|id| self.layers.get(id))
    }

    /// Every layer owned by the tree, attached or not.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SegmentLayer> + '_ {
        self.layers.values_mut()
    }

    /// Number of attached layers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no layer is attached.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec::Vec;
    use core::f64::consts::{FRAC_PI_2, PI};

    use kurbo::BezPath;
    use peniko::color::palette::css;

    use super::*;

    fn frame() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn tree_with_layer() -> (LayerTree, LayerId) {
        let mut tree = LayerTree::new();
        let id = tree.create(frame(), 0.0, FRAC_PI_2, 10.0, 0.0, css::RED);
        (tree, id)
    }

    #[test]
    fn detached_layers_apply_values_immediately() {
        let (mut tree, id) = tree_with_layer();
        let mut animator = Animator::<u32>::default();
        let layer = tree.get_mut(id).expect("created");
        layer.set_end_angle(PI, &mut animator);
        layer.set_line_width(30.0, &mut animator);
        assert!(!animator.is_animating(id), "detached layers never tween");
        assert_eq!(layer.presentation(&animator).end_angle, PI);
        assert_eq!(layer.presentation(&animator).line_width, 30.0);
    }

    #[test]
    fn attached_layers_tween_from_the_presented_value() {
        let (mut tree, id) = tree_with_layer();
        tree.attach(id);
        let mut animator = Animator::<u32>::default();
        let layer = tree.get_mut(id).expect("created");
        layer.set_end_angle(PI, &mut animator);
        assert_eq!(layer.end_angle(), PI, "model updates at once");
        assert_eq!(layer.presentation(&animator).end_angle, FRAC_PI_2);

        animator.tick(0.3);
        let mid = layer.presentation(&animator).end_angle;
        assert!(mid > FRAC_PI_2 && mid < PI, "presented {mid}");

        animator.tick(1.0);
        assert_eq!(layer.presentation(&animator).end_angle, PI);
    }

    #[test]
    fn disabled_actions_skip_and_cancel_tweens() {
        let (mut tree, id) = tree_with_layer();
        tree.attach(id);
        let mut animator = Animator::<u32>::default();
        let layer = tree.get_mut(id).expect("created");
        layer.set_color(css::BLUE, &mut animator);
        assert!(animator.is_animating(id), "color tween recorded");

        animator.begin();
        animator.set_disable_actions(true);
        layer.set_color(css::GREEN, &mut animator);
        animator.commit();
        assert!(!animator.is_animating(id), "disabled actions cancel the tween");
        assert_eq!(layer.presented_color(&animator), css::GREEN);
    }

    #[test]
    fn insertion_runs_from_the_given_angles() {
        let (mut tree, id) = tree_with_layer();
        tree.attach(id);
        let mut animator = Animator::<u32>::default();
        let layer = tree.get(id).expect("created");
        layer.animate_insertion(0.0, None, &mut animator);
        let start = layer.presentation(&animator);
        assert_eq!((start.start_angle, start.end_angle), (0.0, 0.0));
        animator.tick(1.0);
        let end = layer.presentation(&animator);
        assert_eq!((end.start_angle, end.end_angle), (0.0, FRAC_PI_2));
    }

    #[test]
    fn removal_completes_once_after_the_exit_transition() {
        let (mut tree, id) = tree_with_layer();
        tree.attach(id);
        let mut animator = Animator::<u32>::default();
        tree.get_mut(id)
            .expect("created")
            .animate_removal(0.0, 0.0, 42, &mut animator);

        assert!(animator.tick(0.5).is_empty(), "still collapsing");
        assert_eq!(animator.tick(0.5), [42]);
        assert!(animator.tick(1.0).is_empty(), "reported only once");

        let removed = tree.detach(id).expect("was attached");
        assert!(!removed.is_attached(), "detached");
        assert!(tree.is_empty(), "tree emptied");
    }

    #[test]
    fn draw_fills_the_wedge_and_caps_in_the_layer_color() {
        let (mut tree, id) = tree_with_layer();
        tree.attach(id);
        let animator = Animator::<u32>::default();
        let layer = tree.get_mut(id).expect("created");
        layer.set_cap_type(CapType::BothEnds);

        let mut fills: Vec<(BezPath, Color)> = Vec::new();
        layer.draw(&mut fills, &animator, Affine::IDENTITY);
        assert_eq!(fills.len(), 3);
        assert!(fills.iter().all(|(_, c)| *c == css::RED), "all fills share the color");
    }

    #[test]
    fn tree_keeps_paint_order() {
        let mut tree = LayerTree::new();
        let a = tree.create(frame(), 0.0, 1.0, 1.0, 0.0, css::RED);
        let b = tree.create(frame(), 0.0, 1.0, 1.0, 0.0, css::RED);
        let c = tree.create(frame(), 0.0, 1.0, 1.0, 0.0, css::RED);
        tree.attach(a);
        tree.attach(b);
        tree.insert_at(0, c);
        let order: Vec<_> = tree.iter().map(SegmentLayer::id).collect();
        assert_eq!(order, [c, a, b]);
        tree.detach(a);
        let order: Vec<_> = tree.iter().map(SegmentLayer::id).collect();
        assert_eq!(order, [c, b]);
        assert!(tree.get(a).is_none(), "detached layers are dropped");
    }
}
