// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic, host-ticked animation scheduler.
//!
//! Property changes are grouped into transactions. Each transaction may carry a completion
//! payload `C`, which is handed back from [`Animator::tick`] once every tween recorded in that
//! transaction has settled. Completions are never produced synchronously from
//! [`Animator::commit`]; even an empty transaction completes on the following tick.
//!
//! Tweens are keyed by `(LayerId, Property)`. Starting a new tween for a key that is still in
//! flight replaces the old one (last writer wins), and the replaced tween counts as settled for
//! its transaction.
//!
//! Nested transactions inherit `disable_actions` and the duration of their parent but keep an
//! independent completion.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use peniko::Color;

use crate::color_range::lerp_color;

/// The default duration of property transitions, in seconds.
pub const DEFAULT_ANIMATION_DURATION: f64 = 0.75;

/// Identity of a drawable layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// Animatable layer properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Start angle.
    StartAngle,
    /// End angle.
    EndAngle,
    /// Ring thickness.
    LineWidth,
    /// Inset from the frame.
    Padding,
    /// Fill color.
    Color,
}

/// A value that can be tweened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimatedValue {
    /// A scalar (angles, widths, paddings).
    Scalar(f64),
    /// A color, interpolated per sRGB component.
    Color(Color),
}

impl AnimatedValue {
    /// Interpolates towards `to` at progress `t` (`0..=1`).
    ///
    /// Mismatched kinds snap to `to`.
    pub fn interpolate(self, to: Self, t: f64) -> Self {
        match (self, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Color(a), Self::Color(b)) => Self::Color(lerp_color(a, b, t)),
            (_, to) => to,
        }
    }

    /// The scalar payload, if any.
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// The color payload, if any.
    pub fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

/// Timing curves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Fast start, slow finish: the cubic Bézier `(0, 0) (0.58, 1)`.
    #[default]
    EaseOut,
}

impl Easing {
    /// Maps linear progress `t` to eased progress. Both ends are fixed at `0` and `1`.
    pub fn apply(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::EaseOut => cubic_bezier_y_for_x(0.0, 0.0, 0.58, 1.0, t),
        }
    }
}

/// One coordinate of a cubic Bézier with endpoints `0` and `1`.
fn bezier_component(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn cubic_bezier_y_for_x(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    // x(s) is monotonic for control points inside the unit square, so bisection converges.
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..48 {
        let mid = 0.5 * (lo + hi);
        if bezier_component(x1, x2, mid) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier_component(y1, y2, 0.5 * (lo + hi))
}

/// Transaction id used for tweens recorded outside of any open transaction.
const IMPLICIT_TRANSACTION: u64 = 0;

#[derive(Clone, Copy, Debug)]
struct Tween {
    transaction: u64,
    from: AnimatedValue,
    to: AnimatedValue,
    start: f64,
    duration: f64,
    easing: Easing,
}

impl Tween {
    fn is_settled(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }

    fn sample(&self, now: f64) -> AnimatedValue {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - self.start) / self.duration).clamp(0.0, 1.0);
        self.from.interpolate(self.to, self.easing.apply(t))
    }
}

#[derive(Debug)]
struct OpenTransaction<C> {
    id: u64,
    completion: Option<C>,
    disable_actions: bool,
    duration: f64,
}

#[derive(Debug)]
struct CommittedTransaction<C> {
    id: u64,
    completion: Option<C>,
}

/// Batches property tweens into transactions and reports their completion.
#[derive(Debug)]
pub struct Animator<C> {
    now: f64,
    default_duration: f64,
    next_transaction: u64,
    open: Vec<OpenTransaction<C>>,
    committed: Vec<CommittedTransaction<C>>,
    tweens: HashMap<(LayerId, Property), Tween>,
}

impl<C> Default for Animator<C> {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_DURATION)
    }
}

impl<C> Animator<C> {
    /// Creates a scheduler whose implicit transactions last `default_duration` seconds.
    pub fn new(default_duration: f64) -> Self {
        Self {
            now: 0.0,
            default_duration: default_duration.max(0.0),
            next_transaction: IMPLICIT_TRANSACTION + 1,
            open: Vec::new(),
            committed: Vec::new(),
            tweens: HashMap::new(),
        }
    }

    /// The scheduler clock, in seconds since creation.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Opens a (possibly nested) transaction.
    pub fn begin(&mut self) {
        let (disable_actions, duration) = self
            .open
            .last()
            .map_or((false, self.default_duration), |parent| {
                (parent.disable_actions, parent.duration)
            });
        let id = self.next_transaction;
        self.next_transaction += 1;
        tracing::trace!(transaction = id, depth = self.open.len(), "begin transaction");
        self.open.push(OpenTransaction {
            id,
            completion: None,
            disable_actions,
            duration,
        });
    }

    /// Sets the completion of the innermost open transaction.
    pub fn set_completion(&mut self, completion: C) {
        if let Some(txn) = self.open.last_mut() {
            txn.completion = Some(completion);
        }
    }

    /// Disables implicit property animations in the innermost open transaction.
    pub fn set_disable_actions(&mut self, disable: bool) {
        if let Some(txn) = self.open.last_mut() {
            txn.disable_actions = disable;
        }
    }

    /// Sets the tween duration of the innermost open transaction.
    pub fn set_duration(&mut self, duration: f64) {
        if let Some(txn) = self.open.last_mut() {
            txn.duration = duration.max(0.0);
        }
    }

    /// Closes the innermost open transaction.
    ///
    /// Its completion is reported by a later [`tick`](Self::tick), once its tweens settle.
    pub fn commit(&mut self) {
        let Some(txn) = self.open.pop() else {
            return;
        };
        tracing::trace!(transaction = txn.id, "commit transaction");
        self.committed.push(CommittedTransaction {
            id: txn.id,
            completion: txn.completion,
        });
    }

    /// Whether implicit property animations are currently disabled.
    pub fn actions_disabled(&self) -> bool {
        self.open.last().is_some_and(|txn| txn.disable_actions)
    }

    /// The duration applied to tweens recorded now.
    pub fn duration(&self) -> f64 {
        self.open
            .last()
            .map_or(self.default_duration, |txn| txn.duration)
    }

    /// Records an ease-out tween from `from` to `to` for `property` of `layer`.
    pub fn animate(
        &mut self,
        layer: LayerId,
        property: Property,
        from: AnimatedValue,
        to: AnimatedValue,
    ) {
        self.animate_with(layer, property, from, to, Easing::EaseOut);
    }

    /// Records a tween with an explicit timing curve.
    pub fn animate_with(
        &mut self,
        layer: LayerId,
        property: Property,
        from: AnimatedValue,
        to: AnimatedValue,
        easing: Easing,
    ) {
        let transaction = self
            .open
            .last()
            .map_or(IMPLICIT_TRANSACTION, |txn| txn.id);
        self.tweens.insert(
            (layer, property),
            Tween {
                transaction,
                from,
                to,
                start: self.now,
                duration: self.duration(),
                easing,
            },
        );
    }

    /// Drops the in-flight tween for one property, if any.
    pub fn cancel(&mut self, layer: LayerId, property: Property) {
        self.tweens.remove(&(layer, property));
    }

    /// Drops every in-flight tween of `layer`.
    pub fn forget(&mut self, layer: LayerId) {
        self.tweens.retain(|(id, _), _| *id != layer);
    }

    /// The currently presented value of an in-flight tween.
    pub fn presented(&self, layer: LayerId, property: Property) -> Option<AnimatedValue> {
        self.tweens
            .get(&(layer, property))
            .map(|tween| tween.sample(self.now))
    }

    /// Whether `layer` has any tween in flight.
    pub fn is_animating(&self, layer: LayerId) -> bool {
        self.tweens.keys().any(|(id, _)| *id == layer)
    }

    /// Whether there is nothing left to animate or report.
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.committed.is_empty()
    }

    /// Advances the clock by `dt` seconds and returns the completions that became due,
    /// in commit order.
    pub fn tick(&mut self, dt: f64) -> Vec<C> {
        self.now += dt.max(0.0);
        let now = self.now;
        self.tweens.retain(|_, tween| !tween.is_settled(now));

        let tweens = &self.tweens;
        let mut due = Vec::new();
        self.committed.retain_mut(|txn| {
            if tweens.values().any(|tween| tween.transaction == txn.id) {
                return true;
            }
            tracing::trace!(transaction = txn.id, "transaction complete");
            if let Some(completion) = txn.completion.take() {
                due.push(completion);
            }
            false
        });
        due
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    const LAYER: LayerId = LayerId(7);

    fn scalar(animator: &Animator<u32>, property: Property) -> Option<f64> {
        animator
            .presented(LAYER, property)
            .and_then(AnimatedValue::as_scalar)
    }

    #[test]
    fn ease_out_is_pinned_and_monotonic() {
        assert_eq!(Easing::EaseOut.apply(0.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(1.0), 1.0);
        let mut last = 0.0;
        for i in 1..100 {
            let v = Easing::EaseOut.apply(f64::from(i) / 100.0);
            assert!(v >= last, "ease-out must not go backwards at {i}");
            last = v;
        }
        // Ease-out front-loads progress.
        assert!(Easing::EaseOut.apply(0.5) > 0.5, "ease-out runs ahead at the midpoint");
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn completion_is_never_synchronous() {
        let mut animator = Animator::<u32>::default();
        animator.begin();
        animator.set_completion(1);
        animator.commit();
        assert!(!animator.is_idle(), "committed transaction awaits a tick");
        assert_eq!(animator.tick(0.0), [1]);
        assert!(animator.is_idle(), "nothing left after completion");
    }

    #[test]
    fn completion_waits_for_tweens() {
        let mut animator = Animator::<u32>::default();
        animator.begin();
        animator.set_completion(5);
        animator.animate(
            LAYER,
            Property::EndAngle,
            AnimatedValue::Scalar(0.0),
            AnimatedValue::Scalar(1.0),
        );
        animator.commit();

        assert!(animator.tick(0.5).is_empty(), "tween still running");
        let mid = scalar(&animator, Property::EndAngle).expect("tween in flight");
        assert!(mid > 0.5 && mid < 1.0, "eased midpoint {mid}");
        assert_eq!(animator.tick(0.5), [5]);
        assert_eq!(scalar(&animator, Property::EndAngle), None);
    }

    #[test]
    fn nested_transactions_inherit_settings_but_complete_independently() {
        let mut animator = Animator::<u32>::default();
        animator.begin();
        animator.set_completion(1);
        animator.set_duration(2.0);
        animator.set_disable_actions(true);

        animator.begin();
        assert!(animator.actions_disabled(), "inherited disable flag");
        assert_eq!(animator.duration(), 2.0);
        animator.set_duration(0.5);
        animator.set_completion(2);
        animator.animate(
            LAYER,
            Property::StartAngle,
            AnimatedValue::Scalar(1.0),
            AnimatedValue::Scalar(0.0),
        );
        animator.commit();

        animator.animate(
            LAYER,
            Property::Padding,
            AnimatedValue::Scalar(0.0),
            AnimatedValue::Scalar(4.0),
        );
        animator.commit();

        assert_eq!(animator.tick(0.5), [2]);
        assert!(animator.tick(1.0).is_empty(), "outer still running");
        assert_eq!(animator.tick(0.5), [1]);
    }

    #[test]
    fn replacing_a_tween_settles_the_old_transaction() {
        let mut animator = Animator::<u32>::default();
        animator.begin();
        animator.set_completion(1);
        animator.animate(
            LAYER,
            Property::LineWidth,
            AnimatedValue::Scalar(0.0),
            AnimatedValue::Scalar(10.0),
        );
        animator.commit();

        animator.begin();
        animator.set_completion(2);
        animator.animate(
            LAYER,
            Property::LineWidth,
            AnimatedValue::Scalar(3.0),
            AnimatedValue::Scalar(20.0),
        );
        animator.commit();

        assert_eq!(animator.tick(0.1), [1]);
        assert_eq!(animator.tick(1.0), [2]);
    }

    #[test]
    fn colors_interpolate_per_component() {
        let from = AnimatedValue::Color(Color::new([0.0, 0.0, 0.0, 1.0]));
        let to = AnimatedValue::Color(Color::new([1.0, 0.5, 0.0, 1.0]));
        let mid = from.interpolate(to, 0.5).as_color().expect("color");
        assert_eq!(mid.components, [0.5, 0.25, 0.0, 1.0]);
        assert_eq!(from.interpolate(AnimatedValue::Scalar(3.0), 0.1).as_scalar(), Some(3.0));
    }

    #[test]
    fn forget_drops_all_tweens_of_a_layer() {
        let mut animator = Animator::<u32>::default();
        for property in [Property::StartAngle, Property::Color] {
            animator.animate(
                LAYER,
                property,
                AnimatedValue::Scalar(0.0),
                AnimatedValue::Scalar(1.0),
            );
        }
        assert!(animator.is_animating(LAYER), "two tweens in flight");
        animator.forget(LAYER);
        assert!(!animator.is_animating(LAYER), "forgotten");
        assert!(animator.is_idle(), "implicit tweens leave no transactions behind");
    }
}
