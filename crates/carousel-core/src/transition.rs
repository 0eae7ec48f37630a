#![forbid(unsafe_code)]

//! Transition lifecycle machine.
//!
//! ```text
//!            request_drag            end_drag
//!   Idle ───────────────▶ Dragging ───────────▶ Committing
//!    ▲  ◀──── vertical lock ───┘                    │
//!    │                                              │ poll(now ≥ deadline)
//!    └──────────────────────────────────────────────┘
//!    └──── request_go_to / next / prev ──▶ Committing
//! ```
//!
//! At most one transition is in flight: requests that arrive while
//! Committing (or while Dragging, for programmatic navigation) are dropped
//! and reported as [`TransitionEffect::Noop`]. A dropped request never
//! touches the [`PositionModel`].
//!
//! The commit deadline is authoritative. The controller does not wait for a
//! visual "transition end"; once `animation_speed` has elapsed the next
//! [`poll`](TransitionController::poll) settles the index.
//!
//! Every operation returns a [`Transition`] record with a monotonically
//! increasing `transition_id`, so hosts and tests can replay the exact
//! sequence of decisions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{CarouselConfig, GestureConfig};
use crate::gesture::{AxisLock, GestureOutcome, GestureTracker, GestureUpdate};
use crate::pointer::Sample;
use crate::position::{PositionModel, TrackLayout};

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    /// Resting at the current index.
    #[default]
    Idle,
    /// Tracking pointer input; the offset floats freely.
    Dragging,
    /// Animating toward a resolved index.
    Committing,
}

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// The carousel has no slides.
    Dormant,
    /// A drag owns the track.
    DragInProgress,
    /// A commit animation has not settled yet.
    TransitionInFlight,
    /// Drag input arrived without a drag.
    NotDragging,
    /// The gesture has not moved far enough to pick an axis.
    AxisUndetermined,
    /// The carousel was cleaned up.
    TornDown,
}

/// Effect of one controller step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TransitionEffect {
    DragStarted {
        baseline: f32,
    },
    LiveOffset {
        offset: f32,
    },
    /// Vertical scroll took over; the track is back at its resting offset.
    DragCancelled {
        index: usize,
        offset: f32,
    },
    /// An animated move toward `to` has begun.
    Committed {
        from: usize,
        to: usize,
        offset: f32,
        duration: Duration,
    },
    /// Moved without animation.
    Jumped {
        index: usize,
        offset: f32,
    },
    /// The commit deadline passed. `reanchored` is set when the resting
    /// offset differs from the animated one (clone wrap, or a layout change
    /// while committing) and must be applied without animation.
    Settled {
        index: usize,
        offset: f32,
        reanchored: bool,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One recorded step of the lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub transition_id: u64,
    pub from: TransitionState,
    pub to: TransitionState,
    pub effect: TransitionEffect,
}

impl Transition {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self.effect, TransitionEffect::Noop { .. })
    }

    /// The noop reason, if this step did nothing.
    #[must_use]
    pub const fn noop_reason(&self) -> Option<NoopReason> {
        match self.effect {
            TransitionEffect::Noop { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Index change chosen at the end of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDecision {
    /// Go to `current + 1`.
    Advance,
    /// Go to `current - 1`.
    Retreat,
    /// Stay on `current`.
    SnapBack,
}

impl SwipeDecision {
    /// Apply the swipe rule: commit one step when either the distance or the
    /// release speed strictly exceeds its threshold.
    ///
    /// Negative displacement (dragging left) advances. When displacement is
    /// exactly zero the velocity sign picks the direction.
    #[must_use]
    pub fn decide(displacement: f32, velocity: f32, config: &GestureConfig) -> Self {
        let far = displacement.abs() > config.swipe_threshold;
        let fast = velocity.abs() > config.velocity_threshold;
        if !(far || fast) {
            return Self::SnapBack;
        }
        let direction = if displacement != 0.0 {
            displacement
        } else {
            velocity
        };
        if direction < 0.0 {
            Self::Advance
        } else {
            Self::Retreat
        }
    }

    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            Self::Advance => 1,
            Self::Retreat => -1,
            Self::SnapBack => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingCommit {
    target: usize,
    deadline: Duration,
    via_clone: bool,
}

/// Drives [`PositionModel`] from drags and navigation requests.
#[derive(Debug, Clone)]
pub struct TransitionController {
    position: PositionModel,
    tracker: GestureTracker,
    animation_speed: Duration,
    state: TransitionState,
    pending: Option<PendingCommit>,
    transition_counter: u64,
}

impl TransitionController {
    #[must_use]
    pub fn new(position: PositionModel, gesture: GestureConfig, animation_speed: Duration) -> Self {
        Self {
            position,
            tracker: GestureTracker::new(gesture),
            animation_speed,
            state: TransitionState::Idle,
            pending: None,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &CarouselConfig, slide_count: usize, slide_width: f32) -> Self {
        Self::new(
            PositionModel::from_config(config, slide_count, slide_width),
            config.gesture,
            config.animation_speed,
        )
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> TransitionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> &PositionModel {
        &self.position
    }

    #[inline]
    #[must_use]
    pub const fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.position.current_index()
    }

    #[inline]
    #[must_use]
    pub const fn animation_speed(&self) -> Duration {
        self.animation_speed
    }

    /// When the in-flight commit settles, if one is in flight.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.deadline)
    }

    /// Start a drag at `sample`. Only valid from Idle.
    pub fn request_drag(&mut self, sample: Sample) -> Transition {
        if let Some(reason) = self.busy_reason() {
            return self.noop(reason);
        }
        if self.position.slide_count() == 0 {
            return self.noop(NoopReason::Dormant);
        }
        let from = self.state;
        let baseline = self.position.offset();
        let bounds = self.position.drag_bounds();
        self.tracker.begin(sample, baseline, bounds);
        self.position.begin_drag();
        self.state = TransitionState::Dragging;
        self.record(from, TransitionEffect::DragStarted { baseline })
    }

    /// Feed a move sample to the active drag.
    pub fn update_drag(&mut self, sample: Sample) -> Transition {
        if self.state != TransitionState::Dragging {
            return self.noop(NoopReason::NotDragging);
        }
        match self.tracker.update(sample) {
            GestureUpdate::LiveOffset(offset) => {
                self.position.apply_offset(offset);
                self.record(
                    TransitionState::Dragging,
                    TransitionEffect::LiveOffset { offset },
                )
            }
            GestureUpdate::CancelDrag => self.abort_drag(),
            GestureUpdate::Undetermined => self.noop(NoopReason::AxisUndetermined),
            GestureUpdate::Inactive => self.noop(NoopReason::NotDragging),
        }
    }

    /// Release the drag at `sample` and commit to the index picked by
    /// [`SwipeDecision::decide`].
    pub fn end_drag(&mut self, sample: Sample, now: Duration) -> Transition {
        if self.state != TransitionState::Dragging {
            return self.noop(NoopReason::NotDragging);
        }
        let outcome = self
            .tracker
            .end(sample)
            .unwrap_or_else(|| GestureOutcome::stationary(AxisLock::Undetermined, Duration::ZERO));
        let decision = SwipeDecision::decide(
            outcome.displacement,
            outcome.velocity,
            self.tracker.config(),
        );
        tracing::debug!(
            target: "carousel.transition",
            ?decision,
            displacement = outcome.displacement,
            velocity = outcome.velocity,
            "drag released"
        );
        let requested = self.position.current_index() as i64 + decision.step();
        self.commit(requested, now)
    }

    /// Abandon the active drag and rest on the current index.
    pub fn cancel_drag(&mut self) -> Transition {
        if self.state != TransitionState::Dragging {
            return self.noop(NoopReason::NotDragging);
        }
        self.abort_drag()
    }

    /// Move to `index` (normalized by the boundary policy). Only valid from
    /// Idle.
    pub fn request_go_to(&mut self, index: i64, animate: bool, now: Duration) -> Transition {
        if let Some(reason) = self.busy_reason() {
            return self.noop(reason);
        }
        if self.position.slide_count() == 0 {
            return self.noop(NoopReason::Dormant);
        }
        if animate {
            self.commit(index, now)
        } else {
            let target = self.position.normalize(index);
            self.position.settle(target);
            let offset = self.position.offset();
            self.record(
                TransitionState::Idle,
                TransitionEffect::Jumped {
                    index: target,
                    offset,
                },
            )
        }
    }

    pub fn next(&mut self, now: Duration) -> Transition {
        self.request_go_to(self.position.current_index() as i64 + 1, true, now)
    }

    pub fn prev(&mut self, now: Duration) -> Transition {
        self.request_go_to(self.position.current_index() as i64 - 1, true, now)
    }

    /// Replace the layout and realign on the current index without
    /// animation.
    ///
    /// While Dragging or Committing the realign is rejected; the new layout
    /// still takes effect when the track next settles.
    pub fn relayout(&mut self, layout: TrackLayout, now: Duration) -> Transition {
        self.position.set_layout(layout);
        self.request_go_to(self.position.current_index() as i64, false, now)
    }

    /// Settle the in-flight commit once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<Transition> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        let animated = self.position.offset();
        self.position.settle(pending.target);
        let offset = self.position.offset();
        let reanchored = pending.via_clone || offset != animated;
        self.state = TransitionState::Idle;
        tracing::debug!(
            target: "carousel.transition",
            index = pending.target,
            offset,
            reanchored,
            "commit settled"
        );
        Some(self.record(
            TransitionState::Committing,
            TransitionEffect::Settled {
                index: pending.target,
                offset,
                reanchored,
            },
        ))
    }

    fn busy_reason(&self) -> Option<NoopReason> {
        match self.state {
            TransitionState::Idle => None,
            TransitionState::Dragging => Some(NoopReason::DragInProgress),
            TransitionState::Committing => Some(NoopReason::TransitionInFlight),
        }
    }

    fn commit(&mut self, requested: i64, now: Duration) -> Transition {
        let from_state = self.state;
        let from = self.position.current_index();
        let target = self.position.normalize(requested);

        if self.animation_speed.is_zero() {
            self.position.settle(target);
            let offset = self.position.offset();
            self.state = TransitionState::Idle;
            return self.record(
                from_state,
                TransitionEffect::Jumped {
                    index: target,
                    offset,
                },
            );
        }

        let offset = self.position.animation_offset(requested);
        let via_clone = self.position.lands_on_clone(requested);
        self.position.begin_animation(offset);
        self.state = TransitionState::Committing;
        self.pending = Some(PendingCommit {
            target,
            deadline: now.saturating_add(self.animation_speed),
            via_clone,
        });
        tracing::debug!(
            target: "carousel.transition",
            from,
            to = target,
            offset,
            via_clone,
            "commit started"
        );
        self.record(
            from_state,
            TransitionEffect::Committed {
                from,
                to: target,
                offset,
                duration: self.animation_speed,
            },
        )
    }

    fn abort_drag(&mut self) -> Transition {
        self.tracker.cancel();
        let index = self.position.current_index();
        self.position.settle(index);
        let offset = self.position.offset();
        self.state = TransitionState::Idle;
        tracing::debug!(target: "carousel.transition", index, "drag cancelled");
        self.record(
            TransitionState::Dragging,
            TransitionEffect::DragCancelled { index, offset },
        )
    }

    /// Record a step that did nothing.
    pub(crate) fn noop(&mut self, reason: NoopReason) -> Transition {
        tracing::debug!(
            target: "carousel.transition",
            ?reason,
            state = ?self.state,
            "request dropped"
        );
        self.record(self.state, TransitionEffect::Noop { reason })
    }

    fn record(&mut self, from: TransitionState, effect: TransitionEffect) -> Transition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        Transition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoopStrategy;
    use crate::position::Boundary;

    const SPEED: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn at(x: f32, y: f32, t: u64) -> Sample {
        Sample::new(x, y, ms(t))
    }

    fn controller_with(boundary: Boundary, strategy: LoopStrategy) -> TransitionController {
        let position = PositionModel::new(5, TrackLayout::new(300.0, 8.0, 0.0), boundary, strategy);
        TransitionController::new(position, GestureConfig::default(), SPEED)
    }

    fn controller() -> TransitionController {
        controller_with(Boundary::Clamp, LoopStrategy::Rewind)
    }

    fn settle(ctl: &mut TransitionController) -> Transition {
        let deadline = ctl.deadline().expect("commit in flight");
        ctl.poll(deadline).expect("settles at deadline")
    }

    // ── Swipe decision ──────────────────────────────────────────────

    #[test]
    fn distance_rule_advances() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(-60.0, 0.1, &cfg), SwipeDecision::Advance);
    }

    #[test]
    fn velocity_rule_advances_under_distance_threshold() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(-10.0, 0.5, &cfg), SwipeDecision::Advance);
    }

    #[test]
    fn slow_short_drag_snaps_back() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(-20.0, 0.05, &cfg), SwipeDecision::SnapBack);
    }

    #[test]
    fn positive_displacement_retreats() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(80.0, -0.1, &cfg), SwipeDecision::Retreat);
    }

    #[test]
    fn thresholds_are_strict() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(-50.0, 0.3, &cfg), SwipeDecision::SnapBack);
    }

    #[test]
    fn zero_displacement_uses_velocity_sign() {
        let cfg = GestureConfig::default();
        assert_eq!(SwipeDecision::decide(0.0, 0.9, &cfg), SwipeDecision::Retreat);
        assert_eq!(SwipeDecision::decide(0.0, -0.9, &cfg), SwipeDecision::Advance);
    }

    // ── Drag lifecycle ──────────────────────────────────────────────

    #[test]
    fn swipe_commits_then_settles_on_next_index() {
        let mut ctl = controller();
        let started = ctl.request_drag(at(200.0, 0.0, 0));
        assert_eq!(started.effect, TransitionEffect::DragStarted { baseline: 0.0 });
        assert_eq!(ctl.state(), TransitionState::Dragging);

        ctl.update_drag(at(170.0, 0.0, 50));
        let committed = ctl.end_drag(at(140.0, 0.0, 100), ms(100));
        assert_eq!(
            committed.effect,
            TransitionEffect::Committed {
                from: 0,
                to: 1,
                offset: -308.0,
                duration: SPEED,
            }
        );
        assert_eq!(committed.to, TransitionState::Committing);
        assert!(ctl.position().is_animating());
        assert_eq!(ctl.current_index(), 0);

        assert!(ctl.poll(ms(599)).is_none());
        let settled = ctl.poll(ms(600)).unwrap();
        assert_eq!(
            settled.effect,
            TransitionEffect::Settled {
                index: 1,
                offset: -308.0,
                reanchored: false,
            }
        );
        assert_eq!(ctl.state(), TransitionState::Idle);
        assert_eq!(ctl.current_index(), 1);
        assert!(ctl.position().is_resting());
    }

    #[test]
    fn short_drag_held_before_release_snaps_back() {
        let mut ctl = controller();
        ctl.request_drag(at(200.0, 0.0, 0));
        ctl.update_drag(at(180.0, 0.0, 10));
        let committed = ctl.end_drag(at(180.0, 0.0, 2010), ms(2010));
        assert_eq!(
            committed.effect,
            TransitionEffect::Committed {
                from: 0,
                to: 0,
                offset: 0.0,
                duration: SPEED,
            }
        );
        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn short_flick_released_immediately_advances() {
        let mut ctl = controller();
        ctl.request_drag(at(200.0, 0.0, 0));
        ctl.update_drag(at(180.0, 0.0, 10));
        let committed = ctl.end_drag(at(180.0, 0.0, 20), ms(20));
        assert!(matches!(
            committed.effect,
            TransitionEffect::Committed { from: 0, to: 1, .. }
        ));
    }

    #[test]
    fn tap_snaps_back_to_current_index() {
        let mut ctl = controller();
        ctl.request_drag(at(100.0, 100.0, 0));
        let committed = ctl.end_drag(at(101.0, 100.0, 120), ms(120));
        assert!(matches!(
            committed.effect,
            TransitionEffect::Committed { from: 0, to: 0, .. }
        ));
        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 0);
    }

    #[test]
    fn vertical_gesture_cancels_without_changing_index() {
        let mut ctl = controller();
        ctl.request_go_to(2, false, ms(0));
        ctl.request_drag(at(100.0, 100.0, 10));
        let cancelled = ctl.update_drag(at(90.0, 300.0, 30));
        assert_eq!(
            cancelled.effect,
            TransitionEffect::DragCancelled {
                index: 2,
                offset: -616.0,
            }
        );
        assert_eq!(ctl.state(), TransitionState::Idle);
        assert_eq!(ctl.current_index(), 2);
        // Further moves and the release are ignored.
        assert_eq!(
            ctl.end_drag(at(-400.0, 300.0, 60), ms(60)).noop_reason(),
            Some(NoopReason::NotDragging)
        );
        assert_eq!(ctl.current_index(), 2);
    }

    #[test]
    fn undetermined_move_is_reported_as_noop() {
        let mut ctl = controller();
        ctl.request_drag(at(0.0, 0.0, 0));
        let step = ctl.update_drag(at(2.0, 1.0, 16));
        assert_eq!(step.noop_reason(), Some(NoopReason::AxisUndetermined));
        assert_eq!(ctl.state(), TransitionState::Dragging);
    }

    #[test]
    fn live_offset_moves_the_track() {
        let mut ctl = controller();
        ctl.request_go_to(1, false, ms(0));
        ctl.request_drag(at(200.0, 0.0, 0));
        let step = ctl.update_drag(at(180.0, 0.0, 16));
        assert_eq!(step.effect, TransitionEffect::LiveOffset { offset: -328.0 });
        assert_eq!(ctl.position().offset(), -328.0);
    }

    #[test]
    fn drag_is_rejected_while_committing() {
        let mut ctl = controller();
        ctl.next(ms(0));
        let before = ctl.position().clone();
        let rejected = ctl.request_drag(at(0.0, 0.0, 10));
        assert_eq!(rejected.noop_reason(), Some(NoopReason::TransitionInFlight));
        assert_eq!(ctl.position(), &before);
    }

    #[test]
    fn cancel_drag_restores_resting_offset() {
        let mut ctl = controller();
        ctl.request_drag(at(200.0, 0.0, 0));
        ctl.update_drag(at(100.0, 0.0, 16));
        let cancelled = ctl.cancel_drag();
        assert!(matches!(cancelled.effect, TransitionEffect::DragCancelled { index: 0, .. }));
        assert_eq!(ctl.position().offset(), 0.0);
        assert!(!ctl.tracker().is_active());
    }

    // ── Programmatic navigation ─────────────────────────────────────

    #[test]
    fn second_request_while_committing_is_dropped() {
        let mut ctl = controller();
        ctl.next(ms(0));
        let before = ctl.position().clone();
        let dropped = ctl.request_go_to(4, true, ms(100));
        assert_eq!(dropped.noop_reason(), Some(NoopReason::TransitionInFlight));
        assert_eq!(dropped.from, TransitionState::Committing);
        assert_eq!(dropped.to, TransitionState::Committing);
        assert_eq!(ctl.position(), &before);
        assert_eq!(ctl.deadline(), Some(SPEED));

        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 1);
    }

    #[test]
    fn navigation_is_rejected_while_dragging() {
        let mut ctl = controller();
        ctl.request_drag(at(0.0, 0.0, 0));
        assert_eq!(ctl.next(ms(5)).noop_reason(), Some(NoopReason::DragInProgress));
        assert_eq!(ctl.state(), TransitionState::Dragging);
    }

    #[test]
    fn clamp_boundary_holds_at_edges() {
        let mut ctl = controller();
        ctl.prev(ms(0));
        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 0);

        ctl.request_go_to(4, false, ms(600));
        ctl.next(ms(600));
        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 4);
    }

    #[test]
    fn rewind_wraps_straight_to_target() {
        let mut ctl = controller_with(Boundary::Wrap, LoopStrategy::Rewind);
        ctl.request_go_to(4, false, ms(0));
        let committed = ctl.next(ms(0));
        assert!(matches!(
            committed.effect,
            TransitionEffect::Committed { from: 4, to: 0, offset, .. } if offset == 0.0
        ));
        let settled = settle(&mut ctl);
        assert!(matches!(
            settled.effect,
            TransitionEffect::Settled { index: 0, reanchored: false, .. }
        ));
    }

    #[test]
    fn clones_wrap_onto_clone_then_reanchor() {
        let mut ctl = controller_with(Boundary::Wrap, LoopStrategy::Clones);
        ctl.request_go_to(4, false, ms(0));
        assert_eq!(ctl.position().offset(), -1540.0);

        let committed = ctl.next(ms(0));
        assert!(matches!(
            committed.effect,
            TransitionEffect::Committed { from: 4, to: 0, offset, .. } if offset == -1848.0
        ));
        let settled = settle(&mut ctl);
        assert_eq!(
            settled.effect,
            TransitionEffect::Settled {
                index: 0,
                offset: -308.0,
                reanchored: true,
            }
        );
    }

    #[test]
    fn clones_wrap_backward_onto_leading_clone() {
        let mut ctl = controller_with(Boundary::Wrap, LoopStrategy::Clones);
        let committed = ctl.prev(ms(0));
        assert!(matches!(
            committed.effect,
            TransitionEffect::Committed { from: 0, to: 4, offset, .. } if offset == 0.0
        ));
        settle(&mut ctl);
        assert_eq!(ctl.current_index(), 4);
        assert_eq!(ctl.position().offset(), -1540.0);
    }

    #[test]
    fn zero_animation_speed_jumps() {
        let position = PositionModel::new(
            3,
            TrackLayout::new(100.0, 0.0, 0.0),
            Boundary::Clamp,
            LoopStrategy::Rewind,
        );
        let mut ctl = TransitionController::new(position, GestureConfig::default(), Duration::ZERO);
        let jumped = ctl.next(ms(0));
        assert_eq!(
            jumped.effect,
            TransitionEffect::Jumped {
                index: 1,
                offset: -100.0,
            }
        );
        assert_eq!(ctl.state(), TransitionState::Idle);
        assert!(ctl.deadline().is_none());
    }

    #[test]
    fn dormant_controller_rejects_everything() {
        let position = PositionModel::new(
            0,
            TrackLayout::new(300.0, 8.0, 0.0),
            Boundary::Wrap,
            LoopStrategy::Clones,
        );
        let mut ctl = TransitionController::new(position, GestureConfig::default(), SPEED);
        assert_eq!(ctl.next(ms(0)).noop_reason(), Some(NoopReason::Dormant));
        assert_eq!(
            ctl.request_drag(at(0.0, 0.0, 0)).noop_reason(),
            Some(NoopReason::Dormant)
        );
        assert_eq!(ctl.current_index(), 0);
    }

    // ── Relayout ────────────────────────────────────────────────────

    #[test]
    fn relayout_when_idle_realigns_without_animation() {
        let mut ctl = controller();
        ctl.request_go_to(2, false, ms(0));
        let jumped = ctl.relayout(TrackLayout::new(200.0, 8.0, 0.0), ms(10));
        assert_eq!(
            jumped.effect,
            TransitionEffect::Jumped {
                index: 2,
                offset: -416.0,
            }
        );
    }

    #[test]
    fn relayout_while_committing_applies_at_settle() {
        let mut ctl = controller();
        ctl.next(ms(0));
        let rejected = ctl.relayout(TrackLayout::new(200.0, 8.0, 0.0), ms(100));
        assert_eq!(rejected.noop_reason(), Some(NoopReason::TransitionInFlight));

        let settled = settle(&mut ctl);
        assert_eq!(
            settled.effect,
            TransitionEffect::Settled {
                index: 1,
                offset: -208.0,
                reanchored: true,
            }
        );
    }

    #[test]
    fn transition_ids_increase_monotonically() {
        let mut ctl = controller();
        let a = ctl.next(ms(0));
        let b = ctl.next(ms(1));
        let c = settle(&mut ctl);
        assert!(a.transition_id < b.transition_id);
        assert!(b.transition_id < c.transition_id);
    }

    #[test]
    fn transition_record_serializes_with_tagged_effect() {
        let mut ctl = controller();
        let record = ctl.next(ms(0));
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["effect"]["effect"], "committed");
        assert_eq!(json["from"], "idle");
        assert_eq!(json["to"], "committing");
    }
}
