#![forbid(unsafe_code)]

//! The carousel engine.
//!
//! [`Carousel`] wires the [`TransitionController`] to the
//! [`AutoPlayScheduler`] and turns their decisions into [`RenderCommand`]s
//! for the styling layer. It is the single entry point a host needs:
//!
//! | Host callback          | Engine call                      |
//! |------------------------|----------------------------------|
//! | mousedown / touchstart | [`Carousel::pointer_down`]       |
//! | mousemove / touchmove  | [`Carousel::pointer_move`]       |
//! | mouseup / touchend     | [`Carousel::pointer_up`]         |
//! | animation frame        | [`Carousel::frame`]              |
//! | mouseenter / leave     | [`Carousel::hover_enter`] / [`Carousel::hover_leave`] |
//! | prev / next buttons    | [`Carousel::prev`] / [`Carousel::next`] |
//! | window resize          | [`Carousel::resize`]             |
//! | timer deadline         | [`Carousel::poll`]               |
//! | teardown               | [`Carousel::cleanup`]            |
//!
//! Commands accumulate in an outbox until the host calls
//! [`Carousel::drain_commands`].
//!
//! A carousel with no slides is [`Lifecycle::Dormant`]: every entry point is
//! a no-op. After [`Carousel::cleanup`] it is [`Lifecycle::TornDown`] and
//! likewise inert.

use std::time::Duration;

use crate::autoplay::{AutoPlayScheduler, PauseSource};
use crate::config::CarouselConfig;
use crate::error::CarouselError;
use crate::pointer::{PointerPhase, PointerSample};
use crate::position::TrackLayout;
use crate::slide::{Slide, build_track};
use crate::transition::{
    NoopReason, Transition, TransitionController, TransitionEffect, TransitionState,
};

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// No slides: nothing to drive.
    Dormant,
    Active,
    /// Cleaned up: no further state changes.
    TornDown,
}

/// Instruction for the styling layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderCommand {
    /// Translate the track to `offset` px. `transition` is the animation
    /// duration, or `None` to apply instantly.
    SetOffset {
        offset: f32,
        transition: Option<Duration>,
    },
    /// Toggle the grabbing cursor / dragging class.
    SetGrabbing(bool),
    /// Schedule one animation-frame callback.
    RequestFrame,
    /// Cancel the pending animation-frame callback.
    CancelFrame,
    /// Suppress the native default of the event being handled.
    PreventDefault,
}

/// Transitions produced by one [`Carousel::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollOutcome {
    /// A commit that reached its deadline.
    pub settled: Option<Transition>,
    /// The response to an autoplay tick.
    pub advanced: Option<Transition>,
}

impl PollOutcome {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.settled.is_none() && self.advanced.is_none()
    }
}

/// Host-driven carousel engine.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    slides: Vec<Slide>,
    controller: TransitionController,
    autoplay: AutoPlayScheduler,
    lifecycle: Lifecycle,
    hovering: bool,
    frame_pending: bool,
    outbox: Vec<RenderCommand>,
    last_transition: Option<Transition>,
}

impl Carousel {
    /// Build an engine for `slide_count` slides of `slide_width` px.
    ///
    /// Emits the initial resting offset and starts autoplay when configured.
    pub fn new(
        config: CarouselConfig,
        slide_count: usize,
        slide_width: f32,
        now: Duration,
    ) -> Result<Self, CarouselError> {
        config.validate()?;
        check_width(slide_width)?;

        let slides = build_track(slide_count, slide_width, config.uses_clones());
        let controller = TransitionController::from_config(&config, slide_count, slide_width);
        let autoplay = AutoPlayScheduler::from_config(&config);
        let lifecycle = if slide_count == 0 {
            Lifecycle::Dormant
        } else {
            Lifecycle::Active
        };

        let mut carousel = Self {
            config,
            slides,
            controller,
            autoplay,
            lifecycle,
            hovering: false,
            frame_pending: false,
            outbox: Vec::new(),
            last_transition: None,
        };

        if lifecycle == Lifecycle::Active {
            let offset = carousel.controller.position().offset();
            carousel.push(RenderCommand::SetOffset {
                offset,
                transition: None,
            });
            carousel.autoplay.start(now);
        }
        tracing::debug!(
            target: "carousel.transition",
            slide_count,
            slide_width,
            ?lifecycle,
            autoplay = carousel.autoplay.is_running(),
            "carousel initialized"
        );
        Ok(carousel)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// The track, clones included.
    #[inline]
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    #[inline]
    #[must_use]
    pub fn autoplay(&self) -> &AutoPlayScheduler {
        &self.autoplay
    }

    #[inline]
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[inline]
    #[must_use]
    pub const fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.controller.current_index()
    }

    #[must_use]
    pub fn offset(&self) -> f32 {
        self.controller.position().offset()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.controller.state() == TransitionState::Dragging
    }

    /// The most recent transition record.
    #[must_use]
    pub fn last_transition(&self) -> Option<&Transition> {
        self.last_transition.as_ref()
    }

    /// Earliest time the host must call [`poll`](Self::poll).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.lifecycle != Lifecycle::Active {
            return None;
        }
        match (self.controller.deadline(), self.autoplay.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Take every queued render command.
    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.outbox)
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Pointer pressed on the track.
    pub fn pointer_down(&mut self, sample: &PointerSample) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let Some(point) = sample.normalize(PointerPhase::Start) else {
            let rejected = self.controller.noop(NoopReason::NotDragging);
            return self.remember(rejected);
        };
        let transition = self.controller.request_drag(point);
        if let TransitionEffect::DragStarted { baseline } = transition.effect {
            self.autoplay.pause(PauseSource::DRAG);
            if sample.suppresses_default_on(PointerPhase::Start) {
                self.push(RenderCommand::PreventDefault);
            }
            self.push(RenderCommand::SetGrabbing(true));
            self.push(RenderCommand::SetOffset {
                offset: baseline,
                transition: None,
            });
            self.request_frame();
        }
        self.remember(transition)
    }

    /// Pointer moved. Offsets are rendered on the next [`frame`](Self::frame).
    pub fn pointer_move(&mut self, sample: &PointerSample) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let Some(point) = sample.normalize(PointerPhase::Move) else {
            let rejected = self.controller.noop(NoopReason::NotDragging);
            return self.remember(rejected);
        };
        let transition = self.controller.update_drag(point);
        match transition.effect {
            TransitionEffect::LiveOffset { .. } => self.push(RenderCommand::PreventDefault),
            TransitionEffect::DragCancelled { offset, .. } => {
                self.release_grab();
                self.push(RenderCommand::SetOffset {
                    offset,
                    transition: None,
                });
                self.autoplay.resume(PauseSource::DRAG, point.timestamp);
            }
            _ => {}
        }
        self.remember(transition)
    }

    /// Pointer released; commits or snaps back.
    pub fn pointer_up(&mut self, sample: &PointerSample) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let Some(point) = sample.normalize(PointerPhase::End) else {
            let rejected = self.controller.noop(NoopReason::NotDragging);
            return self.remember(rejected);
        };
        let transition = self.controller.end_drag(point, point.timestamp);
        if !transition.is_noop() {
            self.release_grab();
            self.render(&transition);
            self.autoplay.resume(PauseSource::DRAG, point.timestamp);
        }
        self.remember(transition)
    }

    /// Animation-frame callback. Redraws the live offset and requests the
    /// next frame while a drag is in progress.
    pub fn frame(&mut self) -> bool {
        self.frame_pending = false;
        if self.lifecycle != Lifecycle::Active || !self.is_dragging() {
            return false;
        }
        let offset = self.offset();
        self.push(RenderCommand::SetOffset {
            offset,
            transition: None,
        });
        self.request_frame();
        true
    }

    // -----------------------------------------------------------------------
    // Hover
    // -----------------------------------------------------------------------

    /// Pointer entered the carousel. Returns `true` if autoplay was paused.
    pub fn hover_enter(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Active || !self.config.pause_on_hover {
            return false;
        }
        self.hovering = true;
        self.autoplay.pause(PauseSource::HOVER);
        true
    }

    /// Pointer left the carousel. Returns `true` if autoplay re-armed.
    pub fn hover_leave(&mut self, now: Duration) -> bool {
        if self.lifecycle != Lifecycle::Active || !self.config.pause_on_hover {
            return false;
        }
        self.hovering = false;
        self.autoplay.resume(PauseSource::HOVER, now)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn next(&mut self, now: Duration) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let transition = self.controller.next(now);
        self.render(&transition);
        self.remember(transition)
    }

    pub fn prev(&mut self, now: Duration) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let transition = self.controller.prev(now);
        self.render(&transition);
        self.remember(transition)
    }

    /// Animate to `index`, normalized by the boundary policy.
    pub fn go_to(&mut self, index: usize, now: Duration) -> Transition {
        if let Some(rejected) = self.inert() {
            return rejected;
        }
        let requested = i64::try_from(index).unwrap_or(i64::MAX);
        let transition = self.controller.request_go_to(requested, true, now);
        self.render(&transition);
        self.remember(transition)
    }

    /// Re-measure slides at `slide_width` and realign on the current index.
    pub fn resize(&mut self, slide_width: f32, now: Duration) -> Result<Transition, CarouselError> {
        if let Some(rejected) = self.inert() {
            return Ok(rejected);
        }
        check_width(slide_width)?;
        for slide in &mut self.slides {
            slide.width = slide_width;
        }
        let layout = TrackLayout::from_config(&self.config, slide_width);
        let transition = self.controller.relayout(layout, now);
        self.render(&transition);
        Ok(self.remember(transition))
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Settle a due commit, then service a due autoplay tick.
    pub fn poll(&mut self, now: Duration) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        if self.lifecycle != Lifecycle::Active {
            return outcome;
        }

        if let Some(settled) = self.controller.poll(now) {
            self.render(&settled);
            outcome.settled = Some(self.remember(settled));
        }

        if let Some(tick) = self.autoplay.poll(now) {
            if self.is_dragging() {
                tracing::debug!(
                    target: "carousel.autoplay",
                    timer = tick.timer,
                    "tick consumed during drag"
                );
            } else {
                let transition = self.controller.next(now);
                self.render(&transition);
                outcome.advanced = Some(self.remember(transition));
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Stop autoplay and cancel any pending frame. Idempotent; returns
    /// `true` only on the call that tore the carousel down.
    pub fn cleanup(&mut self) -> bool {
        if self.lifecycle == Lifecycle::TornDown {
            return false;
        }
        self.autoplay.stop();
        if self.frame_pending {
            self.frame_pending = false;
            self.push(RenderCommand::CancelFrame);
        }
        self.hovering = false;
        self.lifecycle = Lifecycle::TornDown;
        tracing::debug!(target: "carousel.transition", "carousel torn down");
        true
    }

    /// Mark every track entry showing slide `ordinal` as loaded.
    ///
    /// Returns `true` if any entry changed.
    pub fn mark_image_loaded(&mut self, ordinal: usize) -> bool {
        if self.lifecycle == Lifecycle::TornDown {
            return false;
        }
        let mut changed = false;
        for slide in self
            .slides
            .iter_mut()
            .filter(|slide| slide.ordinal == ordinal && !slide.image_loaded)
        {
            slide.image_loaded = true;
            changed = true;
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn inert(&mut self) -> Option<Transition> {
        let reason = match self.lifecycle {
            Lifecycle::Active => return None,
            Lifecycle::Dormant => NoopReason::Dormant,
            Lifecycle::TornDown => NoopReason::TornDown,
        };
        Some(self.controller.noop(reason))
    }

    fn render(&mut self, transition: &Transition) {
        let command = match transition.effect {
            TransitionEffect::Committed {
                offset, duration, ..
            } => RenderCommand::SetOffset {
                offset,
                transition: Some(duration),
            },
            TransitionEffect::Jumped { offset, .. }
            | TransitionEffect::Settled {
                offset,
                reanchored: true,
                ..
            } => RenderCommand::SetOffset {
                offset,
                transition: None,
            },
            _ => return,
        };
        self.push(command);
    }

    fn release_grab(&mut self) {
        self.push(RenderCommand::SetGrabbing(false));
        if self.frame_pending {
            self.frame_pending = false;
            self.push(RenderCommand::CancelFrame);
        }
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.push(RenderCommand::RequestFrame);
        }
    }

    fn push(&mut self, command: RenderCommand) {
        self.outbox.push(command);
    }

    fn remember(&mut self, transition: Transition) -> Transition {
        self.last_transition = Some(transition);
        transition
    }
}

fn check_width(width: f32) -> Result<(), CarouselError> {
    if width.is_finite() && width >= 0.0 {
        Ok(())
    } else {
        Err(CarouselError::InvalidSlideWidth { width })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
