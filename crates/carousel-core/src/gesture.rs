#![forbid(unsafe_code)]

//! Gesture tracking: turns a stream of pointer samples into a drag.
//!
//! [`GestureTracker`] follows one interaction from [`begin`] to [`end`]:
//!
//! - **Axis lock**: until the pointer has moved `axis_lock_threshold` px from
//!   its start, the gesture is [`AxisLock::Undetermined`]. It then locks to
//!   [`AxisLock::Vertical`] if `|dy| > |dx|`, otherwise
//!   [`AxisLock::Horizontal`], and keeps that lock for the rest of the
//!   gesture.
//! - **Live offset**: while horizontal, the offset is the baseline captured at
//!   [`begin`] plus the total horizontal travel. Travel beyond the track's
//!   [`OffsetBounds`] is multiplied by `edge_resistance`.
//! - **Velocity**: horizontal px per ms between consecutive samples, with the
//!   time delta floored at `min_sample_interval`.
//!
//! # Invariants
//!
//! 1. Once locked, the axis never changes within a gesture.
//! 2. A gesture that never locks ends with zero displacement and velocity.
//! 3. A vertical gesture ends with zero displacement and velocity.
//! 4. The live offset never exceeds a bound by more than
//!    `edge_resistance × overshoot`.
//!
//! [`begin`]: GestureTracker::begin
//! [`end`]: GestureTracker::end

use std::time::Duration;

use crate::config::GestureConfig;
use crate::pointer::{Point, Sample};
use crate::position::OffsetBounds;

/// Classification of a gesture's dominant axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisLock {
    #[default]
    Undetermined,
    /// Carousel drag.
    Horizontal,
    /// Native page scroll.
    Vertical,
}

/// State of one in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start: Point,
    pub last: Point,
    pub start_time: Duration,
    pub last_time: Duration,
    /// Total travel since `start`.
    pub delta: Point,
    pub axis: AxisLock,
    /// Offset of the track when the gesture began.
    pub baseline: f32,
    /// Offset to render right now (resistance applied).
    pub live_offset: f32,
    /// Most recent horizontal velocity in px/ms.
    pub velocity: f32,
    bounds: OffsetBounds,
}

/// What the caller should do after an update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureUpdate {
    /// Not enough movement to classify yet.
    Undetermined,
    /// Horizontal drag: render this offset immediately.
    LiveOffset(f32),
    /// Vertical scroll: abandon the drag and let the page scroll.
    CancelDrag,
    /// No gesture is active.
    Inactive,
}

/// Final result of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOutcome {
    /// Signed live-offset change from the baseline; negative means forward.
    pub displacement: f32,
    /// Signed release velocity in px/ms.
    pub velocity: f32,
    pub axis: AxisLock,
    pub duration: Duration,
}

impl GestureOutcome {
    /// Outcome of a gesture that never became a horizontal drag.
    #[must_use]
    pub const fn stationary(axis: AxisLock, duration: Duration) -> Self {
        Self {
            displacement: 0.0,
            velocity: 0.0,
            axis,
            duration,
        }
    }
}

/// Damp `raw` beyond `bounds` by `factor`.
#[must_use]
pub fn apply_resistance(raw: f32, bounds: OffsetBounds, factor: f32) -> f32 {
    if raw > bounds.max {
        bounds.max + (raw - bounds.max) * factor
    } else if raw < bounds.min {
        bounds.min + (raw - bounds.min) * factor
    } else {
        raw
    }
}

/// Converts pointer samples into drag offsets, velocity, and axis lock.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: GestureConfig,
    active: Option<GestureSample>,
}

impl GestureTracker {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The in-progress gesture, if any.
    #[must_use]
    pub fn sample(&self) -> Option<&GestureSample> {
        self.active.as_ref()
    }

    /// Start a gesture at `sample`, with the track resting at `baseline`.
    ///
    /// Any gesture already in progress is discarded.
    pub fn begin(&mut self, sample: Sample, baseline: f32, bounds: OffsetBounds) {
        tracing::trace!(
            target: "carousel.gesture",
            x = sample.position.x,
            y = sample.position.y,
            baseline,
            "gesture begin"
        );
        self.active = Some(GestureSample {
            start: sample.position,
            last: sample.position,
            start_time: sample.timestamp,
            last_time: sample.timestamp,
            delta: Point::default(),
            axis: AxisLock::Undetermined,
            baseline,
            live_offset: baseline,
            velocity: 0.0,
            bounds,
        });
    }

    /// Feed one move sample.
    pub fn update(&mut self, sample: Sample) -> GestureUpdate {
        let config = self.config;
        let Some(gesture) = self.active.as_mut() else {
            return GestureUpdate::Inactive;
        };
        advance(gesture, sample, &config)
    }

    /// Finish the gesture at `sample` and reset.
    ///
    /// Returns `None` if no gesture was active.
    pub fn end(&mut self, sample: Sample) -> Option<GestureOutcome> {
        let config = self.config;
        let mut gesture = self.active.take()?;
        if sample.position != gesture.last {
            advance(&mut gesture, sample, &config);
        } else if sample.timestamp.saturating_sub(gesture.last_time) > config.release_window {
            gesture.velocity = 0.0;
        }
        let duration = sample.timestamp.saturating_sub(gesture.start_time);
        let outcome = match gesture.axis {
            AxisLock::Horizontal => GestureOutcome {
                displacement: gesture.live_offset - gesture.baseline,
                velocity: gesture.velocity,
                axis: AxisLock::Horizontal,
                duration,
            },
            axis => GestureOutcome::stationary(axis, duration),
        };
        tracing::debug!(
            target: "carousel.gesture",
            displacement = outcome.displacement,
            velocity = outcome.velocity,
            axis = ?outcome.axis,
            "gesture end"
        );
        Some(outcome)
    }

    /// Drop the in-progress gesture. Returns `true` if one was active.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}

fn advance(gesture: &mut GestureSample, sample: Sample, config: &GestureConfig) -> GestureUpdate {
    let dt = sample
        .timestamp
        .saturating_sub(gesture.last_time)
        .max(config.min_sample_interval);
    let (step_x, _) = gesture.last.delta_to(sample.position);
    let (total_x, total_y) = gesture.start.delta_to(sample.position);

    gesture.last = sample.position;
    gesture.last_time = sample.timestamp;
    gesture.delta = Point::new(total_x, total_y);
    gesture.velocity = step_x / (dt.as_secs_f32() * 1000.0);

    if gesture.axis == AxisLock::Undetermined {
        let (abs_x, abs_y) = (total_x.abs(), total_y.abs());
        if abs_x.max(abs_y) < config.axis_lock_threshold {
            return GestureUpdate::Undetermined;
        }
        gesture.axis = if abs_y > abs_x {
            AxisLock::Vertical
        } else {
            AxisLock::Horizontal
        };
        tracing::debug!(
            target: "carousel.gesture",
            axis = ?gesture.axis,
            dx = total_x,
            dy = total_y,
            "axis locked"
        );
    }

    match gesture.axis {
        AxisLock::Horizontal => {
            gesture.live_offset = apply_resistance(
                gesture.baseline + total_x,
                gesture.bounds,
                config.edge_resistance,
            );
            GestureUpdate::LiveOffset(gesture.live_offset)
        }
        AxisLock::Vertical => GestureUpdate::CancelDrag,
        AxisLock::Undetermined => GestureUpdate::Undetermined,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
