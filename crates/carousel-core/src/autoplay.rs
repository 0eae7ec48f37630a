#![forbid(unsafe_code)]

//! Host-polled autoplay timer.
//!
//! The scheduler never sleeps or spawns. It keeps a [`TimerHandle`] with the
//! next due time; the host reads [`AutoPlayScheduler::next_due`], and calls
//! [`AutoPlayScheduler::poll`] once that time has passed. Each poll that
//! fires yields an [`AutoPlayTick`] and re-arms the same handle one interval
//! later.
//!
//! Pausing is tracked per [`PauseSource`]. Hover and drag pause
//! independently; the timer re-arms only when the last source resumes.

use std::time::Duration;

use bitflags::bitflags;

use crate::config::CarouselConfig;

bitflags! {
    /// Reasons autoplay is currently suppressed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PauseSource: u8 {
        /// Pointer is over the carousel (`pause_on_hover`).
        const HOVER = 1 << 0;
        /// A drag is in progress.
        const DRAG  = 1 << 1;
    }
}

impl Default for PauseSource {
    fn default() -> Self {
        Self::empty()
    }
}

/// A live repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: u64,
    next_due: Duration,
}

impl TimerHandle {
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    #[must_use]
    pub const fn next_due(&self) -> Duration {
        self.next_due
    }
}

/// One firing of the autoplay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoPlayTick {
    /// Id of the handle that fired.
    pub timer: u64,
    /// Scheduled time of this firing.
    pub due: Duration,
}

/// Snapshot of scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AutoPlayState {
    /// Started and not stopped.
    pub active: bool,
    /// The live timer, absent while paused or inactive.
    pub handle: Option<TimerHandle>,
    pub paused_by: PauseSource,
}

impl AutoPlayState {
    #[must_use]
    pub fn paused_by_user(&self) -> bool {
        !self.paused_by.is_empty()
    }
}

/// Repeating advance timer with independent pause sources.
#[derive(Debug, Clone)]
pub struct AutoPlayScheduler {
    enabled: bool,
    interval: Duration,
    state: AutoPlayState,
    stopped: bool,
    next_timer_id: u64,
    arms: u64,
    cancellations: u64,
}

impl AutoPlayScheduler {
    /// A zero `interval` disables the scheduler.
    #[must_use]
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            enabled: enabled && !interval.is_zero(),
            interval,
            state: AutoPlayState::default(),
            stopped: false,
            next_timer_id: 0,
            arms: 0,
            cancellations: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.autoplay, config.autoplay_speed)
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> AutoPlayState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.state.handle.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// When the live timer fires next.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.state.handle.map(|handle| handle.next_due)
    }

    /// Number of times a timer has been armed.
    #[inline]
    #[must_use]
    pub const fn arm_count(&self) -> u64 {
        self.arms
    }

    /// Number of times a live timer has been cancelled.
    #[inline]
    #[must_use]
    pub const fn cancel_count(&self) -> u64 {
        self.cancellations
    }

    /// Begin the repeating timer. Replaces any live timer.
    ///
    /// Returns `true` if a timer is running afterwards.
    pub fn start(&mut self, now: Duration) -> bool {
        if !self.enabled || self.stopped {
            return false;
        }
        self.cancel_handle();
        self.state.active = true;
        if self.state.paused_by.is_empty() {
            self.arm(now);
        }
        self.is_running()
    }

    /// Suppress autoplay on behalf of `source`. Idempotent.
    pub fn pause(&mut self, source: PauseSource) {
        self.state.paused_by |= source;
        if self.cancel_handle() {
            tracing::debug!(
                target: "carousel.autoplay",
                paused_by = ?self.state.paused_by,
                "autoplay paused"
            );
        }
    }

    /// Lift the pause held by `source`.
    ///
    /// Re-arms only when no other source still holds a pause, autoplay is
    /// enabled and started, and no timer is already running. Returns `true`
    /// if this call armed a timer.
    pub fn resume(&mut self, source: PauseSource, now: Duration) -> bool {
        self.state.paused_by.remove(source);
        if !self.state.paused_by.is_empty()
            || !self.enabled
            || !self.state.active
            || self.stopped
            || self.is_running()
        {
            return false;
        }
        self.arm(now);
        tracing::debug!(target: "carousel.autoplay", "autoplay resumed");
        true
    }

    /// Cancel permanently. Returns `true` only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;
        self.state.active = false;
        self.cancel_handle();
        tracing::debug!(target: "carousel.autoplay", "autoplay stopped");
        true
    }

    /// Fire the timer if it is due.
    ///
    /// After firing, the handle is re-armed one interval after the due time,
    /// or one interval after `now` if the host fell more than an interval
    /// behind.
    pub fn poll(&mut self, now: Duration) -> Option<AutoPlayTick> {
        let interval = self.interval;
        let handle = self.state.handle.as_mut()?;
        if now < handle.next_due {
            return None;
        }
        let tick = AutoPlayTick {
            timer: handle.id,
            due: handle.next_due,
        };
        let next = handle.next_due.saturating_add(interval);
        handle.next_due = if next <= now {
            now.saturating_add(interval)
        } else {
            next
        };
        tracing::trace!(
            target: "carousel.autoplay",
            timer = tick.timer,
            due_ms = tick.due.as_millis() as u64,
            "autoplay tick"
        );
        Some(tick)
    }

    fn arm(&mut self, now: Duration) {
        self.next_timer_id = self.next_timer_id.saturating_add(1);
        self.arms = self.arms.saturating_add(1);
        self.state.handle = Some(TimerHandle {
            id: self.next_timer_id,
            next_due: now.saturating_add(self.interval),
        });
    }

    fn cancel_handle(&mut self) -> bool {
        if self.state.handle.take().is_some() {
            self.cancellations = self.cancellations.saturating_add(1);
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
