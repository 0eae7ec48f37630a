#![forbid(unsafe_code)]

//! Pointer input normalization.
//!
//! Mouse and touch callbacks share one handler in the browser. Here each
//! source is its own [`PointerSample`] variant, and
//! [`PointerSample::normalize`] reduces either to a single [`Sample`]
//! (position + timestamp) before it reaches the gesture tracker.
//!
//! Touch events pick their point by phase: the first active touch on start
//! and move, the first *changed* touch on end (the lifted finger is no longer
//! in the active list).

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Client-space position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise `other - self`.
    #[must_use]
    pub fn delta_to(self, other: Self) -> (f32, f32) {
        (other.x - self.x, other.y - self.y)
    }
}

/// One normalized pointer reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point,
    /// Monotonic host timestamp.
    pub timestamp: Duration,
}

impl Sample {
    #[must_use]
    pub const fn new(x: f32, y: f32, timestamp: Duration) -> Self {
        Self {
            position: Point::new(x, y),
            timestamp,
        }
    }
}

/// Lifecycle phase of a pointer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Start,
    Move,
    End,
}

/// Mouse callback payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MousePoint {
    pub client_x: f32,
    pub client_y: f32,
    pub timestamp: Duration,
}

/// One touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: i32,
    pub client_x: f32,
    pub client_y: f32,
}

/// Touch callback payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchSample {
    /// Touches currently on the surface.
    pub touches: Vec<TouchPoint>,
    /// Touches that changed in this event.
    pub changed_touches: Vec<TouchPoint>,
    pub timestamp: Duration,
}

/// Raw pointer input from either a mouse or a touch surface.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSample {
    Mouse(MousePoint),
    Touch(TouchSample),
}

impl PointerSample {
    /// Convenience constructor for a mouse reading.
    #[must_use]
    pub fn mouse(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::Mouse(MousePoint {
            client_x: x,
            client_y: y,
            timestamp,
        })
    }

    /// Convenience constructor for a single-finger touch reading.
    ///
    /// For [`PointerPhase::End`] the point is placed in `changed_touches`
    /// only, matching what browsers report for a lifted finger.
    #[must_use]
    pub fn single_touch(phase: PointerPhase, x: f32, y: f32, timestamp: Duration) -> Self {
        let point = TouchPoint {
            identifier: 0,
            client_x: x,
            client_y: y,
        };
        let touches = if phase == PointerPhase::End {
            Vec::new()
        } else {
            vec![point]
        };
        Self::Touch(TouchSample {
            touches,
            changed_touches: vec![point],
            timestamp,
        })
    }

    #[must_use]
    pub const fn is_touch(&self) -> bool {
        matches!(self, Self::Touch(_))
    }

    #[must_use]
    pub fn timestamp(&self) -> Duration {
        match self {
            Self::Mouse(mouse) => mouse.timestamp,
            Self::Touch(touch) => touch.timestamp,
        }
    }

    /// Reduce to a single position for the given phase.
    ///
    /// Returns `None` for a touch event whose relevant list is empty.
    #[must_use]
    pub fn normalize(&self, phase: PointerPhase) -> Option<Sample> {
        match self {
            Self::Mouse(mouse) => Some(Sample::new(mouse.client_x, mouse.client_y, mouse.timestamp)),
            Self::Touch(touch) => {
                let point = match phase {
                    PointerPhase::Start | PointerPhase::Move => touch
                        .touches
                        .first()
                        .or_else(|| touch.changed_touches.first()),
                    PointerPhase::End => touch
                        .changed_touches
                        .first()
                        .or_else(|| touch.touches.first()),
                }?;
                Some(Sample::new(point.client_x, point.client_y, touch.timestamp))
            }
        }
    }

    /// Whether the host should suppress the native default for this callback
    /// before the gesture is classified.
    ///
    /// A touch start is suppressed so the browser does not synthesize mouse
    /// events or start a native drag.
    #[must_use]
    pub fn suppresses_default_on(&self, phase: PointerPhase) -> bool {
        self.is_touch() && phase == PointerPhase::Start
    }
}
