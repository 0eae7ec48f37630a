#![forbid(unsafe_code)]

//! Core: slide positioning, gesture tracking, transitions, and autoplay.
//!
//! # Role in the carousel
//! `carousel-core` is the host-independent engine. It knows nothing about the
//! DOM: the embedding layer (`carousel-web`) pushes pointer samples, hover and
//! resize notifications, frame callbacks, and clock readings, and renders the
//! [`carousel::RenderCommand`]s the engine emits.
//!
//! # Primary responsibilities
//! - **PositionModel**: index ↔ offset mapping, boundary policy, resting vs.
//!   dragging vs. animating.
//! - **GestureTracker**: axis lock, edge resistance, velocity estimation.
//! - **TransitionController**: the Idle → Dragging → Committing machine with
//!   at-most-one transition in flight.
//! - **AutoPlayScheduler**: a host-polled repeating timer with independent
//!   pause sources.
//!
//! # Time
//! All timestamps are monotonic [`std::time::Duration`]s supplied by the host
//! (see [`clock`]). Nothing in this crate blocks, spawns, or reads the wall
//! clock on its own.

pub mod autoplay;
pub mod carousel;
pub mod clock;
pub mod config;
pub mod error;
pub mod gesture;
pub mod pointer;
pub mod position;
pub mod slide;
pub mod transition;

pub use autoplay::{AutoPlayScheduler, AutoPlayState, AutoPlayTick, PauseSource, TimerHandle};
pub use carousel::{Carousel, Lifecycle, PollOutcome, RenderCommand};
pub use clock::{Clock, DeterministicClock, SystemClock};
pub use config::{CarouselConfig, GestureConfig, LoopStrategy};
pub use error::{CarouselError, ConfigError};
pub use gesture::{
    AxisLock, GestureOutcome, GestureSample, GestureTracker, GestureUpdate, apply_resistance,
};
pub use pointer::{MousePoint, Point, PointerPhase, PointerSample, Sample, TouchPoint, TouchSample};
pub use position::{Boundary, OffsetBounds, PositionModel, PositionPhase, TrackLayout};
pub use slide::{Slide, build_track};
pub use transition::{
    NoopReason, SwipeDecision, Transition, TransitionController, TransitionEffect,
    TransitionState,
};
