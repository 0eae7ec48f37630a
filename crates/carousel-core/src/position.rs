#![forbid(unsafe_code)]

//! Index ↔ offset mapping for the slide track.
//!
//! [`PositionModel`] owns the current index, the live offset, and the
//! resting/dragging/animating phase. Slides are laid out left to right, so a
//! higher index means a more negative offset.
//!
//! # Invariants
//!
//! 1. [`PositionModel::target_offset`] is monotonic non-increasing in index.
//! 2. [`PositionModel::normalize`] always returns a value in
//!    `[0, slide_count - 1]` (or `0` for an empty track).
//! 3. Exactly one [`PositionPhase`] holds at any time.
//!
//! # Peek
//!
//! A non-zero `peek_amount` shifts every slide after the first to the right,
//! keeping a sliver of the previous slide visible at rest. The peek is
//! clamped to one slide step so invariant 1 holds for any input.

use crate::config::{CarouselConfig, LoopStrategy};

/// Geometry of the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    pub slide_width: f32,
    pub slide_gap: f32,
    pub peek_amount: f32,
}

impl TrackLayout {
    #[must_use]
    pub const fn new(slide_width: f32, slide_gap: f32, peek_amount: f32) -> Self {
        Self {
            slide_width,
            slide_gap,
            peek_amount,
        }
    }

    /// Layout for `slide_width` using the gap and peek from `config`.
    #[must_use]
    pub fn from_config(config: &CarouselConfig, slide_width: f32) -> Self {
        Self::new(slide_width, config.slide_gap, config.peek_amount)
    }

    /// Distance between the leading edges of adjacent slides.
    #[must_use]
    pub fn step(&self) -> f32 {
        (self.slide_width + self.slide_gap).max(0.0)
    }

    fn effective_peek(&self) -> f32 {
        self.peek_amount.clamp(0.0, self.step())
    }
}

/// What happens to an index past either end of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Clamp to `[0, slide_count - 1]`.
    Clamp,
    /// Wrap modulo `slide_count` in both directions.
    Wrap,
}

impl Boundary {
    #[must_use]
    pub const fn from_infinite_loop(infinite_loop: bool) -> Self {
        if infinite_loop { Self::Wrap } else { Self::Clamp }
    }
}

/// Mutually exclusive motion state of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionPhase {
    #[default]
    Resting,
    Dragging,
    Animating,
}

/// Valid offset range of the track; drag past it meets resistance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBounds {
    /// Most negative offset (last slot).
    pub min: f32,
    /// Least negative offset (first slot).
    pub max: f32,
}

impl OffsetBounds {
    #[must_use]
    pub fn contains(&self, offset: f32) -> bool {
        (self.min..=self.max).contains(&offset)
    }
}

/// Current index, live offset, and phase of the slide track.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionModel {
    layout: TrackLayout,
    slide_count: usize,
    boundary: Boundary,
    clones: bool,
    current_index: usize,
    offset: f32,
    phase: PositionPhase,
}

impl PositionModel {
    /// Create a model resting on index 0.
    ///
    /// `strategy` only takes effect when `boundary` is [`Boundary::Wrap`].
    #[must_use]
    pub fn new(
        slide_count: usize,
        layout: TrackLayout,
        boundary: Boundary,
        strategy: LoopStrategy,
    ) -> Self {
        let clones =
            boundary == Boundary::Wrap && strategy == LoopStrategy::Clones && slide_count > 0;
        let mut model = Self {
            layout,
            slide_count,
            boundary,
            clones,
            current_index: 0,
            offset: 0.0,
            phase: PositionPhase::Resting,
        };
        model.offset = model.target_offset(0);
        model
    }

    #[must_use]
    pub fn from_config(config: &CarouselConfig, slide_count: usize, slide_width: f32) -> Self {
        Self::new(
            slide_count,
            TrackLayout::from_config(config, slide_width),
            Boundary::from_infinite_loop(config.infinite_loop),
            config.loop_strategy,
        )
    }

    #[inline]
    #[must_use]
    pub const fn slide_count(&self) -> usize {
        self.slide_count
    }

    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> PositionPhase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn layout(&self) -> TrackLayout {
        self.layout
    }

    #[inline]
    #[must_use]
    pub const fn boundary(&self) -> Boundary {
        self.boundary
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.phase, PositionPhase::Dragging)
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self.phase, PositionPhase::Animating)
    }

    #[must_use]
    pub const fn is_resting(&self) -> bool {
        matches!(self.phase, PositionPhase::Resting)
    }

    /// Whether the track carries a leading and a trailing wrap clone.
    #[must_use]
    pub const fn uses_clones(&self) -> bool {
        self.clones
    }

    /// Number of slots on the track, clones included.
    #[must_use]
    pub const fn track_len(&self) -> usize {
        if self.clones {
            self.slide_count + 2
        } else {
            self.slide_count
        }
    }

    const fn leading_clones(&self) -> usize {
        if self.clones { 1 } else { 0 }
    }

    fn slot_offset(&self, slot: usize) -> f32 {
        if slot == 0 {
            return 0.0;
        }
        -(slot as f32) * self.layout.step() + self.layout.effective_peek()
    }

    /// Resting offset for a slide index in `[0, slide_count)`.
    #[must_use]
    pub fn target_offset(&self, index: usize) -> f32 {
        self.slot_offset(index + self.leading_clones())
    }

    /// Apply the boundary policy to an arbitrary index.
    #[must_use]
    pub fn normalize(&self, index: i64) -> usize {
        if self.slide_count == 0 {
            return 0;
        }
        let count = self.slide_count as i64;
        let normalized = match self.boundary {
            Boundary::Wrap => index.rem_euclid(count),
            Boundary::Clamp => index.clamp(0, count - 1),
        };
        normalized as usize
    }

    /// Offset to animate toward for a requested (unnormalized) index.
    ///
    /// Equal to `target_offset(normalize(requested))` except when the clone
    /// strategy wraps by one step, where the animation lands on the clone
    /// slot instead.
    #[must_use]
    pub fn animation_offset(&self, requested: i64) -> f32 {
        if self.lands_on_clone(requested) {
            if requested < 0 {
                self.slot_offset(0)
            } else {
                self.slot_offset(self.track_len() - 1)
            }
        } else {
            self.target_offset(self.normalize(requested))
        }
    }

    /// Whether a request for `requested` animates onto a wrap clone.
    #[must_use]
    pub fn lands_on_clone(&self, requested: i64) -> bool {
        self.clones && (requested == -1 || requested == self.slide_count as i64)
    }

    /// Offsets the track may occupy without resistance.
    #[must_use]
    pub fn drag_bounds(&self) -> OffsetBounds {
        OffsetBounds {
            min: self.slot_offset(self.track_len().saturating_sub(1)),
            max: self.slot_offset(0),
        }
    }

    /// Enter the dragging phase from rest.
    pub fn begin_drag(&mut self) {
        self.phase = PositionPhase::Dragging;
    }

    /// Set the live offset while dragging. Bypasses animation.
    pub fn apply_offset(&mut self, offset: f32) {
        debug_assert!(self.is_dragging(), "apply_offset outside of a drag");
        self.offset = offset;
    }

    /// Start animating toward `offset`; the index is unchanged until
    /// [`settle`](Self::settle).
    pub fn begin_animation(&mut self, offset: f32) {
        self.phase = PositionPhase::Animating;
        self.offset = offset;
    }

    /// Rest on `index` at its target offset.
    pub fn settle(&mut self, index: usize) {
        debug_assert!(self.slide_count == 0 || index < self.slide_count);
        self.current_index = index;
        self.offset = self.target_offset(index);
        self.phase = PositionPhase::Resting;
    }

    /// Replace the layout. The offset is recomputed on the next settle.
    pub fn set_layout(&mut self, layout: TrackLayout) {
        self.layout = layout;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
