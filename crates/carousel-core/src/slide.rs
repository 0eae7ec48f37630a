#![forbid(unsafe_code)]

//! Slides on the track.
//!
//! The slide set is fixed at construction. With the clone loop strategy the
//! track gains one leading clone of the last slide and one trailing clone of
//! the first; clones are extra entries, the originals are never replaced.

/// One positionable slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slide {
    /// Slot on the track, counting clones.
    pub position: usize,
    /// Ordinal of the slide this entry shows (`0..slide_count`).
    pub ordinal: usize,
    /// Measured width in px.
    pub width: f32,
    pub image_loaded: bool,
    /// `true` for wrap-around clones.
    pub is_clone: bool,
}

impl Slide {
    fn original(ordinal: usize, width: f32) -> Self {
        Self {
            position: ordinal,
            ordinal,
            width,
            image_loaded: false,
            is_clone: false,
        }
    }
}

/// Build the track for `count` slides, optionally with wrap clones.
#[must_use]
pub fn build_track(count: usize, width: f32, with_clones: bool) -> Vec<Slide> {
    if count == 0 {
        return Vec::new();
    }
    let mut track = Vec::with_capacity(count + 2);
    if with_clones {
        track.push(Slide {
            is_clone: true,
            ..Slide::original(count - 1, width)
        });
    }
    track.extend((0..count).map(|ordinal| Slide::original(ordinal, width)));
    if with_clones {
        track.push(Slide {
            is_clone: true,
            ..Slide::original(0, width)
        });
    }
    for (position, slide) in track.iter_mut().enumerate() {
        slide.position = position;
    }
    track
}
