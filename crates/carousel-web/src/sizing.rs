#![forbid(unsafe_code)]

//! Responsive slide width.
//!
//! Narrow viewports show a peek layout: each slide takes 76.92308 % of the
//! container so a sliver of the neighbour stays visible. Wider viewports
//! show one full-width slide.

/// Viewports at or below this width (CSS px) use the peek layout.
pub const MOBILE_BREAKPOINT: f32 = 991.0;

/// Share of the container one slide occupies in the peek layout.
pub const PEEK_SLIDE_FRACTION: f32 = 0.769_230_8;

/// Layout chosen for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideSizing {
    Peek,
    Full,
}

impl SlideSizing {
    #[must_use]
    pub fn for_viewport(viewport_width: f32) -> Self {
        if viewport_width <= MOBILE_BREAKPOINT {
            Self::Peek
        } else {
            Self::Full
        }
    }

    /// Slide width in px for a container of `container_width` px.
    #[must_use]
    pub fn slide_width(self, container_width: f32) -> f32 {
        match self {
            Self::Peek => container_width * PEEK_SLIDE_FRACTION,
            Self::Full => container_width,
        }
    }

    /// Width value for the slides' inline style.
    #[must_use]
    pub const fn css_width(self) -> &'static str {
        match self {
            Self::Peek => "76.92308%",
            Self::Full => "100%",
        }
    }
}
