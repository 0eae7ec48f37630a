#![forbid(unsafe_code)]

//! Error types for carousel construction.
//!
//! Only construction can fail. Runtime outcomes such as rejected transitions,
//! taps, or calls after teardown are reported as
//! [`NoopReason`](crate::transition::NoopReason) values, never as errors.

use thiserror::Error;

/// Failure to obtain a usable [`CarouselConfig`](crate::config::CarouselConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("carousel settings payload is missing")]
    Missing,

    #[error("carousel settings payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid carousel setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure to construct a [`Carousel`](crate::carousel::Carousel) engine.
#[derive(Debug, Error)]
pub enum CarouselError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid slide width {width}: must be finite and non-negative")]
    InvalidSlideWidth { width: f32 },
}
