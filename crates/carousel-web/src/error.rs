#![forbid(unsafe_code)]

//! Mount-time failures.

use carousel_core::{CarouselError, ConfigError};
use thiserror::Error;

/// A container that could not be turned into a carousel.
#[derive(Debug, Error)]
pub enum MountError {
    /// The settings payload is absent, malformed, or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] CarouselError),

    /// The host's mount descriptor is not valid JSON for [`CarouselMount`].
    ///
    /// [`CarouselMount`]: crate::mount::CarouselMount
    #[error("malformed mount descriptor: {0}")]
    Descriptor(#[source] serde_json::Error),

    #[error("invalid {field}: {value} (expected a finite, non-negative width)")]
    InvalidGeometry { field: &'static str, value: f32 },
}
