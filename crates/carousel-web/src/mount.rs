#![forbid(unsafe_code)]

//! What the host discovered in one carousel container.
//!
//! The host walks the DOM once (container, slides, optional buttons) and
//! hands the result over as a [`CarouselMount`], either built directly or
//! parsed from JSON with [`CarouselMount::from_json`].

use carousel_core::{CarouselConfig, ConfigError};
use serde::{Deserialize, Serialize};

use crate::error::MountError;

/// The image inside one slide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideDescriptor {
    /// Displayed `src`, if the markup set one.
    pub src: Option<String>,
    /// Deferred `data-src`, swapped into `src` when the slide nears the
    /// viewport.
    pub data_src: Option<String>,
}

impl SlideDescriptor {
    #[must_use]
    pub fn deferred(data_src: impl Into<String>) -> Self {
        Self {
            src: None,
            data_src: Some(data_src.into()),
        }
    }

    #[must_use]
    pub fn eager(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            data_src: None,
        }
    }

    /// Whether the slide has an image at all.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.src.is_some() || self.data_src.is_some()
    }
}

/// One carousel container as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselMount {
    /// Host-side identifier used in registry reports.
    pub id: String,
    /// Raw `data-settings` attribute.
    #[serde(default)]
    pub settings: Option<String>,
    #[serde(default)]
    pub slides: Vec<SlideDescriptor>,
    #[serde(default)]
    pub has_prev_button: bool,
    #[serde(default)]
    pub has_next_button: bool,
    /// Width of the track's container in CSS px.
    pub container_width: f32,
    /// `window.innerWidth`.
    pub viewport_width: f32,
    /// Whether `IntersectionObserver` is available.
    #[serde(default = "default_observer_supported")]
    pub observer_supported: bool,
}

fn default_observer_supported() -> bool {
    true
}

impl CarouselMount {
    #[must_use]
    pub fn new(id: impl Into<String>, container_width: f32, viewport_width: f32) -> Self {
        Self {
            id: id.into(),
            settings: None,
            slides: Vec::new(),
            has_prev_button: false,
            has_next_button: false,
            container_width,
            viewport_width,
            observer_supported: true,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = Some(settings.into());
        self
    }

    #[must_use]
    pub fn with_slides(mut self, slides: Vec<SlideDescriptor>) -> Self {
        self.slides = slides;
        self
    }

    #[must_use]
    pub fn with_buttons(mut self, prev: bool, next: bool) -> Self {
        self.has_prev_button = prev;
        self.has_next_button = next;
        self
    }

    #[must_use]
    pub fn with_observer_supported(mut self, supported: bool) -> Self {
        self.observer_supported = supported;
        self
    }

    /// Parse a JSON mount descriptor.
    pub fn from_json(payload: &str) -> Result<Self, MountError> {
        serde_json::from_str(payload).map_err(MountError::Descriptor)
    }

    /// Parse and validate the settings payload.
    pub fn config(&self) -> Result<CarouselConfig, ConfigError> {
        CarouselConfig::from_payload(self.settings.as_deref())
    }

    /// Reject widths the sizing math cannot use.
    pub fn validate_geometry(&self) -> Result<(), MountError> {
        check_width("container_width", self.container_width)?;
        check_width("viewport_width", self.viewport_width)
    }
}

pub(crate) fn check_width(field: &'static str, value: f32) -> Result<(), MountError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MountError::InvalidGeometry { field, value })
    }
}
