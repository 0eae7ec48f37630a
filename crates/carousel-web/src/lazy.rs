#![forbid(unsafe_code)]

//! Lazy slide image loading.
//!
//! The first slide's image loads eagerly with high priority. Every other
//! slide that carries a deferred `data-src` is observed; when it comes within
//! the observer's root margin, `data-src` is swapped into `src` and the
//! slide is unobserved. Once the host reports the image's `onload`, the slide
//! is marked loaded so the fade-in class can be applied.
//!
//! Hosts without `IntersectionObserver` get every deferred image loaded up
//! front.
//!
//! Intersection can be reported two ways: the host forwards the browser's
//! entries ([`LazyImageLoader::on_intersections`]) or supplies bounding
//! rectangles and lets the loader compute ratios
//! ([`LazyImageLoader::on_geometry`]).

use serde::{Deserialize, Serialize};

use crate::mount::SlideDescriptor;

/// Minimum visible ratio that counts as intersecting.
pub const INTERSECTION_THRESHOLD: f32 = 0.01;
/// Root margin above and below the viewport, in px.
pub const ROOT_MARGIN_VERTICAL: f32 = 200.0;
/// Root margin left and right of the viewport, in px.
pub const ROOT_MARGIN_HORIZONTAL: f32 = 0.0;

/// Observer tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f32,
    pub margin_vertical: f32,
    pub margin_horizontal: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: INTERSECTION_THRESHOLD,
            margin_vertical: ROOT_MARGIN_VERTICAL,
            margin_horizontal: ROOT_MARGIN_HORIZONTAL,
        }
    }
}

impl ObserverOptions {
    /// `rootMargin` string for `IntersectionObserver`.
    #[must_use]
    pub fn root_margin_css(&self) -> String {
        format!("{}px {}px", self.margin_vertical, self.margin_horizontal)
    }
}

/// Axis-aligned rectangle in CSS px.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow by `vertical` above and below and `horizontal` left and right.
    #[must_use]
    pub fn expand(self, vertical: f32, horizontal: f32) -> Self {
        Self {
            x: self.x - horizontal,
            y: self.y - vertical,
            width: self.width + 2.0 * horizontal,
            height: self.height + 2.0 * vertical,
        }
    }

    fn right(self) -> f32 {
        self.x + self.width
    }

    fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Share of `self` that lies inside `root`, with edge-adjacent zero-area
    /// targets counting as fully visible.
    #[must_use]
    pub fn visible_ratio(self, root: Self) -> f32 {
        let left = self.x.max(root.x);
        let top = self.y.max(root.y);
        let right = self.right().min(root.right());
        let bottom = self.bottom().min(root.bottom());
        if right < left || bottom < top {
            return 0.0;
        }
        let area = self.width * self.height;
        if area <= 0.0 {
            return 1.0;
        }
        ((right - left) * (bottom - top) / area).clamp(0.0, 1.0)
    }
}

/// One forwarded `IntersectionObserverEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub slide: usize,
    pub is_intersecting: bool,
    #[serde(default)]
    pub ratio: f32,
}

/// Load progress of one slide's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageState {
    /// No image, or an image with no deferred source.
    Static,
    /// Waiting for intersection.
    Observed,
    /// `src` assigned; waiting for `onload`.
    Requested,
    Loaded,
}

/// DOM work for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadAction {
    /// First slide: `loading=eager`, `fetchpriority=high`, `decoding=sync`,
    /// assign `src`, add the fade-in class.
    LoadEager { slide: usize, src: String },
    Observe { slide: usize },
    Unobserve { slide: usize },
    /// Assign `src` and drop `data-src`.
    Load { slide: usize, src: String },
    /// Add the loaded class.
    MarkLoaded { slide: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LazyImage {
    src: Option<String>,
    deferred: Option<String>,
    state: ImageState,
}

/// Per-carousel lazy image state.
#[derive(Debug, Clone)]
pub struct LazyImageLoader {
    options: ObserverOptions,
    observer_supported: bool,
    images: Vec<LazyImage>,
}

impl LazyImageLoader {
    #[must_use]
    pub fn new(slides: &[SlideDescriptor], observer_supported: bool) -> Self {
        Self::with_options(slides, observer_supported, ObserverOptions::default())
    }

    #[must_use]
    pub fn with_options(
        slides: &[SlideDescriptor],
        observer_supported: bool,
        options: ObserverOptions,
    ) -> Self {
        let images = slides
            .iter()
            .map(|slide| LazyImage {
                src: slide.src.clone(),
                deferred: slide.data_src.clone(),
                state: ImageState::Static,
            })
            .collect();
        Self {
            options,
            observer_supported,
            images,
        }
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self, slide: usize) -> Option<ImageState> {
        self.images.get(slide).map(|image| image.state)
    }

    /// Number of slides still waiting for intersection.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.images
            .iter()
            .filter(|image| image.state == ImageState::Observed)
            .count()
    }

    /// Initial actions: eager first slide, then observe (or load) the rest.
    pub fn start(&mut self) -> Vec<LoadAction> {
        let mut actions = Vec::new();
        let observer_supported = self.observer_supported;
        for (slide, image) in self.images.iter_mut().enumerate() {
            if slide == 0 {
                let Some(src) = image.deferred.take().or_else(|| image.src.clone()) else {
                    continue;
                };
                image.src = Some(src.clone());
                image.state = ImageState::Requested;
                actions.push(LoadAction::LoadEager { slide, src });
                continue;
            }
            if image.deferred.is_none() {
                continue;
            }
            if observer_supported {
                image.state = ImageState::Observed;
                actions.push(LoadAction::Observe { slide });
            } else if let Some(action) = request(slide, image) {
                actions.push(action);
            }
        }
        tracing::debug!(
            target: "carousel.web",
            observer_supported,
            actions = actions.len(),
            "lazy images started"
        );
        actions
    }

    /// Apply forwarded observer entries.
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<LoadAction> {
        let mut actions = Vec::new();
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            self.reveal(entry.slide, &mut actions);
        }
        actions
    }

    /// Compute intersection from rectangles: `root` is the wrapper's box,
    /// `targets` pairs each slide index with its image's box.
    pub fn on_geometry(&mut self, root: Rect, targets: &[(usize, Rect)]) -> Vec<LoadAction> {
        let expanded = root.expand(self.options.margin_vertical, self.options.margin_horizontal);
        let threshold = self.options.threshold;
        let mut actions = Vec::new();
        for &(slide, rect) in targets {
            if rect.visible_ratio(expanded) >= threshold {
                self.reveal(slide, &mut actions);
            }
        }
        actions
    }

    /// The host saw `onload` for `slide`'s image.
    pub fn on_image_load(&mut self, slide: usize) -> Option<LoadAction> {
        let image = self.images.get_mut(slide)?;
        if image.state != ImageState::Requested {
            return None;
        }
        image.state = ImageState::Loaded;
        Some(LoadAction::MarkLoaded { slide })
    }

    /// Stop observing every slide still waiting.
    pub fn disconnect(&mut self) -> Vec<LoadAction> {
        let mut actions = Vec::new();
        for (slide, image) in self.images.iter_mut().enumerate() {
            if image.state == ImageState::Observed {
                image.state = ImageState::Static;
                actions.push(LoadAction::Unobserve { slide });
            }
        }
        actions
    }

    fn reveal(&mut self, slide: usize, actions: &mut Vec<LoadAction>) {
        let Some(image) = self.images.get_mut(slide) else {
            return;
        };
        if image.state != ImageState::Observed {
            return;
        }
        if let Some(action) = request(slide, image) {
            actions.push(action);
        }
        actions.push(LoadAction::Unobserve { slide });
        tracing::trace!(target: "carousel.web", slide, "slide image revealed");
    }
}

fn request(slide: usize, image: &mut LazyImage) -> Option<LoadAction> {
    let src = image.deferred.take()?;
    image.src = Some(src.clone());
    image.state = ImageState::Requested;
    Some(LoadAction::Load { slide, src })
}
