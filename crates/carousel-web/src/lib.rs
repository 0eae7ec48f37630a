#![forbid(unsafe_code)]

//! `carousel-web` adapts the carousel engine to a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding JS pushes DOM events as
//!   [`HostEvent`]s and applies the [`HostCommand`]s it drains back.
//! - **Deterministic time**: every dispatch carries the host's monotonic
//!   `now`; timers are requested as absolute deadlines.
//! - **No bindings**: this crate does not depend on `wasm-bindgen`. A thin
//!   JS shim owns the DOM handles and translates.
//!
//! One [`WebCarousel`] wraps one container. A page-level
//! [`CarouselRegistry`] owns every mounted carousel and tears them down
//! together.

pub mod error;
pub mod lazy;
pub mod listeners;
pub mod mount;
pub mod registry;
pub mod sizing;

use std::collections::VecDeque;
use std::time::Duration;

use carousel_core::{Carousel, Lifecycle, PointerSample, RenderCommand};

pub use error::MountError;
pub use lazy::{
    ImageState, IntersectionEntry, LazyImageLoader, LoadAction, ObserverOptions, Rect,
};
pub use listeners::Listeners;
pub use mount::{CarouselMount, SlideDescriptor};
pub use registry::{CarouselRegistry, MountFailure};
pub use sizing::SlideSizing;

/// A DOM callback forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// `mousedown` / `touchstart` on the track.
    PointerDown(PointerSample),
    /// `mousemove` on the window / `touchmove` on the track.
    PointerMove(PointerSample),
    /// `mouseup` on the window / `touchend` on the track.
    PointerUp(PointerSample),
    /// `requestAnimationFrame` callback.
    AnimationFrame,
    MouseEnter,
    MouseLeave,
    PrevClick,
    NextClick,
    ContextMenu,
    /// Window resized; the host re-measured both widths.
    Resize {
        viewport_width: f32,
        container_width: f32,
    },
    /// The deadline from the last [`HostCommand::ScheduleTimer`] passed.
    Timer,
    Intersections(Vec<IntersectionEntry>),
    /// Bounding boxes for hosts that compute intersection themselves.
    Geometry {
        root: Rect,
        targets: Vec<(usize, Rect)>,
    },
    /// An image's `onload` fired.
    ImageLoaded {
        slide: usize,
    },
}

/// Work the host performs on the DOM.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Add these event listeners.
    Attach(Listeners),
    /// Remove these event listeners.
    Detach(Listeners),
    /// Set every slide's inline width and `flex-shrink: 0`.
    SizeSlides { css_width: &'static str },
    /// Track transform, grabbing class, frames, default suppression.
    Render(RenderCommand),
    /// Image attribute and observer work.
    Image(LoadAction),
    /// Call back with [`HostEvent::Timer`] at `at`, replacing any earlier
    /// request.
    ScheduleTimer { at: Duration },
    CancelTimer,
}

/// One mounted carousel.
#[derive(Debug)]
pub struct WebCarousel {
    id: String,
    engine: Carousel,
    sizing: SlideSizing,
    container_width: f32,
    images: LazyImageLoader,
    listeners: Listeners,
    scheduled: Option<Duration>,
    commands: VecDeque<HostCommand>,
}

impl WebCarousel {
    /// Mount a container.
    ///
    /// A container with no slides mounts dormant: no listeners, no images,
    /// no timers.
    pub fn mount(mount: &CarouselMount, now: Duration) -> Result<Self, MountError> {
        let span = tracing::debug_span!(
            target: "carousel.mount",
            "carousel.mount",
            id = %mount.id,
            slides = mount.slides.len()
        );
        let _guard = span.enter();

        mount.validate_geometry()?;
        let config = mount.config().map_err(|err| {
            tracing::warn!(target: "carousel.web", id = %mount.id, error = %err, "invalid carousel settings");
            err
        })?;
        let pause_on_hover = config.pause_on_hover;
        let sizing = SlideSizing::for_viewport(mount.viewport_width);
        let slide_width = sizing.slide_width(mount.container_width);
        let engine = Carousel::new(config, mount.slides.len(), slide_width, now)?;

        let mut carousel = Self {
            id: mount.id.clone(),
            engine,
            sizing,
            container_width: mount.container_width,
            images: LazyImageLoader::new(&mount.slides, mount.observer_supported),
            listeners: Listeners::empty(),
            scheduled: None,
            commands: VecDeque::new(),
        };

        if carousel.engine.lifecycle() == Lifecycle::Dormant {
            tracing::debug!(target: "carousel.web", id = %carousel.id, "no slides; mounted dormant");
            return Ok(carousel);
        }

        carousel.push(HostCommand::SizeSlides {
            css_width: sizing.css_width(),
        });
        carousel.flush_engine();
        for action in carousel.images.start() {
            carousel.push(HostCommand::Image(action));
        }
        let listeners = Listeners::for_mount(
            mount.has_prev_button,
            mount.has_next_button,
            pause_on_hover,
        );
        carousel.listeners = listeners;
        carousel.push(HostCommand::Attach(listeners));
        carousel.sync_timer();

        tracing::debug!(
            target: "carousel.web",
            id = %carousel.id,
            slide_width,
            ?listeners,
            "carousel mounted"
        );
        Ok(carousel)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn engine(&self) -> &Carousel {
        &self.engine
    }

    #[inline]
    #[must_use]
    pub fn images(&self) -> &LazyImageLoader {
        &self.images
    }

    /// Listeners currently attached.
    #[inline]
    #[must_use]
    pub const fn listeners(&self) -> Listeners {
        self.listeners
    }

    #[inline]
    #[must_use]
    pub const fn sizing(&self) -> SlideSizing {
        self.sizing
    }

    #[inline]
    #[must_use]
    pub const fn container_width(&self) -> f32 {
        self.container_width
    }

    /// Deadline of the currently requested timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduled
    }

    /// Whether any commands are waiting.
    #[must_use]
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Drain queued host commands in order.
    pub fn drain_commands(&mut self) -> impl Iterator<Item = HostCommand> + '_ {
        self.commands.drain(..)
    }

    /// Handle one host event.
    pub fn dispatch(&mut self, event: HostEvent, now: Duration) {
        if self.engine.lifecycle() != Lifecycle::Active {
            tracing::trace!(
                target: "carousel.web",
                id = %self.id,
                lifecycle = ?self.engine.lifecycle(),
                "event ignored"
            );
            return;
        }
        match event {
            HostEvent::PointerDown(sample) => {
                self.engine.pointer_down(&sample);
            }
            HostEvent::PointerMove(sample) => {
                self.engine.pointer_move(&sample);
            }
            HostEvent::PointerUp(sample) => {
                self.engine.pointer_up(&sample);
            }
            HostEvent::AnimationFrame => {
                self.engine.frame();
            }
            HostEvent::MouseEnter => {
                self.engine.hover_enter();
            }
            HostEvent::MouseLeave => {
                self.engine.hover_leave(now);
            }
            HostEvent::PrevClick => {
                self.engine.prev(now);
            }
            HostEvent::NextClick => {
                self.engine.next(now);
            }
            HostEvent::ContextMenu => {
                self.push(HostCommand::Render(RenderCommand::PreventDefault));
            }
            HostEvent::Resize {
                viewport_width,
                container_width,
            } => self.resize(viewport_width, container_width, now),
            HostEvent::Timer => {
                self.engine.poll(now);
            }
            HostEvent::Intersections(entries) => {
                let actions = self.images.on_intersections(&entries);
                self.push_images(actions);
            }
            HostEvent::Geometry { root, targets } => {
                let actions = self.images.on_geometry(root, &targets);
                self.push_images(actions);
            }
            HostEvent::ImageLoaded { slide } => {
                if let Some(action) = self.images.on_image_load(slide) {
                    self.engine.mark_image_loaded(slide);
                    self.push(HostCommand::Image(action));
                }
            }
        }
        self.flush_engine();
        self.sync_timer();
    }

    /// Tear down: stop autoplay, cancel frames and timers, stop observing,
    /// and detach exactly the listeners that were attached. Idempotent.
    pub fn cleanup(&mut self) -> bool {
        if !self.engine.cleanup() {
            return false;
        }
        self.flush_engine();
        if !self.listeners.is_empty() {
            let attached = std::mem::take(&mut self.listeners);
            self.push(HostCommand::Detach(attached));
        }
        let pending = self.images.disconnect();
        self.push_images(pending);
        self.sync_timer();
        tracing::debug!(target: "carousel.web", id = %self.id, "carousel cleaned up");
        true
    }

    /// Tear down `previous`, which mounted the same container, and queue
    /// its remaining commands ahead of this carousel's own.
    pub(crate) fn take_over(&mut self, mut previous: WebCarousel) {
        previous.cleanup();
        let mut commands = std::mem::take(&mut previous.commands);
        commands.append(&mut self.commands);
        self.commands = commands;
    }

    fn resize(&mut self, viewport_width: f32, container_width: f32, now: Duration) {
        if let Err(err) = mount::check_width("viewport_width", viewport_width)
            .and_then(|()| mount::check_width("container_width", container_width))
        {
            tracing::warn!(target: "carousel.web", id = %self.id, error = %err, "resize ignored");
            return;
        }
        let sizing = SlideSizing::for_viewport(viewport_width);
        if sizing != self.sizing {
            self.sizing = sizing;
            self.push(HostCommand::SizeSlides {
                css_width: sizing.css_width(),
            });
        }
        self.container_width = container_width;
        if let Err(err) = self.engine.resize(sizing.slide_width(container_width), now) {
            tracing::warn!(target: "carousel.web", id = %self.id, error = %err, "resize rejected");
        }
    }

    fn flush_engine(&mut self) {
        let rendered = self.engine.drain_commands();
        self.commands
            .extend(rendered.into_iter().map(HostCommand::Render));
    }

    fn push_images(&mut self, actions: Vec<LoadAction>) {
        self.commands
            .extend(actions.into_iter().map(HostCommand::Image));
    }

    fn sync_timer(&mut self) {
        let wanted = self.engine.next_deadline();
        if wanted == self.scheduled {
            return;
        }
        self.scheduled = wanted;
        self.push(match wanted {
            Some(at) => HostCommand::ScheduleTimer { at },
            None => HostCommand::CancelTimer,
        });
    }

    fn push(&mut self, command: HostCommand) {
        self.commands.push_back(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::PointerPhase;
    use pretty_assertions::assert_eq;

    const SETTINGS: &str = r#"{
        "autoplay": "yes",
        "autoplay_speed": "3000",
        "animation_speed": 400,
        "infinite_loop": false,
        "pause_on_hover": true
    }"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn mount_desc() -> CarouselMount {
        CarouselMount::new("hero", 1000.0, 1440.0)
            .with_settings(SETTINGS)
            .with_buttons(true, true)
            .with_slides(vec![
                SlideDescriptor::deferred("a.jpg"),
                SlideDescriptor::deferred("b.jpg"),
                SlideDescriptor::deferred("c.jpg"),
            ])
    }

    fn mounted() -> WebCarousel {
        let mut carousel = WebCarousel::mount(&mount_desc(), ms(0)).unwrap();
        carousel.drain_commands().for_each(drop);
        carousel
    }

    #[test]
    fn mount_emits_setup_in_order() {
        let mut carousel = WebCarousel::mount(&mount_desc(), ms(0)).unwrap();
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::SizeSlides { css_width: "100%" },
                HostCommand::Render(RenderCommand::SetOffset {
                    offset: 0.0,
                    transition: None,
                }),
                HostCommand::Image(LoadAction::LoadEager {
                    slide: 0,
                    src: "a.jpg".into(),
                }),
                HostCommand::Image(LoadAction::Observe { slide: 1 }),
                HostCommand::Image(LoadAction::Observe { slide: 2 }),
                HostCommand::Attach(Listeners::all()),
                HostCommand::ScheduleTimer { at: ms(3000) },
            ]
        );
    }

    #[test]
    fn mobile_viewport_uses_peek_width() {
        let desc = CarouselMount {
            viewport_width: 390.0,
            container_width: 390.0,
            ..mount_desc()
        };
        let carousel = WebCarousel::mount(&desc, ms(0)).unwrap();
        assert_eq!(carousel.sizing(), SlideSizing::Peek);
        assert!((carousel.engine().slides()[0].width - 300.0).abs() < 0.01);
    }

    #[test]
    fn missing_settings_refuse_to_mount() {
        let desc = CarouselMount {
            settings: None,
            ..mount_desc()
        };
        let err = WebCarousel::mount(&desc, ms(0)).unwrap_err();
        assert!(matches!(
            err,
            MountError::Config(carousel_core::ConfigError::Missing)
        ));
    }

    #[test]
    fn empty_container_mounts_dormant() {
        let desc = mount_desc().with_slides(Vec::new());
        let mut carousel = WebCarousel::mount(&desc, ms(0)).unwrap();
        assert_eq!(carousel.drain_commands().count(), 0);
        assert_eq!(carousel.listeners(), Listeners::empty());
        carousel.dispatch(HostEvent::NextClick, ms(10));
        assert!(!carousel.has_commands());
        assert!(carousel.cleanup());
        assert_eq!(carousel.drain_commands().count(), 0);
    }

    #[test]
    fn next_click_animates_and_reschedules_timer() {
        let mut carousel = mounted();
        carousel.dispatch(HostEvent::NextClick, ms(100));
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::Render(RenderCommand::SetOffset {
                    offset: -1008.0,
                    transition: Some(ms(400)),
                }),
                HostCommand::ScheduleTimer { at: ms(500) },
            ]
        );
        carousel.dispatch(HostEvent::Timer, ms(500));
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(commands, vec![HostCommand::ScheduleTimer { at: ms(3000) }]);
        assert_eq!(carousel.engine().current_index(), 1);
    }

    #[test]
    fn context_menu_is_suppressed() {
        let mut carousel = mounted();
        carousel.dispatch(HostEvent::ContextMenu, ms(5));
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![HostCommand::Render(RenderCommand::PreventDefault)]
        );
    }

    #[test]
    fn touch_drag_round_trip() {
        let mut carousel = mounted();
        carousel.dispatch(
            HostEvent::PointerDown(PointerSample::single_touch(
                PointerPhase::Start,
                500.0,
                200.0,
                ms(10),
            )),
            ms(10),
        );
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::Render(RenderCommand::PreventDefault),
                HostCommand::Render(RenderCommand::SetGrabbing(true)),
                HostCommand::Render(RenderCommand::SetOffset {
                    offset: 0.0,
                    transition: None,
                }),
                HostCommand::Render(RenderCommand::RequestFrame),
                HostCommand::CancelTimer,
            ]
        );

        carousel.dispatch(
            HostEvent::PointerMove(PointerSample::single_touch(
                PointerPhase::Move,
                420.0,
                204.0,
                ms(40),
            )),
            ms(40),
        );
        carousel.dispatch(
            HostEvent::PointerUp(PointerSample::single_touch(
                PointerPhase::End,
                380.0,
                204.0,
                ms(70),
            )),
            ms(70),
        );
        carousel.drain_commands().for_each(drop);
        assert_eq!(carousel.next_deadline(), Some(ms(470)));
        carousel.dispatch(HostEvent::Timer, ms(470));
        assert_eq!(carousel.engine().current_index(), 1);
    }

    #[test]
    fn resize_across_breakpoint_resizes_slides() {
        let mut carousel = mounted();
        carousel.dispatch(
            HostEvent::Resize {
                viewport_width: 800.0,
                container_width: 780.0,
            },
            ms(50),
        );
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands[0],
            HostCommand::SizeSlides {
                css_width: "76.92308%"
            }
        );
        assert!(matches!(
            commands[1],
            HostCommand::Render(RenderCommand::SetOffset {
                transition: None,
                ..
            })
        ));
        assert_eq!(carousel.sizing(), SlideSizing::Peek);
    }

    #[test]
    fn invalid_resize_is_ignored() {
        let mut carousel = mounted();
        carousel.dispatch(
            HostEvent::Resize {
                viewport_width: f32::NAN,
                container_width: 500.0,
            },
            ms(50),
        );
        assert!(!carousel.has_commands());
        assert_eq!(carousel.container_width(), 1000.0);
    }

    #[test]
    fn image_load_marks_slide() {
        let mut carousel = mounted();
        carousel.dispatch(HostEvent::ImageLoaded { slide: 0 }, ms(5));
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![HostCommand::Image(LoadAction::MarkLoaded { slide: 0 })]
        );
        assert!(carousel.engine().slides()[0].image_loaded);
    }

    #[test]
    fn cleanup_detaches_exactly_once() {
        let mut carousel = mounted();
        carousel.dispatch(
            HostEvent::PointerDown(PointerSample::mouse(300.0, 100.0, ms(5))),
            ms(5),
        );
        carousel.drain_commands().for_each(drop);

        assert!(carousel.cleanup());
        let commands: Vec<_> = carousel.drain_commands().collect();
        assert_eq!(
            commands,
            vec![
                HostCommand::Render(RenderCommand::CancelFrame),
                HostCommand::Detach(Listeners::all()),
                HostCommand::Image(LoadAction::Unobserve { slide: 1 }),
                HostCommand::Image(LoadAction::Unobserve { slide: 2 }),
            ]
        );
        assert!(!carousel.cleanup());
        carousel.dispatch(HostEvent::NextClick, ms(10));
        assert_eq!(carousel.drain_commands().count(), 0);
        assert_eq!(carousel.listeners(), Listeners::empty());
    }
}
