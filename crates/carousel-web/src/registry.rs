#![forbid(unsafe_code)]

//! Page-level ownership of every mounted carousel.
//!
//! The host scans the page once, hands every container to
//! [`CarouselRegistry::mount_all`], and forwards events by id. A container
//! that fails to mount is reported and skipped; the rest still mount.

use std::time::Duration;

use carousel_core::{Clock, SystemClock};

use crate::error::MountError;
use crate::mount::CarouselMount;
use crate::{HostEvent, WebCarousel};

/// A container that could not be mounted.
#[derive(Debug)]
pub struct MountFailure {
    pub id: String,
    pub error: MountError,
}

/// Owns the carousels on one page.
#[derive(Debug)]
pub struct CarouselRegistry<C: Clock = SystemClock> {
    clock: C,
    carousels: Vec<WebCarousel>,
}

impl CarouselRegistry<SystemClock> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for CarouselRegistry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CarouselRegistry<C> {
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            carousels: Vec::new(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.carousels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carousels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WebCarousel> {
        self.carousels.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WebCarousel> {
        self.carousels.iter().find(|carousel| carousel.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut WebCarousel> {
        self.carousels.iter_mut().find(|carousel| carousel.id() == id)
    }

    /// Mount one container. A container whose id is already mounted is
    /// replaced: the old instance is cleaned up and its teardown commands
    /// are drained from the new instance, ahead of the new setup.
    pub fn mount(&mut self, mount: &CarouselMount) -> Result<&mut WebCarousel, MountError> {
        let carousel = WebCarousel::mount(mount, self.clock.now_mono())?;
        if let Some(index) = self
            .carousels
            .iter()
            .position(|existing| existing.id() == mount.id)
        {
            let replaced = std::mem::replace(&mut self.carousels[index], carousel);
            self.carousels[index].take_over(replaced);
            tracing::debug!(target: "carousel.web", id = %mount.id, "carousel remounted");
            return Ok(&mut self.carousels[index]);
        }
        self.carousels.push(carousel);
        let last = self.carousels.len() - 1;
        Ok(&mut self.carousels[last])
    }

    /// Mount every container, skipping (and reporting) the ones that fail.
    pub fn mount_all<I>(&mut self, mounts: I) -> Vec<MountFailure>
    where
        I: IntoIterator<Item = CarouselMount>,
    {
        let mut failures = Vec::new();
        for mount in mounts {
            if let Err(error) = self.mount(&mount) {
                tracing::warn!(
                    target: "carousel.web",
                    id = %mount.id,
                    error = %error,
                    "carousel skipped"
                );
                failures.push(MountFailure {
                    id: mount.id,
                    error,
                });
            }
        }
        tracing::debug!(
            target: "carousel.web",
            mounted = self.carousels.len(),
            failed = failures.len(),
            "page mounted"
        );
        failures
    }

    /// Forward an event to the carousel with `id`. Returns `false` for an
    /// unknown id.
    pub fn dispatch(&mut self, id: &str, event: HostEvent) -> bool {
        let now = self.clock.now_mono();
        match self.get_mut(id) {
            Some(carousel) => {
                carousel.dispatch(event, now);
                true
            }
            None => {
                tracing::trace!(target: "carousel.web", id, "event for unknown carousel");
                false
            }
        }
    }

    /// Deliver [`HostEvent::Timer`] to every carousel whose deadline has
    /// passed. Returns how many were serviced.
    pub fn poll_due(&mut self) -> usize {
        let now = self.clock.now_mono();
        let mut serviced = 0;
        for carousel in &mut self.carousels {
            if carousel.next_deadline().is_some_and(|due| due <= now) {
                carousel.dispatch(HostEvent::Timer, now);
                serviced += 1;
            }
        }
        serviced
    }

    /// Earliest deadline across every carousel.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.carousels
            .iter()
            .filter_map(WebCarousel::next_deadline)
            .min()
    }

    /// Tear down every carousel. Returns how many were still live.
    pub fn cleanup_all(&mut self) -> usize {
        let torn_down = self
            .carousels
            .iter_mut()
            .map(WebCarousel::cleanup)
            .filter(|changed| *changed)
            .count();
        tracing::debug!(target: "carousel.web", torn_down, "page cleaned up");
        torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::SlideDescriptor;
    use crate::{HostCommand, Listeners};
    use carousel_core::DeterministicClock;

    const AUTOPLAY: &str = r#"{
        "autoplay": true,
        "autoplay_speed": 2000,
        "animation_speed": 300,
        "infinite_loop": true,
        "pause_on_hover": false
    }"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn container(id: &str, settings: Option<&str>) -> CarouselMount {
        let mount = CarouselMount::new(id, 800.0, 1280.0).with_slides(vec![
            SlideDescriptor::eager("a.jpg"),
            SlideDescriptor::deferred("b.jpg"),
        ]);
        match settings {
            Some(settings) => mount.with_settings(settings),
            None => mount,
        }
    }

    fn registry() -> CarouselRegistry<DeterministicClock> {
        CarouselRegistry::with_clock(DeterministicClock::new())
    }

    #[test]
    fn failures_are_reported_and_skipped() {
        let mut registry = registry();
        let failures = registry.mount_all([
            container("one", Some(AUTOPLAY)),
            container("broken", None),
            container("two", Some(AUTOPLAY)),
        ]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, "broken");
        assert_eq!(registry.len(), 2);
        assert!(registry.get("broken").is_none());
        assert!(registry.get("two").is_some());
    }

    #[test]
    fn dispatch_routes_by_id() {
        let mut registry = registry();
        registry.mount_all([container("one", Some(AUTOPLAY))]);
        registry.clock_mut().set(ms(10));
        assert!(registry.dispatch("one", HostEvent::NextClick));
        assert!(!registry.dispatch("missing", HostEvent::NextClick));
        let deadline = registry
            .get("one")
            .and_then(|carousel| carousel.engine().controller().deadline());
        assert_eq!(deadline, Some(ms(310)));
    }

    #[test]
    fn poll_due_services_only_expired_timers() {
        let mut registry = registry();
        registry.mount_all([container("one", Some(AUTOPLAY))]);
        registry.clock_mut().set(ms(500));
        registry.mount_all([container("two", Some(AUTOPLAY))]);
        assert_eq!(registry.next_deadline(), Some(ms(2000)));

        registry.clock_mut().set(ms(2000));
        assert_eq!(registry.poll_due(), 1);
        let index = registry.get("two").map(|carousel| carousel.engine().current_index());
        assert_eq!(index, Some(0));
        assert_eq!(registry.next_deadline(), Some(ms(2300)));
    }

    #[test]
    fn remount_replaces_and_cleans_up() {
        let mut registry = registry();
        registry.mount_all([container("one", Some(AUTOPLAY))]);
        registry.mount_all([container("one", Some(AUTOPLAY))]);
        assert_eq!(registry.len(), 1);

        let commands: Vec<_> = registry
            .get_mut("one")
            .map(|carousel| carousel.drain_commands().collect())
            .unwrap_or_default();
        let attaches: Vec<usize> = positions(&commands, |c| matches!(c, HostCommand::Attach(_)));
        let detaches: Vec<usize> = positions(&commands, |c| matches!(c, HostCommand::Detach(_)));
        assert_eq!(attaches.len(), 2);
        assert_eq!(detaches.len(), 1);
        assert!(attaches[0] < detaches[0] && detaches[0] < attaches[1]);
        let cancel = positions(&commands, |c| *c == HostCommand::CancelTimer);
        let schedules = positions(&commands, |c| matches!(c, HostCommand::ScheduleTimer { .. }));
        assert_eq!(cancel.len(), 1);
        assert!(schedules.last().is_some_and(|last| *last > cancel[0]));
    }

    #[test]
    fn remount_after_host_drained_detaches_before_attaching() {
        let mut registry = registry();
        registry.mount_all([container("one", Some(AUTOPLAY))]);
        if let Some(carousel) = registry.get_mut("one") {
            carousel.drain_commands().for_each(drop);
        }
        registry.clock_mut().set(ms(1000));
        registry.mount_all([container("one", Some(AUTOPLAY))]);

        let commands: Vec<_> = registry
            .get_mut("one")
            .map(|carousel| carousel.drain_commands().collect())
            .unwrap_or_default();
        let listeners = Listeners::for_mount(false, false, false);
        assert_eq!(commands.first(), Some(&HostCommand::Detach(listeners)));
        assert_eq!(
            positions(&commands, |c| *c == HostCommand::Attach(listeners)).len(),
            1
        );
        assert_eq!(
            commands.last(),
            Some(&HostCommand::ScheduleTimer { at: ms(3000) })
        );
    }

    fn positions(commands: &[HostCommand], pred: impl Fn(&HostCommand) -> bool) -> Vec<usize> {
        commands
            .iter()
            .enumerate()
            .filter(|(_, command)| pred(command))
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn cleanup_all_detaches_everything_once() {
        let mut registry = registry();
        registry.mount_all([
            container("one", Some(AUTOPLAY)),
            container("two", Some(AUTOPLAY)),
        ]);
        for carousel in &mut registry.carousels {
            carousel.drain_commands().for_each(drop);
        }
        assert_eq!(registry.cleanup_all(), 2);
        for carousel in &mut registry.carousels {
            let commands: Vec<_> = carousel.drain_commands().collect();
            assert!(commands.contains(&HostCommand::Detach(Listeners::for_mount(
                false, false, false
            ))));
            assert!(commands.contains(&HostCommand::CancelTimer));
        }
        assert_eq!(registry.cleanup_all(), 0);
        assert_eq!(registry.next_deadline(), None);
    }
}
