#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use carousel_core::{PointerPhase, PointerSample};
use carousel_web::{
    CarouselMount, HostEvent, IntersectionEntry, Rect, SlideDescriptor, WebCarousel,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    slide_count: u8,
    autoplay: bool,
    infinite_loop: bool,
    clones: bool,
    animation_ms: u16,
    container_width: u16,
    viewport_width: u16,
    events: Vec<Step>,
}

#[derive(Debug, Arbitrary)]
struct Step {
    advance_ms: u16,
    event: Event,
}

#[derive(Debug, Arbitrary)]
enum Event {
    Down { x: i16, y: i16, touch: bool },
    Move { x: i16, y: i16, touch: bool },
    Up { x: i16, y: i16, touch: bool },
    Frame,
    Enter,
    Leave,
    Prev,
    Next,
    ContextMenu,
    Resize { viewport: u16, container: u16 },
    Timer,
    Intersect { slide: u8, visible: bool },
    Geometry { slide: u8, y: i16 },
    Loaded { slide: u8 },
    Cleanup,
}

fn pointer(phase: PointerPhase, x: i16, y: i16, touch: bool, now: Duration) -> PointerSample {
    let (x, y) = (f32::from(x), f32::from(y));
    if touch {
        PointerSample::single_touch(phase, x, y, now)
    } else {
        PointerSample::mouse(x, y, now)
    }
}

fuzz_target!(|input: Input| {
    // Arbitrary event sequences must never panic, never leave the index
    // out of range, and never emit commands after cleanup.
    let settings = format!(
        r#"{{"autoplay":{},"autoplay_speed":3000,"animation_speed":{},"infinite_loop":{},
            "pause_on_hover":true,"loop_strategy":"{}"}}"#,
        input.autoplay,
        input.animation_ms,
        input.infinite_loop,
        if input.clones { "clones" } else { "rewind" },
    );
    let slides = (0..input.slide_count % 12)
        .map(|i| SlideDescriptor::deferred(format!("{i}.jpg")))
        .collect();
    let mount = CarouselMount::new(
        "fuzz",
        f32::from(input.container_width),
        f32::from(input.viewport_width),
    )
    .with_settings(settings)
    .with_slides(slides)
    .with_buttons(true, true);

    let Ok(mut carousel) = WebCarousel::mount(&mount, Duration::ZERO) else {
        return;
    };
    let mut now = Duration::ZERO;
    let mut torn_down = false;

    for step in input.events {
        now += Duration::from_millis(u64::from(step.advance_ms));
        let event = match step.event {
            Event::Down { x, y, touch } => {
                HostEvent::PointerDown(pointer(PointerPhase::Start, x, y, touch, now))
            }
            Event::Move { x, y, touch } => {
                HostEvent::PointerMove(pointer(PointerPhase::Move, x, y, touch, now))
            }
            Event::Up { x, y, touch } => {
                HostEvent::PointerUp(pointer(PointerPhase::End, x, y, touch, now))
            }
            Event::Frame => HostEvent::AnimationFrame,
            Event::Enter => HostEvent::MouseEnter,
            Event::Leave => HostEvent::MouseLeave,
            Event::Prev => HostEvent::PrevClick,
            Event::Next => HostEvent::NextClick,
            Event::ContextMenu => HostEvent::ContextMenu,
            Event::Resize {
                viewport,
                container,
            } => HostEvent::Resize {
                viewport_width: f32::from(viewport),
                container_width: f32::from(container),
            },
            Event::Timer => HostEvent::Timer,
            Event::Intersect { slide, visible } => {
                HostEvent::Intersections(vec![IntersectionEntry {
                    slide: usize::from(slide),
                    is_intersecting: visible,
                    ratio: if visible { 1.0 } else { 0.0 },
                }])
            }
            Event::Geometry { slide, y } => HostEvent::Geometry {
                root: Rect::new(0.0, 0.0, 1200.0, 600.0),
                targets: vec![(usize::from(slide), Rect::new(0.0, f32::from(y), 1200.0, 600.0))],
            },
            Event::Loaded { slide } => HostEvent::ImageLoaded {
                slide: usize::from(slide),
            },
            Event::Cleanup => {
                carousel.cleanup();
                torn_down = true;
                let _ = carousel.drain_commands().count();
                continue;
            }
        };
        carousel.dispatch(event, now);
        let emitted = carousel.drain_commands().count();
        if torn_down {
            assert_eq!(emitted, 0, "commands emitted after cleanup");
        }
        let count = usize::from(input.slide_count % 12);
        if count > 0 {
            assert!(carousel.engine().current_index() < count);
        }
    }
});
