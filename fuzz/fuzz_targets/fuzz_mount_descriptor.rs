#![no_main]

use carousel_web::{CarouselMount, WebCarousel};
use libfuzzer_sys::fuzz_target;
use std::time::Duration;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON descriptors either fail to parse, fail to mount, or
    // mount and tear down cleanly.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mount) = CarouselMount::from_json(text) else {
        return;
    };
    if let Ok(mut carousel) = WebCarousel::mount(&mount, Duration::ZERO) {
        let _ = carousel.drain_commands().count();
        carousel.cleanup();
        assert!(!carousel.cleanup());
    }
});
