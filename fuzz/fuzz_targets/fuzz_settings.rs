#![no_main]

use carousel_core::CarouselConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Settings come straight from a page attribute: garbage must be rejected
    // with an error, and anything accepted must be accepted again after
    // re-serialization.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = CarouselConfig::from_payload(Some(text)) else {
        return;
    };
    let encoded = serde_json::to_string(&config).expect("valid config serializes");
    let reparsed = CarouselConfig::from_json(&encoded).expect("re-serialized config parses");
    assert_eq!(reparsed.autoplay, config.autoplay);
    assert_eq!(reparsed.infinite_loop, config.infinite_loop);
    assert_eq!(reparsed.loop_strategy, config.loop_strategy);
});
