#![no_main]

use libfuzzer_sys::fuzz_target;
use tokenforge::engine::math;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Must never panic, whatever the expression looks like
        let _ = math::evaluate(input);
    }
});
