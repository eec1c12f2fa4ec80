#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;
use tokenforge::engine::token;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(tree) = serde_json::from_str::<serde_json::Value>(input) {
            let _ = token::flatten(&tree, Path::new("fuzz.json"), false);
        }
    }
});
