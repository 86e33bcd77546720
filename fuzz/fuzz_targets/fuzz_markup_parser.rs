#![no_main]

use libfuzzer_sys::fuzz_target;
use markup_canvas_editor::{parse_markup, sanitize_markup, write_markup};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let sanitized = sanitize_markup(input);
    let tree = parse_markup(&sanitized.markup);
    let written = write_markup(&tree);
    let _ = parse_markup(&written);
});
