#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(handle) = lazyjson::load(Cursor::new(data.to_vec())) else {
        return;
    };
    // Any outcome other than a panic is acceptable: malformed input should
    // always surface as an `Err`, never a crash or a hang.
    let _ = handle.decode(true);
});
