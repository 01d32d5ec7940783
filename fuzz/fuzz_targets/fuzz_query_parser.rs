#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must not panic on any input, including multi-byte markers and whitespace
    let query = fpm::query::parse_part_query(data);
    let _ = query.is_match_all();
});
