#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    for part in fpm::utils::extract_parts(data) {
        assert!(!part.is_empty());
        assert!(!part.ends_with(|c: char| c.is_ascii_digit()));
        assert!(part.chars().all(fpm::utils::is_part_char));
    }
});
