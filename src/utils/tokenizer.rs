/// Returns true for characters that belong inside a part.
///
/// ASCII letters and digits form parts, as does anything at or above U+0080,
/// so accented and CJK names survive intact. Everything else (path
/// separators, punctuation, whitespace, ASCII control bytes) is a delimiter.
#[inline]
pub fn is_part_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch as u32 >= 0x80
}

/// Break a relative path into normalized parts.
///
/// Fragments are lowercased and lose a single trailing run of ASCII digits,
/// so `IMG_0042.JPG` yields `img` and `jpg`. Fragments that end up empty are
/// dropped. Duplicates are kept, in path order.
pub fn extract_parts(path: &str) -> Vec<String> {
    path.split(|ch: char| !is_part_char(ch))
        .filter_map(normalize_fragment)
        .collect()
}

/// Distinct parts of a path in ascending order.
pub fn distinct_parts(path: &str) -> Vec<String> {
    let mut parts = extract_parts(path);
    parts.sort_unstable();
    parts.dedup();
    parts
}

fn normalize_fragment(fragment: &str) -> Option<String> {
    if fragment.is_empty() {
        return None;
    }

    let lowered = fragment.to_lowercase();
    let stripped = lowered.trim_end_matches(|ch: char| ch.is_ascii_digit());
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}
