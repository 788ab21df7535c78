// src/counter.rs
// =============================================================================
// This module counts substring occurrences in a byte payload.
//
// Key functionality:
// - A single pure function: give it a body and a needle, get a count back
// - Works on raw bytes, so it never cares whether the body is valid UTF-8
// - Counts non-overlapping matches (after a match we jump past it)
//
// Rust concepts:
// - Slices (&[u8]): A view into a sequence of bytes, borrowed not owned
// - Byte string literals (b"Go"): &[u8] written directly in source
// =============================================================================

// Counts non-overlapping occurrences of `needle` in `haystack`.
//
// Pure and stateless: same inputs always give the same count, no side
// effects. An empty needle matches nothing and returns 0.
//
// Example: count_occurrences(b"GoGoGo", b"Go") == 3
pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut pos = 0;

    // Slide a window over the haystack; on a match, skip the whole needle
    // so overlapping matches are not double counted
    while pos + needle.len() <= haystack.len() {
        if &haystack[pos..pos + needle.len()] == needle {
            count += 1;
            pos += needle.len();
        } else {
            pos += 1;
        }
    }

    count
}
