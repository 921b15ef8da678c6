//! Splits source text into bounded, non-overlapping chunks.
//!
//! Chunks are measured in characters, sliced on char boundaries, and
//! concatenate back to the original text exactly.

/// Number of chunks a text of `char_len` characters produces.
///
/// Always at least 1, including for empty text, so every source yields a
/// report section even when there is nothing to send.
#[must_use]
pub fn chunk_count(char_len: usize, max_chunk_size: usize) -> usize {
    if char_len == 0 {
        1
    } else {
        char_len.div_ceil(max_chunk_size)
    }
}

/// Slice `text` into chunks of at most `max_chunk_size` characters.
///
/// # Panics
///
/// Panics if `max_chunk_size` is zero.
#[must_use]
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<&str> {
    assert!(max_chunk_size > 0, "max_chunk_size must be positive");

    if text.is_empty() {
        return vec![""];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chars_in_chunk = 0;

    for (idx, _) in text.char_indices() {
        if chars_in_chunk == max_chunk_size {
            chunks.push(&text[start..idx]);
            start = idx;
            chars_in_chunk = 0;
        }
        chars_in_chunk += 1;
    }
    chunks.push(&text[start..]);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_text_is_one_chunk() {
        assert_eq!(chunk_count(0, 6000), 1);
        assert_eq!(chunk_text("", 6000), vec![""]);
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("hello", 6000);
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let chunks = chunk_text("abcdef", 3);
        assert_eq!(chunks, vec!["abc", "def"]);
        assert_eq!(chunk_count(6, 3), 2);
    }

    #[test]
    fn remainder_forms_final_chunk() {
        let chunks = chunk_text("abcdefg", 3);
        assert_eq!(chunks, vec!["abc", "def", "g"]);
        assert_eq!(chunk_count(7, 3), 3);
    }

    #[test]
    fn multibyte_chars_slice_on_boundaries() {
        let text = "αβγδε";
        let chunks = chunk_text(text, 2);
        assert_eq!(chunks, vec!["αβ", "γδ", "ε"]);
    }

    proptest! {
        #[test]
        fn concatenation_reconstructs_input(text in ".{0,300}", max in 1usize..50) {
            let chunks = chunk_text(&text, max);
            let rebuilt: String = chunks.concat();
            prop_assert_eq!(rebuilt, text);
        }

        #[test]
        fn count_matches_formula(text in ".{0,300}", max in 1usize..50) {
            let chunks = chunk_text(&text, max);
            let chars = text.chars().count();
            prop_assert_eq!(chunks.len(), chunk_count(chars, max));
        }

        #[test]
        fn no_chunk_exceeds_max(text in ".{0,300}", max in 1usize..50) {
            for chunk in chunk_text(&text, max) {
                prop_assert!(chunk.chars().count() <= max);
            }
        }
    }
}
