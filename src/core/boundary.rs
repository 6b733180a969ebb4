// File: src/core/boundary.rs
//! Word-boundary tracking over the live buffer.
//!
//! A word is a maximal run of non-whitespace characters, where whitespace is
//! anything with the Unicode `White_Space` property. All offsets here are
//! character offsets.

use crate::core::types::Span;

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Span of the word touching `offset`.
///
/// Scans left while the preceding character is not whitespace and right
/// while the current one is not. When `offset` only touches whitespace the
/// span is empty and sits at `offset`. Offsets past the end are clamped.
pub fn word_boundary(buffer: &str, offset: usize) -> Span {
    let chars: Vec<char> = buffer.chars().collect();
    let offset = offset.min(chars.len());

    let mut start = offset;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    let mut end = offset;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }
    Span::new(start, end)
}

/// Span of the word that ends at the cursor, used by commit-on-space.
///
/// Empty unless the character right before the cursor is part of a word.
pub fn word_before(buffer: &str, cursor: usize) -> Span {
    let cursor = cursor.min(char_len(buffer));
    match cursor.checked_sub(1) {
        Some(prev) if buffer.chars().nth(prev).is_some_and(|c| !c.is_whitespace()) => {
            word_boundary(buffer, prev)
        }
        _ => Span::empty(cursor),
    }
}

/// Byte index of the character at `offset`, or the byte length when the
/// offset is at or past the end.
pub fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// The text covered by `span`.
pub fn slice_chars(text: &str, span: Span) -> &str {
    &text[byte_offset(text, span.start)..byte_offset(text, span.end)]
}

/// Replaces the characters covered by `span` with `replacement`.
pub fn replace_chars(text: &mut String, span: Span, replacement: &str) {
    let start = byte_offset(text, span.start);
    let end = byte_offset(text, span.end);
    text.replace_range(start..end, replacement);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_word_around_offset() {
        let text = "main namaste";
        assert_eq!(word_boundary(text, 7), Span::new(5, 12));
        assert_eq!(word_boundary(text, 12), Span::new(5, 12));
        assert_eq!(word_boundary(text, 0), Span::new(0, 4));
    }

    #[test]
    fn offset_right_after_word_touches_it() {
        assert_eq!(word_boundary("hello world", 5), Span::new(0, 5));
    }

    #[test]
    fn only_whitespace_gives_empty_span() {
        let text = "a   b";
        let span = word_boundary(text, 2);
        assert!(span.is_empty());
        assert_eq!(span.start, 2);
        assert!(word_boundary("", 0).is_empty());
    }

    #[test]
    fn unicode_whitespace_splits_words() {
        // U+3000 ideographic space and a tab
        let text = "नमस्ते\u{3000}दुनिया\tok";
        assert_eq!(word_boundary(text, 2), Span::new(0, 6));
        assert_eq!(word_boundary(text, 8), Span::new(7, 13));
        assert_eq!(word_boundary(text, 15), Span::new(14, 16));
    }

    #[test]
    fn offset_past_end_is_clamped() {
        assert_eq!(word_boundary("abc", 99), Span::new(0, 3));
    }

    #[test]
    fn span_is_contained_and_touches_offset() {
        let buffers = ["", " ", "a", "ab cd", "  lead", "trail  ", "x\ny z", "नमस्ते दुनिया"];
        for buffer in buffers {
            let len = char_len(buffer);
            let chars: Vec<char> = buffer.chars().collect();
            for offset in 0..=len {
                let span = word_boundary(buffer, offset);
                assert!(span.start <= span.end && span.end <= len, "{buffer:?} @ {offset}");
                let near_word = (offset > 0 && !chars[offset - 1].is_whitespace())
                    || (offset < len && !chars[offset].is_whitespace());
                if near_word {
                    assert!(span.touches(offset), "{buffer:?} @ {offset} -> {span}");
                    assert!(!span.is_empty());
                } else {
                    assert!(span.is_empty(), "{buffer:?} @ {offset} -> {span}");
                }
            }
        }
    }

    #[test]
    fn word_before_requires_word_char_before_cursor() {
        assert_eq!(word_before("main namaste", 12), Span::new(5, 12));
        assert!(word_before("abc ", 4).is_empty());
        assert!(word_before("abc", 0).is_empty());
        // cursor in the middle picks up the whole word
        assert_eq!(word_before("namaste", 3), Span::new(0, 7));
    }

    #[test]
    fn slices_and_replaces_by_characters() {
        let mut text = String::from("main नमस्ते ok");
        let span = Span::new(5, 11);
        assert_eq!(slice_chars(&text, span), "नमस्ते");
        replace_chars(&mut text, span, "namaste");
        assert_eq!(text, "main namaste ok");
        let end = char_len(&text);
        replace_chars(&mut text, Span::empty(end), "!");
        assert_eq!(text, "main namaste ok!");
    }
}
