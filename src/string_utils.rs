//! UTF-8 Safe Offset Utilities
//!
//! The engine's public positions are character offsets, while the regex
//! engine and `str` slicing work on byte offsets. These helpers convert
//! between the two and keep byte positions on character boundaries.
//!
//! # Problem
//! Characters like `ø`, `æ`, `å`, `中`, `🎉` are multi-byte in UTF-8.
//! If you try `text[5..10]` and index 5 or 10 falls inside a multi-byte
//! character, Rust panics.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk backwards to find the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the byte index of the character following the one at `index`.
///
/// `index` must be on a character boundary. Returns `s.len() + 1` when
/// `index` is already at the end, so callers can detect exhaustion with
/// a simple `> s.len()` check.
#[inline]
pub fn next_char_boundary(s: &str, index: usize) -> usize {
    match s[index..].chars().next() {
        Some(c) => index + c.len_utf8(),
        None => s.len() + 1,
    }
}

/// Check if a byte is the start of a UTF-8 character.
///
/// In UTF-8:
/// - Single-byte chars (ASCII): 0xxxxxxx (0x00-0x7F)
/// - Multi-byte char start: 11xxxxxx (0xC0-0xFF)
/// - Continuation bytes: 10xxxxxx (0x80-0xBF)
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Word Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Whether `c` is part of a word for whole-word matching.
///
/// Underscores count as word characters, matching `\w`.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether the byte span `[start, end)` of `text` is delimited by non-word
/// characters (or the text edges) on both sides.
pub fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back().map_or(false, is_word_char);
    let after = text[end..].chars().next().map_or(false, is_word_char);
    !before && !after
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// If the byte index is in the middle of a character, it counts
/// up to (but not including) that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

/// Incremental byte→char converter for ascending byte offsets.
///
/// Converting N sorted offsets costs one pass over the text instead of N.
/// Offsets lower than the previous one restart the walk from the top.
#[derive(Debug)]
pub struct CharCounter<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCounter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// Character offset of `byte_index`.
    pub fn char_index(&mut self, byte_index: usize) -> usize {
        let byte_index = floor_char_boundary(self.text, byte_index);
        if byte_index < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte_index].chars().count();
        self.byte = byte_index;
        self.chars
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
