//! UTF-8 Safe String Utilities
//!
//! Selection offsets handed to the text transform are byte offsets and may
//! come from a host that does not know about UTF-8. Characters like `ø`,
//! `中` or `🎉` are multi-byte, and slicing inside one panics, so every offset
//! is snapped to a character boundary before the buffer is sliced.
//!
//! # Example
//! ```
//! use readme_genius::string_utils::{floor_char_boundary, line_start};
//!
//! let text = "Hei på deg\nline two";
//! assert_eq!(floor_char_boundary(text, 6), 5); // middle of 'å'
//! assert_eq!(line_start(text, 13), 11);
//! ```

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

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// Continuation bytes look like `10xxxxxx`; everything else starts a char.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Byte offset of the start of the line containing `index`.
///
/// Scans backward to the nearest preceding `\n` (or the buffer start).
/// `index` must be on a character boundary.
#[inline]
pub fn line_start(s: &str, index: usize) -> usize {
    let index = index.min(s.len());
    s[..index].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the end of the line containing `index` (the position of
/// the next `\n`, or the buffer length).
#[inline]
pub fn line_end(s: &str, index: usize) -> usize {
    let index = index.min(s.len());
    s[index..].find('\n').map(|i| index + i).unwrap_or(s.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
