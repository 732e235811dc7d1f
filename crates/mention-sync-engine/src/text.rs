//! # Text offsets
//!
//! The engine works with two coordinate systems:
//!
//! - **HTML positions** are byte offsets into the stored HTML string.
//! - **Plain-text positions** are `char` offsets into the plain-text
//!   projection, the same units an editor reports selections in.
//!
//! [`Span`] is used for both; the field it is stored in says which.
//!
//! A character reference in the HTML (`&lt;`, `&amp;`, `&#233;`) is one
//! plain-text char. Text written into the HTML is escaped, so typed markup
//! never turns into tags.

use std::borrow::Cow;

use serde::Serialize;

/// A half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True if `offset` lies in `[start, end]`, both ends inclusive.
    #[must_use]
    pub fn touches(self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// True if `offset` lies strictly between `start` and `end`.
    #[must_use]
    pub fn strictly_contains(self, offset: usize) -> bool {
        self.start < offset && offset < self.end
    }

    /// True if the two spans share at least one position.
    #[must_use]
    pub fn intersects(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Number of chars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the `char_idx`-th char of `s`.
///
/// `char_idx == char_len(s)` maps to `s.len()`; anything past that is `None`.
pub fn byte_offset(s: &str, char_idx: usize) -> Option<usize> {
    if char_idx == 0 {
        return Some(0);
    }
    let mut seen = 0;
    for (byte, _) in s.char_indices() {
        if seen == char_idx {
            return Some(byte);
        }
        seen += 1;
    }
    (seen == char_idx).then_some(s.len())
}

/// Slices `s` by a char span, clamping both ends to the string.
pub fn slice_chars(s: &str, sp: Span) -> &str {
    let start = byte_offset(s, sp.start).unwrap_or(s.len());
    let end = byte_offset(s, sp.end).unwrap_or(s.len()).max(start);
    &s[start..end]
}

/// Longest character reference looked for, `&` through `;`.
const MAX_REFERENCE_LEN: usize = 40;

/// The first char of HTML text and the bytes it takes.
///
/// A character reference stands for the single char it decodes to. A `&`
/// that starts no reference is itself.
pub fn html_char(html: &str) -> Option<(char, usize)> {
    let c = html.chars().next()?;
    if c == '&' {
        if let Some(end) = html.bytes().take(MAX_REFERENCE_LEN).position(|b| b == b';') {
            let decoded = html_escape::decode_html_entities(&html[..=end]);
            let mut chars = decoded.chars();
            if let (Some(d), None) = (chars.next(), chars.next()) {
                return Some((d, end + 1));
            }
        }
    }
    Some((c, c.len_utf8()))
}

/// What a run of HTML text (no tags) displays as.
pub fn decode_html_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some((c, len)) = html_char(rest) {
        out.push(c);
        rest = &rest[len..];
    }
    out
}

/// Escapes `&`, `<` and `>` so `text` is stored as text.
pub fn encode_html_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Truncates `s` to `max` chars with a "..." suffix if needed.
///
/// Used for human-readable snapshot output.
pub fn preview(s: &str, max: usize) -> String {
    match byte_offset(s, max) {
        Some(cut) if cut < s.len() => format!("{}...", &s[..cut]),
        _ => s.to_string(),
    }
}
