use serde::Serialize;

use crate::text::{Span, slice_chars};

/// A selection as reported by the editor, in chars.
///
/// `None` marks an end the editor could not report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// A collapsed selection.
    pub fn caret(at: usize) -> Self {
        Self::new(at, at)
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    /// The caret position: `end`, falling back to `start`.
    pub fn head(self) -> Option<usize> {
        self.end.or(self.start)
    }

    pub fn is_collapsed(self) -> bool {
        self.start == self.end
    }

    /// The known ends as an ordered span, or `None` if neither is known.
    pub fn span(self) -> Option<Span> {
        match (self.start, self.end) {
            (Some(a), Some(b)) => Some(Span::new(a.min(b), a.max(b))),
            (Some(a), None) | (None, Some(a)) => Some(Span::new(a, a)),
            (None, None) => None,
        }
    }

    fn known(self) -> impl Iterator<Item = usize> {
        self.start.into_iter().chain(self.end)
    }
}

/// What changed between two consecutive plain texts, in chars.
///
/// `old[change_start..old_change_end]` was replaced by
/// `new[change_start..new_change_end]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffRegion {
    pub change_start: usize,
    /// Exclusive end in the old text.
    pub old_change_end: usize,
    /// Exclusive end in the new text.
    pub new_change_end: usize,
}

impl DiffRegion {
    /// The replaced range in the old text.
    pub fn old_span(self) -> Span {
        Span::new(self.change_start, self.old_change_end)
    }

    /// The inserted range in the new text.
    pub fn new_span(self) -> Span {
        Span::new(self.change_start, self.new_change_end)
    }

    /// The text that replaced `old_span()`.
    pub fn change_text(self, new_text: &str) -> &str {
        slice_chars(new_text, self.new_span())
    }

    /// True when nothing was removed and nothing inserted.
    pub fn is_noop(self) -> bool {
        self.old_change_end == self.change_start && self.new_change_end == self.change_start
    }
}

/// Locates the changed region between two plain texts.
///
/// The change starts at the smallest known selection offset (or the shorter
/// text's length); the ends come from matching a common suffix backwards from
/// both string ends, never crossing the start. Trusting the selection is what
/// disambiguates edits like inserting `"a"` into `"aaa"`.
pub fn locate(old: &str, new: &str, previous: Selection, current: Selection) -> DiffRegion {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    let change_start = previous
        .known()
        .chain(current.known())
        .chain([old.len(), new.len()])
        .min()
        .unwrap_or(0);

    let mut old_end = old.len();
    let mut new_end = new.len();
    while old_end > change_start && new_end > change_start && old[old_end - 1] == new[new_end - 1]
    {
        old_end -= 1;
        new_end -= 1;
    }

    DiffRegion {
        change_start,
        old_change_end: old_end,
        new_change_end: new_end,
    }
}
