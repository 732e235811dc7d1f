//! Applies a plain-text edit to the HTML it was projected from.
//!
//! The walk runs once per nesting level over that level's tags in document
//! order. A tag is compared with the change (both in plain-text chars) and
//! either copied, recursed into, trimmed to whole words (mentions), or dropped.
//! HTML outside the change is carried over byte for byte. Inserted text is
//! escaped, so a user typing `<div>` gets text, not an element.
//!
//! State moves through three phases:
//!
//! - `BeforeChange`: the replacement has not been written yet
//! - `Deleting`: the replacement is out; text and tags up to the change end are dropped
//! - `Done`: the rest of the level is copied verbatim

use serde::Serialize;
use thiserror::Error;

use crate::{
    parsing::{TagForest, TagId, TagNode},
    text::{Span, char_len, encode_html_text, html_char, slice_chars},
};

use super::{
    diff::DiffRegion,
    words::{MentionCut, content_after_cut, mention_cut},
};

/// The patched HTML and, when the patch moved it, the caret.
///
/// `new_selection: None` means the caret belongs where the editor already
/// put it: just after the inserted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub html: String,
    pub new_selection: Option<usize>,
}

impl Patch {
    fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_string(),
            new_selection: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The tag forest, texts and diff do not describe the same document.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

fn violation(message: impl Into<String>) -> PatchError {
    PatchError::InvariantViolation(message.into())
}

/// Rewrites `html` so that its projection changes from `old_text` to `new_text`.
///
/// `tags` must be the parse of `html` and `old_text` its projection. `diff`
/// comes from [`locate`](super::diff::locate) and `change_text` is the slice
/// of `new_text` it inserted. `change_text` is written escaped.
///
/// # Errors
/// [`PatchError::InvariantViolation`] when the diff is out of range or the
/// tags are not in document order.
pub fn patch(
    html: &str,
    old_text: &str,
    new_text: &str,
    tags: &TagForest,
    diff: DiffRegion,
    change_text: &str,
    trigger: &str,
) -> Result<Patch, PatchError> {
    let old_len = char_len(old_text);
    let new_len = char_len(new_text);
    if diff.change_start > diff.old_change_end || diff.old_change_end > old_len {
        return Err(violation(format!(
            "old change {:?} outside text of {old_len} chars",
            diff.old_span()
        )));
    }
    if diff.change_start > diff.new_change_end || diff.new_change_end > new_len {
        return Err(violation(format!(
            "new change {:?} outside text of {new_len} chars",
            diff.new_span()
        )));
    }

    let change = diff.old_span();
    if change.is_empty() && change_text.is_empty() {
        return Ok(Patch::unchanged(html));
    }
    if change.start == 0 && change.end == old_len {
        log::debug!("replacing whole document ({} tags)", tags.len());
        return Ok(Patch {
            html: encode_html_text(new_text).into_owned(),
            new_selection: None,
        });
    }

    let escaped = encode_html_text(change_text);
    let replacement = Replacement {
        html: &escaped,
        plain_len: char_len(change_text),
    };
    Patcher::new(html, old_text, tags, trigger).patch_level(Level::root(html, tags), change, replacement)
}

/// Replaces `range` of the projection with raw `markup`, which projects to
/// `markup_plain_len` chars.
///
/// Runs the same walk as [`patch`], so mentions touched by `range` are
/// trimmed or replaced the same way, but the inserted text is not escaped.
/// Used to insert new mention tags.
///
/// # Errors
/// [`PatchError::InvariantViolation`] when `range` is outside `old_text`.
pub fn splice_markup(
    html: &str,
    old_text: &str,
    tags: &TagForest,
    range: Span,
    markup: &str,
    markup_plain_len: usize,
    trigger: &str,
) -> Result<Patch, PatchError> {
    if range.start > range.end || range.end > char_len(old_text) {
        return Err(violation(format!("splice range {range:?} outside text")));
    }
    let replacement = Replacement {
        html: markup,
        plain_len: markup_plain_len,
    };
    Patcher::new(html, old_text, tags, trigger).patch_level(Level::root(html, tags), range, replacement)
}

/// Where a tag lies relative to the change. Plain-text chars throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overlap {
    /// The tag ends before the change.
    TagBefore,
    /// The change ends before the tag.
    EditBefore,
    /// The change is exactly the tag.
    Coincides,
    /// The change lies within the tag.
    Inside,
    /// The change starts before the tag and ends inside it.
    SpansIn,
    /// The change starts inside the tag and ends after it.
    SpansOut,
    /// The change covers the tag and more.
    Engulfs,
}

impl Overlap {
    /// First matching rule wins.
    ///
    /// Touching ends: text inserted at a tag's start goes before it, text
    /// inserted at its end counts as inside. Empty tags (self-closing, no
    /// projection) are only ever before, after or engulfed.
    pub(crate) fn classify(tag: Span, change: Span) -> Self {
        if tag.is_empty() {
            return if tag.start <= change.start {
                Self::TagBefore
            } else if tag.start >= change.end {
                Self::EditBefore
            } else {
                Self::Engulfs
            };
        }

        if change.end <= tag.start {
            Self::EditBefore
        } else if tag.end < change.start || (tag.end == change.start && !change.is_empty()) {
            Self::TagBefore
        } else if change == tag {
            Self::Coincides
        } else if change.start >= tag.start && change.end <= tag.end {
            Self::Inside
        } else if change.start < tag.start && change.end < tag.end {
            Self::SpansIn
        } else if change.start >= tag.start {
            Self::SpansOut
        } else {
            Self::Engulfs
        }
    }
}

/// What the change writes: HTML, and the plain chars it projects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Replacement<'r> {
    html: &'r str,
    plain_len: usize,
}

impl Replacement<'static> {
    const NONE: Self = Self { html: "", plain_len: 0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase<'r> {
    BeforeChange { replacement: Replacement<'r> },
    Deleting,
    Done,
}

/// One nesting level: the root document or an element's content.
#[derive(Debug, Clone, Copy)]
struct Level<'a> {
    /// Byte range of the level's HTML.
    range: Span,
    /// Plain offset at `range.start`.
    plain_start: usize,
    tags: &'a [TagId],
}

impl<'a> Level<'a> {
    fn root(html: &str, forest: &'a TagForest) -> Self {
        Self {
            range: Span::new(0, html.len()),
            plain_start: 0,
            tags: forest.roots(),
        }
    }

    fn content_of(node: &'a TagNode) -> Self {
        Self {
            range: node.content_span(),
            plain_start: node.plain.start,
            tags: &node.children,
        }
    }
}

/// Output so far plus the read position in both coordinate systems.
struct PatchState<'r> {
    out: String,
    /// Byte offset into the HTML.
    cursor: usize,
    /// Plain offset of `cursor`.
    cursor_plain: usize,
    phase: Phase<'r>,
    selection: Option<usize>,
}

impl<'r> PatchState<'r> {
    fn new(level: &Level<'_>, replacement: Replacement<'r>) -> Self {
        Self {
            out: String::with_capacity(level.range.len() + replacement.html.len()),
            cursor: level.range.start,
            cursor_plain: level.plain_start,
            phase: Phase::BeforeChange { replacement },
            selection: None,
        }
    }

    /// Byte offset `target - cursor_plain` chars after the cursor, not past `limit`.
    fn byte_at(&self, html: &str, limit: usize, target: usize) -> Result<usize, PatchError> {
        if target < self.cursor_plain || limit < self.cursor {
            return Err(violation(format!(
                "plain offset {target} is behind the patch cursor at {}",
                self.cursor_plain
            )));
        }
        let mut pos = self.cursor;
        for _ in self.cursor_plain..target {
            let (_, len) = html_char(&html[pos..limit]).ok_or_else(|| {
                violation(format!("plain offset {target} runs past byte {limit}"))
            })?;
            pos += len;
        }
        Ok(pos)
    }

    fn copy_text_to(mut self, html: &str, limit: usize, target: usize) -> Result<Self, PatchError> {
        let end = self.byte_at(html, limit, target)?;
        self.out.push_str(&html[self.cursor..end]);
        self.cursor = end;
        self.cursor_plain = target;
        Ok(self)
    }

    fn skip_text_to(mut self, html: &str, limit: usize, target: usize) -> Result<Self, PatchError> {
        self.cursor = self.byte_at(html, limit, target)?;
        self.cursor_plain = target;
        Ok(self)
    }

    fn copy_to_tag(mut self, html: &str, tag: &TagNode) -> Self {
        let start = tag.outer_span().start;
        self.out.push_str(&html[self.cursor..start]);
        self.cursor = start;
        self.cursor_plain = tag.plain.start;
        self
    }

    fn skip_to_tag(mut self, tag: &TagNode) -> Self {
        self.cursor = tag.outer_span().start;
        self.cursor_plain = tag.plain.start;
        self
    }

    fn copy_tag(mut self, html: &str, tag: &TagNode) -> Self {
        let end = tag.outer_span().end;
        self.out.push_str(&html[self.cursor..end]);
        self.cursor = end;
        self.cursor_plain = tag.plain.end;
        self
    }

    fn skip_tag(mut self, tag: &TagNode) -> Self {
        self.cursor = tag.outer_span().end;
        self.cursor_plain = tag.plain.end;
        self
    }

    fn emit(mut self, s: &str) -> Self {
        self.out.push_str(s);
        self
    }

    fn select(mut self, selection: Option<usize>) -> Self {
        if selection.is_some() {
            self.selection = selection;
        }
        self
    }

    fn phase(mut self, phase: Phase<'r>) -> Self {
        self.phase = phase;
        self
    }
}

/// A rewritten tag and the caret it implies, if any.
struct TagEdit {
    html: String,
    selection: Option<usize>,
}

struct Patcher<'a> {
    html: &'a str,
    old_text: &'a str,
    forest: &'a TagForest,
    trigger: &'a str,
}

impl<'a> Patcher<'a> {
    fn new(html: &'a str, old_text: &'a str, forest: &'a TagForest, trigger: &'a str) -> Self {
        Self {
            html,
            old_text,
            forest,
            trigger,
        }
    }

    fn patch_level(&self, level: Level<'_>, change: Span, replacement: Replacement<'_>) -> Result<Patch, PatchError> {
        let mut state = PatchState::new(&level, replacement);
        for &id in level.tags {
            if state.phase == Phase::Done {
                break;
            }
            state = self.step(state, &level, change, self.forest.get(id))?;
        }
        let state = self.finish_level(state, &level, change)?;
        Ok(Patch {
            html: state.out,
            new_selection: state.selection,
        })
    }

    fn step<'r>(
        &self,
        state: PatchState<'r>,
        level: &Level<'_>,
        change: Span,
        tag: &TagNode,
    ) -> Result<PatchState<'r>, PatchError> {
        let outer = tag.outer_span();
        if outer.start < state.cursor || tag.plain.start < state.cursor_plain || outer.end > level.range.end {
            return Err(violation(format!(
                "tag {:?} at bytes {outer:?} is out of document order",
                tag.id
            )));
        }
        match state.phase {
            Phase::BeforeChange { replacement } => self.step_before(state, change, tag, replacement),
            Phase::Deleting => self.step_deleting(state, change, tag),
            Phase::Done => Ok(state),
        }
    }

    fn step_before<'r>(
        &self,
        state: PatchState<'r>,
        change: Span,
        tag: &TagNode,
        replacement: Replacement<'r>,
    ) -> Result<PatchState<'r>, PatchError> {
        let html = self.html;
        let tag_start = tag.outer_span().start;
        let overlap = Overlap::classify(tag.plain, change);
        log::trace!("tag {:?} {:?} vs change {change:?}: {overlap:?}", tag.id, tag.plain);

        let state = match overlap {
            Overlap::TagBefore => return Ok(state.copy_tag(html, tag)),
            Overlap::EditBefore => state
                .copy_text_to(html, tag_start, change.start)?
                .emit(replacement.html)
                .skip_text_to(html, tag_start, change.end)?,
            Overlap::Coincides => {
                let caret = tag.plain.start + replacement.plain_len;
                state
                    .copy_to_tag(html, tag)
                    .skip_tag(tag)
                    .emit(replacement.html)
                    .select(Some(caret))
            }
            Overlap::Inside => {
                let edit = self.edit_inside(tag, change, replacement)?;
                state
                    .copy_to_tag(html, tag)
                    .emit(&edit.html)
                    .skip_tag(tag)
                    .select(edit.selection)
            }
            Overlap::SpansIn => {
                let edit = self.remove_range(tag, Span::new(tag.plain.start, change.end))?;
                state
                    .copy_text_to(html, tag_start, change.start)?
                    .emit(replacement.html)
                    .skip_to_tag(tag)
                    .emit(&edit.html)
                    .skip_tag(tag)
            }
            Overlap::SpansOut => {
                let edit = self.remove_range(tag, Span::new(change.start, tag.plain.end))?;
                let caret = edit.selection.map(|s| s + replacement.plain_len);
                return Ok(state
                    .copy_to_tag(html, tag)
                    .emit(&edit.html)
                    .emit(replacement.html)
                    .skip_tag(tag)
                    .select(caret)
                    .phase(Phase::Deleting));
            }
            Overlap::Engulfs => {
                return Ok(state
                    .copy_text_to(html, tag_start, change.start)?
                    .emit(replacement.html)
                    .skip_tag(tag)
                    .phase(Phase::Deleting));
            }
        };
        Ok(state.phase(Phase::Done))
    }

    fn step_deleting<'r>(
        &self,
        state: PatchState<'r>,
        change: Span,
        tag: &TagNode,
    ) -> Result<PatchState<'r>, PatchError> {
        if tag.plain.start >= change.end {
            let tag_start = tag.outer_span().start;
            return Ok(state
                .skip_text_to(self.html, tag_start, change.end)?
                .phase(Phase::Done));
        }
        if tag.plain.end <= change.end {
            log::trace!("dropping tag {:?} inside deleted range", tag.id);
            return Ok(state.skip_tag(tag));
        }
        let edit = self.remove_range(tag, Span::new(tag.plain.start, change.end))?;
        Ok(state
            .skip_to_tag(tag)
            .emit(&edit.html)
            .skip_tag(tag)
            .phase(Phase::Done))
    }

    fn finish_level<'r>(
        &self,
        state: PatchState<'r>,
        level: &Level<'_>,
        change: Span,
    ) -> Result<PatchState<'r>, PatchError> {
        let limit = level.range.end;
        let mut state = match state.phase {
            Phase::BeforeChange { replacement } => state
                .copy_text_to(self.html, limit, change.start)?
                .emit(replacement.html)
                .skip_text_to(self.html, limit, change.end)?,
            Phase::Deleting => state.skip_text_to(self.html, limit, change.end)?,
            Phase::Done => state,
        };
        state.out.push_str(&self.html[state.cursor..limit]);
        Ok(state)
    }

    /// A change wholly within `tag`.
    fn edit_inside(&self, tag: &TagNode, change: Span, replacement: Replacement<'_>) -> Result<TagEdit, PatchError> {
        if !tag.is_mention() {
            return self.edit_element(tag, change, replacement);
        }
        if replacement.html.is_empty() {
            return Ok(self.cut_mention(tag, change));
        }

        if change.is_empty() && change.start == tag.plain.end {
            return Ok(TagEdit {
                html: format!("{}{}", self.outer_html(tag), replacement.html),
                selection: None,
            });
        }
        log::debug!("typing inside mention {:?} replaces it", tag.id);
        Ok(TagEdit {
            html: replacement.html.to_string(),
            selection: Some(tag.plain.start + replacement.plain_len),
        })
    }

    /// Deletes `range` (within the tag's plain span) from `tag`.
    fn remove_range(&self, tag: &TagNode, range: Span) -> Result<TagEdit, PatchError> {
        if tag.is_mention() {
            Ok(self.cut_mention(tag, range))
        } else {
            self.edit_element(tag, range, Replacement::NONE)
        }
    }

    /// Re-runs the walk over an element's content and rewraps the result in
    /// the original open and close tags.
    fn edit_element(&self, tag: &TagNode, change: Span, replacement: Replacement<'_>) -> Result<TagEdit, PatchError> {
        let inner = self.patch_level(Level::content_of(tag), change, replacement)?;
        Ok(TagEdit {
            html: format!("{}{}{}", self.open_html(tag), inner.html, self.close_html(tag)),
            selection: inner.new_selection,
        })
    }

    fn cut_mention(&self, tag: &TagNode, deleted: Span) -> TagEdit {
        let projection = slice_chars(self.old_text, tag.plain);
        let local = Span::new(
            deleted.start.saturating_sub(tag.plain.start),
            deleted.end.saturating_sub(tag.plain.start),
        );
        match mention_cut(projection, local) {
            MentionCut::Whole => {
                log::debug!("deleting mention {:?}", tag.id);
                TagEdit {
                    html: String::new(),
                    selection: Some(tag.plain.start),
                }
            }
            MentionCut::Words(cut) => {
                let content = tag.content_span();
                let kept = content_after_cut(
                    &self.html[content.start..content.end],
                    cut,
                    char_len(self.trigger),
                );
                log::debug!("mention {:?} trimmed to {kept:?}", tag.id);
                TagEdit {
                    html: format!("{}{kept}{}", self.open_html(tag), self.close_html(tag)),
                    selection: Some(tag.plain.start + cut.start),
                }
            }
        }
    }

    fn open_html(&self, tag: &TagNode) -> &'a str {
        &self.html[tag.open_tag.start..tag.open_tag.end]
    }

    fn close_html(&self, tag: &TagNode) -> &'a str {
        tag.close_tag.map_or("", |c| &self.html[c.start..c.end])
    }

    fn outer_html(&self, tag: &TagNode) -> &'a str {
        let outer = tag.outer_span();
        &self.html[outer.start..outer.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        editing::diff::{Selection, locate},
        parsing::parse,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const HTML: &str = r#"Hello <mention id="1">Patricia Adams</mention>!"#;

    fn edit(html: &str, new_text: &str, previous: Selection, current: Selection) -> Patch {
        let parsed = parse(html, "@").unwrap();
        let diff = locate(&parsed.plain_text, new_text, previous, current);
        patch(
            html,
            &parsed.plain_text,
            new_text,
            &parsed.tags,
            diff,
            diff.change_text(new_text),
            "@",
        )
        .unwrap()
    }

    fn expect(html: &str, new_selection: Option<usize>) -> Patch {
        Patch {
            html: html.to_string(),
            new_selection,
        }
    }

    #[rstest]
    #[case(Span::new(0, 4), Span::new(6, 9), Overlap::EditBefore)]
    #[case(Span::new(6, 6), Span::new(6, 9), Overlap::EditBefore)]
    #[case(Span::new(6, 8), Span::new(1, 6), Overlap::TagBefore)]
    #[case(Span::new(6, 6), Span::new(1, 6), Overlap::Inside)]
    #[case(Span::new(1, 6), Span::new(1, 6), Overlap::Coincides)]
    #[case(Span::new(3, 5), Span::new(2, 6), Overlap::Inside)]
    #[case(Span::new(0, 4), Span::new(2, 6), Overlap::SpansIn)]
    #[case(Span::new(4, 9), Span::new(2, 6), Overlap::SpansOut)]
    #[case(Span::new(2, 9), Span::new(2, 6), Overlap::SpansOut)]
    #[case(Span::new(1, 7), Span::new(2, 6), Overlap::Engulfs)]
    #[case(Span::new(0, 6), Span::new(2, 6), Overlap::Engulfs)]
    fn classify_table(#[case] change: Span, #[case] tag: Span, #[case] expected: Overlap) {
        assert_eq!(Overlap::classify(tag, change), expected);
    }

    #[rstest]
    #[case(Span::new(3, 3), Span::new(3, 3), Overlap::TagBefore)]
    #[case(Span::new(1, 2), Span::new(3, 3), Overlap::EditBefore)]
    #[case(Span::new(1, 5), Span::new(3, 3), Overlap::Engulfs)]
    fn classify_empty_tags(#[case] change: Span, #[case] tag: Span, #[case] expected: Overlap) {
        assert_eq!(Overlap::classify(tag, change), expected);
    }

    #[test]
    fn append_after_mention_keeps_it() {
        let html = r#"Hello <mention id="1">everyone</mention>!"#;
        let got = edit(html, "Hello @everyone!!", Selection::caret(16), Selection::caret(17));
        assert_eq!(got, expect(r#"Hello <mention id="1">everyone</mention>!!"#, None));
    }

    #[test]
    fn deleting_trigger_drops_first_word() {
        let got = edit(HTML, "Hello Patricia Adams!", Selection::new(6, 7), Selection::caret(6));
        assert_eq!(got, expect(r#"Hello <mention id="1">Adams</mention>!"#, Some(6)));
    }

    #[test]
    fn typing_inside_mention_replaces_it() {
        let got = edit(HTML, "Hello @Patriciad Adams!", Selection::caret(15), Selection::caret(16));
        assert_eq!(got, expect("Hello d!", Some(7)));
    }

    #[test]
    fn insert_before_mention() {
        let got = edit(HTML, "Hello X@Patricia Adams!", Selection::caret(6), Selection::caret(7));
        assert_eq!(got, expect(r#"Hello X<mention id="1">Patricia Adams</mention>!"#, None));
    }

    #[test]
    fn insert_right_after_mention() {
        let got = edit(HTML, "Hello @Patricia Adams,!", Selection::caret(21), Selection::caret(22));
        assert_eq!(got, expect(r#"Hello <mention id="1">Patricia Adams</mention>,!"#, None));
    }

    #[test]
    fn backspace_in_last_word_drops_it() {
        let got = edit(HTML, "Hello @Patricia Adam!", Selection::caret(21), Selection::caret(20));
        assert_eq!(got, expect(r#"Hello <mention id="1">Patricia</mention>!"#, Some(15)));
    }

    #[test]
    fn backspace_in_single_word_mention_removes_it() {
        let html = r#"Hi <mention id="2">Bo</mention>."#;
        let got = edit(html, "Hi @B.", Selection::caret(6), Selection::caret(5));
        assert_eq!(got, expect("Hi .", Some(3)));
    }

    #[test]
    fn deleting_exact_mention_selection() {
        let got = edit(HTML, "Hello !", Selection::new(6, 21), Selection::caret(6));
        assert_eq!(got, expect("Hello !", Some(6)));
    }

    #[test]
    fn replacing_exact_mention_selection() {
        let got = edit(HTML, "Hello you!", Selection::new(6, 21), Selection::caret(9));
        assert_eq!(got, expect("Hello you!", Some(9)));
    }

    #[test]
    fn deletion_spanning_into_mention() {
        let got = edit(HTML, "Helricia Adams!", Selection::new(3, 10), Selection::caret(3));
        assert_eq!(got, expect(r#"Hel<mention id="1">Adams</mention>!"#, None));
    }

    #[test]
    fn replacement_spanning_out_of_mention() {
        let got = edit(HTML, "Hello @Patricia x", Selection::new(16, 22), Selection::caret(17));
        assert_eq!(got, expect(r#"Hello <mention id="1">Patricia</mention>x"#, Some(16)));
    }

    #[test]
    fn replacement_engulfing_tags() {
        let html = r#"a <b>bold</b> c <mention id="1">Al</mention> d"#;
        let got = edit(html, "aZd", Selection::new(1, 13), Selection::caret(2));
        assert_eq!(got, expect("aZd", None));
    }

    #[test]
    fn nested_element_edit_recurses() {
        let html = "<p>Hi <b>there</b></p>";
        let got = edit(html, "Hi there!", Selection::caret(8), Selection::caret(9));
        assert_eq!(got, expect("<p>Hi <b>there!</b></p>", None));
    }

    #[test]
    fn multibyte_text_around_tags() {
        let html = "<i>Zoë</i> ça";
        let got = edit(html, "Zoë ça va", Selection::caret(6), Selection::caret(9));
        assert_eq!(got, expect("<i>Zoë</i> ça va", None));
    }

    #[test]
    fn insert_after_self_closing_tag() {
        let got = edit("a<br/>b", "aXb", Selection::caret(1), Selection::caret(2));
        assert_eq!(got, expect("a<br/>Xb", None));
    }

    #[test]
    fn delete_across_self_closing_tag() {
        let got = edit("xa<br/>by", "xy", Selection::new(1, 3), Selection::caret(1));
        assert_eq!(got, expect("xy", None));
    }

    #[test]
    fn no_change_returns_html_verbatim() {
        let got = edit(HTML, "Hello @Patricia Adams!", Selection::caret(3), Selection::caret(3));
        assert_eq!(got, expect(HTML, None));
    }

    #[test]
    fn no_tags_keeps_references_outside_the_change() {
        let got = edit("a &amp; b&#39;", "a & bc'", Selection::caret(5), Selection::caret(6));
        assert_eq!(got, expect("a &amp; bc&#39;", None));
    }

    #[test]
    fn typed_markup_is_escaped() {
        let got = edit("Hi ", "Hi <div>", Selection::caret(3), Selection::caret(8));
        assert_eq!(got, expect("Hi &lt;div&gt;", None));

        let got = edit(HTML, "Hello @Patricia Adams</b>!", Selection::caret(21), Selection::caret(25));
        assert_eq!(
            got,
            expect(r#"Hello <mention id="1">Patricia Adams</mention>&lt;/b&gt;!"#, None)
        );
    }

    #[test]
    fn typing_an_ampersand_next_to_a_reference() {
        let got = edit("x &lt; y", "x &< y", Selection::caret(2), Selection::caret(3));
        assert_eq!(got, expect("x &amp;&lt; y", None));
    }

    #[test]
    fn replacing_mention_with_markup_counts_plain_chars() {
        let got = edit(HTML, "Hello <i>!", Selection::new(6, 21), Selection::caret(9));
        assert_eq!(got, expect("Hello &lt;i&gt;!", Some(9)));
    }

    #[test]
    fn word_cut_keeps_markup_inside_mention() {
        let html = r#"<mention id="3"><b>Al</b> Bo &amp; Co</mention>!"#;
        let got = edit(html, "@Al Bo & C!", Selection::caret(11), Selection::caret(10));
        assert_eq!(got, expect(r#"<mention id="3"><b>Al</b> Bo &amp;</mention>!"#, Some(8)));
    }

    #[test]
    fn whole_text_replacement_drops_markup() {
        let got = edit(HTML, "new", Selection::new(0, 22), Selection::caret(3));
        assert_eq!(got, expect("new", None));

        let got = edit(HTML, "<b>", Selection::new(0, 22), Selection::caret(3));
        assert_eq!(got, expect("&lt;b&gt;", None));
    }

    #[test]
    fn diff_out_of_range_is_rejected() {
        let parsed = parse(HTML, "@").unwrap();
        let diff = DiffRegion {
            change_start: 20,
            old_change_end: 40,
            new_change_end: 20,
        };
        let err = patch(HTML, &parsed.plain_text, "x", &parsed.tags, diff, "", "@").unwrap_err();
        assert!(matches!(err, PatchError::InvariantViolation(_)));
    }

    #[test]
    fn tags_out_of_order_are_rejected() {
        let html = "<b>x</b> <i>y</i>!";
        let mut parsed = parse(html, "@").unwrap();
        parsed.tags.roots.reverse();
        let diff = DiffRegion {
            change_start: 4,
            old_change_end: 4,
            new_change_end: 5,
        };
        let err = patch(html, &parsed.plain_text, "x y!?", &parsed.tags, diff, "?", "@").unwrap_err();
        assert!(matches!(err, PatchError::InvariantViolation(_)));
    }

    #[test]
    fn splice_markup_inserts_raw_tag() {
        let html = "Hi @pa there";
        let parsed = parse(html, "@").unwrap();
        let markup = r#"<mention id="7">Pat</mention> "#;
        let got = splice_markup(html, &parsed.plain_text, &parsed.tags, Span::new(3, 6), markup, 5, "@").unwrap();
        assert_eq!(got.html, r#"Hi <mention id="7">Pat</mention>  there"#);
    }

    #[test]
    fn splice_markup_rejects_bad_range() {
        let parsed = parse(HTML, "@").unwrap();
        let err = splice_markup(HTML, &parsed.plain_text, &parsed.tags, Span::new(5, 99), "x", 1, "@").unwrap_err();
        assert!(matches!(err, PatchError::InvariantViolation(_)));
    }
}
