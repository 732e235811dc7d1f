//! Mention-aware caret and selection boundaries.
//!
//! A mention is one token for navigation: the caret may sit at its edges or
//! between its words, never mid-word.

use crate::{
    parsing::{TagForest, TagId, TagNode},
    text::Span,
};

/// Clamps `value` into `[min, max]`. `None` means "no selection" and stays `None`.
pub fn clamp_index(min: usize, max: usize, value: Option<usize>) -> Option<usize> {
    value.map(|v| v.max(min).min(max))
}

/// Finds the mention whose plain span covers `offset` (ends inclusive).
///
/// Ordinary elements are transparent: their children are searched before
/// later siblings so the innermost covering mention wins.
pub fn find_enclosing_mention_tag(forest: &TagForest, offset: usize) -> Option<&TagNode> {
    let first = forest.roots().first()?;
    if offset < forest.get(*first).plain.start {
        return None;
    }

    let mut stack: Vec<TagId> = forest.roots().iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let node = forest.get(id);
        if !node.plain.touches(offset) {
            continue;
        }
        if node.is_mention() {
            return Some(node);
        }
        stack.extend(node.children.iter().rev().copied());
    }
    None
}

/// The editable range around a selection.
///
/// A selection touching a mention grows to cover the whole mention, however
/// many words its display text has. Otherwise the range grows to the
/// surrounding whitespace-delimited word.
pub fn word_range_around_selection(
    selection_start: usize,
    selection_end: Option<usize>,
    text: &str,
    tag: Option<&TagNode>,
) -> Span {
    let end = selection_end.unwrap_or(selection_start);
    let (start, end) = (selection_start.min(end), selection_start.max(end));

    if let Some(tag) = tag.filter(|t| t.is_mention()) {
        if start <= tag.plain.end && end >= tag.plain.start {
            return Span::new(start.min(tag.plain.start), end.max(tag.plain.end));
        }
    }

    let chars: Vec<char> = text.chars().collect();
    let end = end.min(chars.len());
    let start = start.min(end);

    let mut word_start = start;
    while word_start > 0 && !chars[word_start - 1].is_whitespace() {
        word_start -= 1;
    }
    let mut word_end = end;
    while word_end < chars.len() && !chars[word_end].is_whitespace() {
        word_end += 1;
    }
    Span::new(word_start, word_end)
}

/// Where the caret should land after moving from `previous_index` to
/// `current_index` into `tag`.
///
/// Moving left snaps back to the previous space inside the mention (or its
/// start); moving right snaps forward to the next space (or its end). Carets
/// on the mention's edges, outside it, or not moving are left alone.
pub fn resolve_caret_after_mention_traversal(
    tag: &TagNode,
    text: &str,
    current_index: usize,
    previous_index: usize,
) -> usize {
    if current_index == previous_index
        || !tag.is_mention()
        || !tag.plain.strictly_contains(current_index)
    {
        return current_index;
    }

    let chars: Vec<char> = text.chars().collect();
    let lo = tag.plain.start;
    let hi = tag.plain.end.min(chars.len());
    let is_space = |i: &usize| chars[*i].is_whitespace();

    let target = if current_index < previous_index {
        (lo..current_index.min(hi)).rev().find(is_space).unwrap_or(lo)
    } else {
        (current_index..hi).find(is_space).unwrap_or(hi)
    };
    clamp_index(lo, tag.plain.end, Some(target)).unwrap_or(current_index)
}
