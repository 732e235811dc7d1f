//! Word-level deletion inside a mention's display text.

use crate::{
    parsing::{cursor::Cursor, tokenizer::next_tag},
    text::{Span, html_char},
};

/// Whitespace-delimited words of `text`, as char spans.
pub fn word_spans(text: &str) -> Vec<Span> {
    let mut words = vec![];
    let mut start = None;
    let mut len = 0;
    for (i, c) in text.chars().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                words.push(Span::new(s, i));
                start = None;
            }
            _ => {}
        }
        len = i + 1;
    }
    if let Some(s) = start {
        words.push(Span::new(s, len));
    }
    words
}

/// How a deletion inside a mention affects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionCut {
    /// Every word was touched: the mention goes away.
    Whole,
    /// Remove this range of the projection (chars, relative to the trigger).
    Words(Span),
}

/// Expands a deletion of `deleted` (relative to the mention's projection) to
/// whole words.
///
/// The removed range takes the whitespace after the last touched word, or the
/// whitespace before the first one when nothing follows. A deletion that
/// touches no word (only whitespace) takes the word before it.
pub fn mention_cut(projection: &str, deleted: Span) -> MentionCut {
    let words = word_spans(projection);
    let mut touched = (0..words.len()).filter(|&i| words[i].intersects(deleted));
    let first = touched.next();
    let last = touched.last().or(first);

    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => match words.iter().rposition(|w| w.end <= deleted.start) {
            Some(i) => (i, i),
            None if !words.is_empty() => (0, 0),
            None => return MentionCut::Whole,
        },
    };
    if first == 0 && last + 1 == words.len() {
        return MentionCut::Whole;
    }

    let mut cut = Span::new(words[first].start, words[last].end);
    if last + 1 < words.len() {
        cut.end = words[last + 1].start;
    } else {
        cut.start = words[first - 1].end;
    }
    MentionCut::Words(cut)
}

/// The mention content left once `cut` is removed from its projection.
///
/// `cut` is relative to the projection, whose first `trigger_len` chars are
/// the trigger and not in `content`. Only text is removed: tags inside the
/// content and the spelling of character references that survive are kept.
pub fn content_after_cut(content: &str, cut: Span, trigger_len: usize) -> String {
    let cut = Span::new(
        cut.start.saturating_sub(trigger_len),
        cut.end.saturating_sub(trigger_len),
    );
    let mut out = String::with_capacity(content.len());
    let mut cur = Cursor::new(content);
    let mut pos = 0;
    let mut plain = 0;

    loop {
        let token = next_tag(&mut cur);
        let text_end = token.as_ref().map_or(content.len(), |t| t.span.start);
        while let Some((_, len)) = html_char(&content[pos..text_end]) {
            if !(cut.start..cut.end).contains(&plain) {
                out.push_str(&content[pos..pos + len]);
            }
            plain += 1;
            pos += len;
        }
        match token {
            Some(token) => {
                out.push_str(token.text);
                pos = token.span.end;
            }
            None => return out,
        }
    }
}
