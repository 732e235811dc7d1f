use serde::Serialize;

use crate::text::{Span, char_len, slice_chars};

/// A mention being typed: the trigger and what follows it up to the caret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionQuery {
    /// Char offset of the trigger.
    pub trigger_start: usize,
    /// Text between the trigger and the caret.
    pub query: String,
}

impl MentionQuery {
    /// Plain range from the trigger to the caret, the text a picked mention replaces.
    pub fn range(&self, trigger: &str) -> Span {
        Span::new(
            self.trigger_start,
            self.trigger_start + char_len(trigger) + char_len(&self.query),
        )
    }
}

/// Finds the mention query the caret is at the end of.
///
/// The trigger must start the text or follow whitespace, and nothing between
/// it and the caret may be whitespace. `caret` past the end of `text` finds
/// nothing.
pub fn find_mention_query(text: &str, caret: usize, trigger: &str) -> Option<MentionQuery> {
    if trigger.is_empty() || caret > char_len(text) {
        return None;
    }
    let before = slice_chars(text, Span::new(0, caret));
    let token_start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let query = before[token_start..].strip_prefix(trigger)?;

    Some(MentionQuery {
        trigger_start: char_len(&before[..token_start]),
        query: query.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn query(trigger_start: usize, query: &str) -> Option<MentionQuery> {
        Some(MentionQuery {
            trigger_start,
            query: query.to_string(),
        })
    }

    #[rstest]
    #[case("@", 1, query(0, ""))]
    #[case("hi @pat", 7, query(3, "pat"))]
    #[case("hi @pat", 5, query(3, "p"))]
    #[case("hi @pat x", 9, None)]
    #[case("mail@pat", 8, None)]
    #[case("hi pat", 6, None)]
    #[case("hi @pat", 2, None)]
    #[case("", 0, None)]
    #[case("hi @pat", 99, None)]
    #[case("Zoë\t@é", 6, query(4, "é"))]
    fn detection(#[case] text: &str, #[case] caret: usize, #[case] expected: Option<MentionQuery>) {
        assert_eq!(find_mention_query(text, caret, "@"), expected);
    }

    #[test]
    fn multi_char_trigger() {
        assert_eq!(find_mention_query("a ++bo", 6, "++"), query(2, "bo"));
        assert_eq!(find_mention_query("a +bo", 5, "++"), None);
    }

    #[test]
    fn range_covers_trigger_and_query() {
        let q = find_mention_query("hi @pat", 7, "@").unwrap();
        assert_eq!(q.range("@"), Span::new(3, 7));
    }
}
