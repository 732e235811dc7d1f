use mention_sync_config::Config;
use serde::Serialize;

use crate::{
    error::EngineError,
    parsing::{ParseOptions, ParseResult, TagForest, parse_with},
    text::{Span, char_len},
};

use super::{
    boundary::{find_enclosing_mention_tag, resolve_caret_after_mention_traversal, word_range_around_selection},
    diff::{DiffRegion, Selection, locate},
    format::render_tag_html,
    patch::{patch, splice_markup},
    query::{MentionQuery, find_mention_query},
};

/// What the host needs after an edit: the text to show and where the caret goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub diff: DiffRegion,
    pub plain_text: String,
    pub selection: Selection,
    /// Incremented on every accepted content change.
    pub version: u64,
}

/// The durable HTML of one text input and the per-keystroke edit cycle over it.
///
/// Every change is locate, patch, re-parse. A failed cycle leaves the session
/// as it was.
#[derive(Debug, Clone)]
pub struct EditorSession {
    config: Config,
    options: ParseOptions,
    html: String,
    parsed: ParseResult,
    selection: Selection,
    version: u64,
}

impl EditorSession {
    /// Starts a session over `html` with the caret at the end.
    ///
    /// # Errors
    /// Invalid `config`, or `html` that does not parse.
    pub fn new(html: impl Into<String>, config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        let html = html.into();
        let options = ParseOptions::from(&config);
        let parsed = parse_with(&html, &options)?;
        let caret = char_len(&parsed.plain_text);
        Ok(Self {
            config,
            options,
            html,
            parsed,
            selection: Selection::caret(caret),
            version: 0,
        })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn plain_text(&self) -> &str {
        &self.parsed.plain_text
    }

    pub fn tags(&self) -> &TagForest {
        &self.parsed.tags
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mention_ids(&self) -> Vec<&str> {
        self.parsed.mention_ids()
    }

    /// Replaces the content wholesale, e.g. when the host loads a draft.
    pub fn reset(&mut self, html: impl Into<String>) -> Result<(), EngineError> {
        let html = html.into();
        let parsed = parse_with(&html, &self.options).map_err(|e| self.reject(e))?;
        self.selection = Selection::caret(char_len(&parsed.plain_text));
        self.html = html;
        self.parsed = parsed;
        self.version += 1;
        Ok(())
    }

    /// Brings the HTML in line with `new_text`, the input's content after a
    /// keystroke, with `selection` the selection it reports now.
    ///
    /// If the text did not change only the selection is updated, snapped so
    /// it never ends mid-mention.
    ///
    /// # Errors
    /// Any error leaves the session unchanged.
    pub fn apply_text_change(
        &mut self,
        new_text: &str,
        selection: Selection,
    ) -> Result<EditOutcome, EngineError> {
        let old_text = self.parsed.plain_text.as_str();
        let diff = locate(old_text, new_text, self.selection, selection);

        if new_text == old_text {
            self.settle_selection(selection);
            return Ok(self.outcome(diff));
        }

        let patched = patch(
            &self.html,
            old_text,
            new_text,
            &self.parsed.tags,
            diff,
            diff.change_text(new_text),
            &self.options.trigger,
        )
        .map_err(|e| self.reject(e))?;
        let parsed = parse_with(&patched.html, &self.options).map_err(|e| self.reject(e))?;

        let caret = patched
            .new_selection
            .or(selection.head())
            .unwrap_or(diff.new_change_end)
            .min(char_len(&parsed.plain_text));
        Ok(self.commit(patched.html, parsed, caret, diff))
    }

    /// Moves the caret, snapping it out of the middle of mention words.
    /// Returns where it landed.
    pub fn move_caret(&mut self, caret: usize) -> usize {
        let caret = caret.min(char_len(&self.parsed.plain_text));
        let previous = self.selection.head().unwrap_or(caret);
        let resolved = match find_enclosing_mention_tag(&self.parsed.tags, caret) {
            Some(tag) => {
                resolve_caret_after_mention_traversal(tag, &self.parsed.plain_text, caret, previous)
            }
            None => caret,
        };
        self.selection = Selection::caret(resolved);
        resolved
    }

    /// Selects the word at `offset`, or the whole mention if it is on one.
    pub fn select_word_at(&mut self, offset: usize) -> Span {
        let tag = find_enclosing_mention_tag(&self.parsed.tags, offset);
        let range = word_range_around_selection(offset, None, &self.parsed.plain_text, tag);
        self.selection = Selection::new(range.start, range.end);
        range
    }

    /// The mention being typed at the caret, if any. Text that is already
    /// part of a mention never counts.
    pub fn active_mention_query(&self) -> Option<MentionQuery> {
        if !self.selection.is_collapsed() {
            return None;
        }
        let caret = self.selection.head()?;
        let in_mention = find_enclosing_mention_tag(&self.parsed.tags, caret)
            .is_some_and(|tag| tag.plain.start < caret);
        if in_mention {
            return None;
        }
        find_mention_query(&self.parsed.plain_text, caret, &self.options.trigger)
    }

    /// Inserts a mention of `id` followed by a space.
    ///
    /// Replaces the active query (`@pa` becomes the mention) or the selected
    /// range; otherwise inserts at the caret, moved to the end of any mention
    /// it is inside. The caret ends up after the space.
    pub fn insert_mention(&mut self, id: &str, display_text: &str) -> Result<EditOutcome, EngineError> {
        let markup = format!(
            "{} ",
            render_tag_html(
                &self.options.mention_tag,
                id,
                display_text,
                &self.config.empty_mention_placeholder,
            )
        );
        let markup_plain = parse_with(&markup, &self.options).map_err(|e| self.reject(e))?;
        let range = self.insertion_range();
        log::debug!("inserting mention {id:?} at {range:?}");

        let old_text = self.parsed.plain_text.as_str();
        let patched = splice_markup(
            &self.html,
            old_text,
            &self.parsed.tags,
            range,
            &markup,
            char_len(&markup_plain.plain_text),
            &self.options.trigger,
        )
        .map_err(|e| self.reject(e))?;
        let parsed = parse_with(&patched.html, &self.options).map_err(|e| self.reject(e))?;

        let caret = parsed
            .tags
            .mentions()
            .find(|tag| tag.plain.start == range.start)
            .map_or(range.start, |tag| tag.plain.end + 1);
        let diff = DiffRegion {
            change_start: range.start,
            old_change_end: range.end,
            new_change_end: caret,
        };
        Ok(self.commit(patched.html, parsed, caret, diff))
    }

    fn insertion_range(&self) -> Span {
        if let Some(query) = self.active_mention_query() {
            return query.range(&self.options.trigger);
        }
        if let Some(span) = self.selection.span().filter(|s| !s.is_empty()) {
            return self.snap_range(span);
        }

        let len = char_len(&self.parsed.plain_text);
        let caret = self.selection.head().unwrap_or(len).min(len);
        let caret = match find_enclosing_mention_tag(&self.parsed.tags, caret) {
            Some(tag) if tag.plain.strictly_contains(caret) => tag.plain.end,
            _ => caret,
        };
        Span::new(caret, caret)
    }

    /// Widens a range so neither end is inside a mention.
    fn snap_range(&self, span: Span) -> Span {
        let tags = &self.parsed.tags;
        let start = find_enclosing_mention_tag(tags, span.start)
            .filter(|tag| tag.plain.strictly_contains(span.start))
            .map_or(span.start, |tag| tag.plain.start);
        let end = find_enclosing_mention_tag(tags, span.end)
            .filter(|tag| tag.plain.strictly_contains(span.end))
            .map_or(span.end, |tag| tag.plain.end);
        Span::new(start, end)
    }

    fn settle_selection(&mut self, selection: Selection) {
        match (selection.start, selection.end) {
            (Some(a), Some(b)) if a != b => {
                let len = char_len(&self.parsed.plain_text);
                let span = self.snap_range(Span::new(a.min(b).min(len), a.max(b).min(len)));
                self.selection = Selection::new(span.start, span.end);
            }
            _ => match selection.head() {
                Some(caret) => {
                    self.move_caret(caret);
                }
                None => self.selection = selection,
            },
        }
    }

    fn commit(&mut self, html: String, parsed: ParseResult, caret: usize, diff: DiffRegion) -> EditOutcome {
        self.html = html;
        self.parsed = parsed;
        self.selection = Selection::caret(caret);
        self.version += 1;
        log::debug!(
            "version {}: {} chars, {} tags, caret {caret}",
            self.version,
            char_len(&self.parsed.plain_text),
            self.parsed.tags.len()
        );
        self.outcome(diff)
    }

    fn outcome(&self, diff: DiffRegion) -> EditOutcome {
        EditOutcome {
            diff,
            plain_text: self.parsed.plain_text.clone(),
            selection: self.selection,
            version: self.version,
        }
    }

    fn reject(&self, err: impl Into<EngineError>) -> EngineError {
        let err = err.into();
        log::warn!("edit rejected at version {}, keeping current content: {err}", self.version);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HTML: &str = r#"Hello <mention id="1">Patricia Adams</mention>!"#;

    fn session(html: &str) -> EditorSession {
        EditorSession::new(html, Config::default()).unwrap()
    }

    #[test]
    fn new_session_puts_caret_at_end() {
        let s = session(HTML);
        assert_eq!(s.plain_text(), "Hello @Patricia Adams!");
        assert_eq!(s.selection(), Selection::caret(22));
        assert_eq!(s.version(), 0);
        assert_eq!(s.mention_ids(), vec!["1"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            trigger: String::new(),
            ..Config::default()
        };
        let err = EditorSession::new("x", config).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn malformed_html_is_rejected() {
        let err = EditorSession::new("<b>x</i>", Config::default()).unwrap_err();
        assert!(matches!(err, EngineError::MalformedMarkup(_)));
    }

    #[test]
    fn typing_updates_html_and_version() {
        let mut s = session(HTML);
        let outcome = s
            .apply_text_change("Hello @Patricia Adams!!", Selection::caret(23))
            .unwrap();
        assert_eq!(s.html(), r#"Hello <mention id="1">Patricia Adams</mention>!!"#);
        assert_eq!(outcome.selection, Selection::caret(23));
        assert_eq!(outcome.version, 1);
    }

    #[test]
    fn typed_markup_stays_text() {
        let mut s = session("Hi ");
        let outcome = s.apply_text_change("Hi <div>", Selection::caret(8)).unwrap();
        assert_eq!(s.html(), "Hi &lt;div&gt;");
        assert_eq!(outcome.plain_text, "Hi <div>");
        assert_eq!(outcome.selection, Selection::caret(8));

        s.apply_text_change("Hi <div></b>", Selection::caret(12)).unwrap();
        assert_eq!(s.html(), "Hi &lt;div&gt;&lt;/b&gt;");
        assert_eq!(s.plain_text(), "Hi <div></b>");
        assert!(s.tags().is_empty());
        assert_eq!(s.version(), 2);
    }

    #[test]
    fn typed_markup_next_to_mentions_stays_text() {
        let mut s = session(r#"Hi <mention id="1">Al</mention> "#);
        let outcome = s.apply_text_change("Hi @Al </b>", Selection::caret(11)).unwrap();
        assert_eq!(s.html(), r#"Hi <mention id="1">Al</mention> &lt;/b&gt;"#);
        assert_eq!(outcome.plain_text, "Hi @Al </b>");

        s.move_caret(0);
        let outcome = s
            .apply_text_change("<div>Hi @Al </b>", Selection::caret(5))
            .unwrap();
        assert_eq!(
            s.html(),
            r#"&lt;div&gt;Hi <mention id="1">Al</mention> &lt;/b&gt;"#
        );
        assert_eq!(outcome.selection, Selection::caret(5));
        assert_eq!(s.mention_ids(), vec!["1"]);
    }

    #[test]
    fn typed_tag_pair_is_not_markup() {
        let mut s = session("");
        s.apply_text_change("<b>x</b>", Selection::caret(8)).unwrap();
        assert_eq!(s.html(), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(s.plain_text(), "<b>x</b>");
        assert!(s.tags().is_empty());
    }

    #[test]
    fn patch_selection_overrides_editor_caret() {
        let mut s = session(HTML);
        s.move_caret(7);
        let outcome = s
            .apply_text_change("Hello Patricia Adams!", Selection::caret(6))
            .unwrap();
        assert_eq!(outcome.plain_text, "Hello @Adams!");
        assert_eq!(outcome.selection, Selection::caret(6));
    }

    #[test]
    fn caret_moves_skip_mention_words() {
        let mut s = session(HTML);
        s.move_caret(6);
        assert_eq!(s.move_caret(7), 15);
        assert_eq!(s.move_caret(16), 21);
        assert_eq!(s.move_caret(20), 15);
    }

    #[test]
    fn unchanged_text_snaps_range_to_mentions() {
        let mut s = session(HTML);
        let outcome = s
            .apply_text_change("Hello @Patricia Adams!", Selection::new(2, 9))
            .unwrap();
        assert_eq!(outcome.selection, Selection::new(2, 21));
        assert_eq!(outcome.version, 0);
    }

    #[test]
    fn select_word_at_mention_selects_it_whole() {
        let mut s = session(HTML);
        assert_eq!(s.select_word_at(10), Span::new(6, 21));
        assert_eq!(s.select_word_at(2), Span::new(0, 5));
    }

    #[test]
    fn query_then_insert_mention() {
        let mut s = session("Hi ");
        s.apply_text_change("Hi @pa", Selection::caret(6)).unwrap();
        assert_eq!(
            s.active_mention_query(),
            Some(MentionQuery {
                trigger_start: 3,
                query: "pa".to_string(),
            })
        );

        let outcome = s.insert_mention("7", "Pat Lee").unwrap();
        assert_eq!(s.html(), r#"Hi <mention id="7">Pat Lee</mention> "#);
        assert_eq!(outcome.plain_text, "Hi @Pat Lee ");
        assert_eq!(outcome.selection, Selection::caret(12));
        assert_eq!(s.active_mention_query(), None);
        assert_eq!(s.mention_ids(), vec!["7"]);
    }

    #[test]
    fn insert_mention_inside_mention_goes_after_it() {
        let mut s = session(HTML);
        s.move_caret(6);
        assert_eq!(s.move_caret(12), 15);
        s.insert_mention("2", "").unwrap();
        assert_eq!(
            s.html(),
            r#"Hello <mention id="1">Patricia Adams</mention><mention id="2">Unknown</mention> !"#
        );
        assert_eq!(s.selection(), Selection::caret(30));
    }

    #[test]
    fn no_query_inside_existing_mention() {
        let mut s = session(r#"<mention id="1">Bo</mention>"#);
        s.move_caret(3);
        assert_eq!(s.active_mention_query(), None);
    }

    #[test]
    fn failed_reset_keeps_state() {
        let mut s = session(HTML);
        s.apply_text_change("Hello @Patricia Adams!?", Selection::caret(23))
            .unwrap();
        let html = s.html().to_string();

        let err = s.reset("<b>broken</i>").unwrap_err();
        assert!(matches!(err, EngineError::MalformedMarkup(_)));
        assert_eq!(s.html(), html);
        assert_eq!(s.version(), 1);
        assert_eq!(s.selection(), Selection::caret(23));
    }

    #[test]
    fn reset_replaces_content() {
        let mut s = session(HTML);
        s.reset("plain").unwrap();
        assert_eq!(s.plain_text(), "plain");
        assert!(s.tags().is_empty());
        assert_eq!(s.selection(), Selection::caret(5));
        assert_eq!(s.version(), 1);
    }
}
