use mention_sync_config::Config;
use serde::Serialize;

use crate::text::{Span, char_len, html_char};

use super::{
    cursor::Cursor,
    error::MarkupError,
    kinds::Mention,
    tag::{TagForest, TagId, TagKind, TagNode},
    tokenizer::{TagToken, TagTokenKind, next_tag},
};

/// Default bound on open-tag nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Inserted into the projection before every mention's content.
    pub trigger: String,
    /// Lowercase element name treated as a mention.
    pub mention_tag: String,
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn new(trigger: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            mention_tag: Mention::TAG.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new(Mention::TRIGGER)
    }
}

impl From<&Config> for ParseOptions {
    fn from(config: &Config) -> Self {
        Self {
            trigger: config.trigger.clone(),
            mention_tag: config.mention_tag.to_ascii_lowercase(),
            max_depth: config.max_nesting_depth,
        }
    }
}

/// The tag forest plus the plain-text projection it was measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub tags: TagForest,
    pub plain_text: String,
}

impl ParseResult {
    /// Ids of every mention in document order. Mentions without an id are skipped.
    pub fn mention_ids(&self) -> Vec<&str> {
        self.tags.mentions().filter_map(TagNode::mention_id).collect()
    }
}

/// Parses `html` with the default mention tag and nesting bound.
pub fn parse(html: &str, trigger: &str) -> Result<ParseResult, MarkupError> {
    parse_with(html, &ParseOptions::new(trigger))
}

/// Parses `html` into a tag forest and its plain-text projection.
///
/// A close tag with nothing open, or an open tag never closed, is text.
///
/// # Errors
/// Returns [`MarkupError`] for a close tag that does not match the innermost
/// open tag and for nesting deeper than `options.max_depth`.
pub fn parse_with(html: &str, options: &ParseOptions) -> Result<ParseResult, MarkupError> {
    TagParser::new(html, options).run()
}

/// The tags of `html` that take part in its structure, in document order.
///
/// Pairs close tags with open tags on a stack. A close tag with nothing open
/// and an open tag still unclosed at the end are dropped, leaving them text.
fn structural_tags(html: &str) -> Result<Vec<TagToken<'_>>, MarkupError> {
    let mut cur = Cursor::new(html);
    let mut tokens: Vec<TagToken<'_>> = vec![];
    let mut keep = vec![];
    let mut open: Vec<usize> = vec![];

    while let Some(token) = next_tag(&mut cur) {
        let paired = match token.kind {
            TagTokenKind::SelfClosing => true,
            TagTokenKind::Open => {
                open.push(tokens.len());
                false
            }
            TagTokenKind::Close => match open.pop() {
                Some(o) if tokens[o].name == token.name => {
                    keep[o] = true;
                    true
                }
                Some(o) => {
                    return Err(MarkupError::TagMismatch {
                        expected: tokens[o].name.clone(),
                        found: token.name,
                        offset: token.span.start,
                    });
                }
                None => {
                    log::trace!("unmatched close tag at byte {} kept as text", token.span.start);
                    false
                }
            },
        };
        keep.push(paired);
        tokens.push(token);
    }

    Ok(tokens
        .into_iter()
        .zip(keep)
        .filter_map(|(token, paired)| paired.then_some(token))
        .collect())
}

struct OpenFrame {
    open: Span,
    /// `None` for tags nested inside a mention; they are matched but not recorded.
    node: Option<TagId>,
    /// Whether this frame contributes to `mention_depth`.
    in_mention: bool,
}

struct TagParser<'a> {
    html: &'a str,
    options: &'a ParseOptions,
    plain: String,
    plain_len: usize,
    nodes: Vec<TagNode>,
    roots: Vec<TagId>,
    stack: Vec<OpenFrame>,
    /// Number of open frames at or below a mention.
    mention_depth: usize,
}

impl<'a> TagParser<'a> {
    fn new(html: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            html,
            options,
            plain: String::with_capacity(html.len()),
            plain_len: 0,
            nodes: vec![],
            roots: vec![],
            stack: vec![],
            mention_depth: 0,
        }
    }

    fn run(mut self) -> Result<ParseResult, MarkupError> {
        let mut text_start = 0;
        for token in structural_tags(self.html)? {
            self.push_text(text_start, token.span.start);
            match token.kind {
                TagTokenKind::Open => self.open(&token)?,
                TagTokenKind::Close => self.close(&token),
                TagTokenKind::SelfClosing => self.self_closing(&token),
            }
            text_start = token.span.end;
        }
        self.push_text(text_start, self.html.len());

        log::trace!(
            "parsed {} tags into {} plain chars",
            self.nodes.len(),
            self.plain_len
        );
        Ok(ParseResult {
            tags: TagForest::new(self.nodes, self.roots),
            plain_text: self.plain,
        })
    }

    fn push_text(&mut self, start: usize, end: usize) {
        let mut rest = &self.html[start..end];
        while let Some((c, len)) = html_char(rest) {
            self.plain.push(c);
            self.plain_len += 1;
            rest = &rest[len..];
        }
    }

    fn kind_of(&self, name: &str) -> TagKind {
        if name == self.options.mention_tag {
            TagKind::Mention
        } else {
            TagKind::Element
        }
    }

    /// Records a node for `token` under the innermost recorded frame.
    fn add_node(&mut self, token: &TagToken<'_>, kind: TagKind) -> TagId {
        let id = TagId(self.nodes.len());
        let plain_start = self.plain_len;
        if kind == TagKind::Mention {
            self.plain.push_str(&self.options.trigger);
            self.plain_len += char_len(&self.options.trigger);
        }

        match self.stack.last().and_then(|frame| frame.node) {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(TagNode {
            id,
            tag_type: token.name.clone(),
            kind,
            open_tag_text: token.text.to_string(),
            open_tag: token.span,
            close_tag: None,
            content: None,
            children: vec![],
            plain: Span::new(plain_start, self.plain_len),
        });
        id
    }

    fn open(&mut self, token: &TagToken<'_>) -> Result<(), MarkupError> {
        if self.stack.len() >= self.options.max_depth {
            return Err(MarkupError::NestingTooDeep {
                limit: self.options.max_depth,
                offset: token.span.start,
            });
        }

        let kind = self.kind_of(&token.name);
        let recorded = self.mention_depth == 0;
        let node = recorded.then(|| self.add_node(token, kind));
        let in_mention = !recorded || kind == TagKind::Mention;
        if in_mention {
            self.mention_depth += 1;
        }

        self.stack.push(OpenFrame {
            open: token.span,
            node,
            in_mention,
        });
        Ok(())
    }

    /// `token` is known to close the innermost frame.
    fn close(&mut self, token: &TagToken<'_>) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if frame.in_mention {
            self.mention_depth -= 1;
        }

        if let Some(id) = frame.node {
            let content = self.html[frame.open.end..token.span.start].to_string();
            let node = &mut self.nodes[id.0];
            node.close_tag = Some(token.span);
            node.content = Some(content);
            node.plain.end = self.plain_len;
        }
    }

    fn self_closing(&mut self, token: &TagToken<'_>) {
        if self.mention_depth > 0 {
            return;
        }
        let kind = self.kind_of(&token.name);
        self.add_node(token, kind);
    }
}
