use std::sync::LazyLock;

use regex::Regex;

use crate::text::Span;

use super::{cursor::Cursor, kinds::Markup};

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][-A-Za-z0-9_:.]*").expect("valid tag name regex"));

/// Zero or more `name="value"` pairs, nothing else.
static ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:\s+[A-Za-z_:][-A-Za-z0-9_:.]*\s*=\s*"[^"]*")*\s*$"#)
        .expect("valid attribute list regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTokenKind {
    /// `<tag ...>`
    Open,
    /// `</tag>`
    Close,
    /// `<tag .../>`
    SelfClosing,
}

/// One recognised `<...>` construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken<'a> {
    pub kind: TagTokenKind,
    /// Lowercased tag name.
    pub name: String,
    /// Byte span from `<` through `>`.
    pub span: Span,
    /// Verbatim source text of the construct.
    pub text: &'a str,
}

/// Advances `cur` past the next recognisable tag and returns it.
///
/// Bracket scan: the first `<`, then the first `>` after it. A candidate that
/// does not classify as a tag is text; scanning resumes one byte after its `<`.
/// Returns `None` (with the cursor at end of input) once no tag remains.
pub fn next_tag<'a>(cur: &mut Cursor<'a>) -> Option<TagToken<'a>> {
    loop {
        let Some(lt) = cur.find_from(cur.pos(), Markup::OPEN) else {
            cur.finish();
            return None;
        };
        let Some(gt) = cur.find_from(lt + 1, Markup::CLOSE) else {
            cur.finish();
            return None;
        };

        let text = &cur.s[lt..=gt];
        if let Some((kind, name)) = classify(text) {
            cur.seek(gt + 1);
            return Some(TagToken {
                kind,
                name,
                span: Span::new(lt, gt + 1),
                text,
            });
        }
        cur.seek(lt + 1);
    }
}

/// Classifies a `<...>` candidate by its first and second-to-last bytes.
///
/// Returns `None` for anything that is not a well-formed tag.
pub fn classify(text: &str) -> Option<(TagTokenKind, String)> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != Markup::OPEN || bytes[bytes.len() - 1] != Markup::CLOSE {
        return None;
    }
    let inner = &text[1..text.len() - 1];

    if bytes[1] == Markup::SLASH {
        let name = inner[1..].trim_end();
        let m = TAG_NAME.find(name)?;
        return (m.end() == name.len()).then(|| (TagTokenKind::Close, name.to_ascii_lowercase()));
    }

    let (kind, body) = if bytes[bytes.len() - 2] == Markup::SLASH {
        (TagTokenKind::SelfClosing, &inner[..inner.len() - 1])
    } else {
        (TagTokenKind::Open, inner)
    };
    let m = TAG_NAME.find(body)?;
    ATTRIBUTES
        .is_match(&body[m.end()..])
        .then(|| (kind, m.as_str().to_ascii_lowercase()))
}
