/// Markup the parser refuses to guess about.
///
/// Text that merely contains `<` or `>`, and tags with no partner, pass
/// through as plain text. Only a close tag naming the wrong element is
/// malformed, plus nesting past the configured bound.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("close tag </{found}> at byte {offset} does not match open tag <{expected}>")]
    TagMismatch {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("tag at byte {offset} nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize, offset: usize },
}
