pub mod editing;
pub mod error;
pub mod parsing;
pub mod text;

// Re-export key types for easier usage
pub use editing::{
    DiffRegion, EditOutcome, EditorSession, MentionQuery, Patch, PatchError, Selection,
    clamp_index, find_enclosing_mention_tag, find_mention_query, locate, patch,
    render_mention_tag_html, resolve_caret_after_mention_traversal, splice_markup,
    word_range_around_selection,
};
pub use error::EngineError;
pub use parsing::{MarkupError, ParseOptions, ParseResult, TagForest, TagId, TagKind, TagNode, parse, parse_with};
pub use text::Span;
