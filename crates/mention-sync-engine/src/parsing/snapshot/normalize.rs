use crate::{
    parsing::{ParseResult, TagForest, TagId},
    text::{preview, slice_chars},
};

/// Snapshot of a parsed document for testing with `insta`.
#[derive(Debug)]
pub struct Snap {
    pub plain_text: String,
    pub tags: Vec<TagSnap>,
}

/// Snapshot of a single tag and its subtree.
#[derive(Debug)]
pub struct TagSnap {
    /// Tag name, suffixed with `(mention)` for mentions.
    pub kind: String,
    /// HTML byte span as `start..end`.
    pub html: String,
    /// Plain-text char span as `start..end`.
    pub plain: String,
    /// Preview of the projected text (truncated for readability).
    pub text: String,
    pub children: Vec<TagSnap>,
}

/// Converts a parse result into a serializable-by-debug snapshot tree.
pub fn normalize(result: &ParseResult) -> Snap {
    Snap {
        plain_text: result.plain_text.clone(),
        tags: result
            .tags
            .roots()
            .iter()
            .map(|&id| tag_snap(&result.tags, &result.plain_text, id))
            .collect(),
    }
}

fn tag_snap(forest: &TagForest, plain_text: &str, id: TagId) -> TagSnap {
    let node = forest.get(id);
    let kind = if node.is_mention() {
        format!("{}(mention)", node.tag_type)
    } else {
        node.tag_type.clone()
    };
    let outer = node.outer_span();

    TagSnap {
        kind,
        html: format!("{}..{}", outer.start, outer.end),
        plain: format!("{}..{}", node.plain.start, node.plain.end),
        text: preview(slice_chars(plain_text, node.plain), 40),
        children: node
            .children
            .iter()
            .map(|&child| tag_snap(forest, plain_text, child))
            .collect(),
    }
}
