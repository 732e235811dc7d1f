use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::text::Span;

use super::kinds::Mention;

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
});

/// Index of a node in a [`TagForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TagId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagKind {
    /// Atomic reference to a person or entity. Always a leaf.
    Mention,
    /// Any other element; transparent for mention queries.
    Element,
}

/// One element found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagNode {
    pub id: TagId,
    /// Lowercase tag name.
    pub tag_type: String,
    pub kind: TagKind,
    /// Verbatim open tag including attributes.
    pub open_tag_text: String,
    /// Byte span of the open tag in the HTML.
    pub open_tag: Span,
    /// Byte span of the close tag; `None` for self-closing tags.
    pub close_tag: Option<Span>,
    /// Raw inner HTML; `None` for self-closing tags.
    pub content: Option<String>,
    pub children: Vec<TagId>,
    /// Char span in the plain-text projection. For mentions, `start` is the
    /// position of the trigger.
    pub plain: Span,
}

impl TagNode {
    pub fn is_mention(&self) -> bool {
        self.kind == TagKind::Mention
    }

    pub fn is_self_closing(&self) -> bool {
        self.close_tag.is_none()
    }

    /// Byte span from the open tag's `<` to the close tag's `>`.
    pub fn outer_span(&self) -> Span {
        let end = self.close_tag.map_or(self.open_tag.end, |c| c.end);
        Span::new(self.open_tag.start, end)
    }

    /// Byte span of the inner HTML. Empty, at the end of the open tag, for
    /// self-closing tags.
    pub fn content_span(&self) -> Span {
        let end = self.close_tag.map_or(self.open_tag.end, |c| c.start);
        Span::new(self.open_tag.end, end)
    }

    /// Value of a `name="value"` attribute on the open tag.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        ATTRIBUTE
            .captures_iter(&self.open_tag_text)
            .find(|caps| caps[1].eq_ignore_ascii_case(name))
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }

    /// The mentioned entity's id, for mention tags.
    pub fn mention_id(&self) -> Option<&str> {
        if !self.is_mention() {
            return None;
        }
        self.attribute(Mention::ID_ATTR)
    }
}

/// Arena of parsed tags. Children are stored as id lists; parents are a
/// reverse map built once when parsing finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagForest {
    pub(crate) nodes: Vec<TagNode>,
    pub(crate) roots: Vec<TagId>,
    #[serde(skip)]
    pub(crate) parents: Vec<Option<TagId>>,
}

impl TagForest {
    pub(crate) fn new(nodes: Vec<TagNode>, roots: Vec<TagId>) -> Self {
        let mut parents = vec![None; nodes.len()];
        for node in &nodes {
            for child in &node.children {
                parents[child.0] = Some(node.id);
            }
        }
        Self {
            nodes,
            roots,
            parents,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// # Panics
    /// Panics if `id` did not come from this forest.
    pub fn get(&self, id: TagId) -> &TagNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[TagId] {
        &self.roots
    }

    pub fn children(&self, id: TagId) -> &[TagId] {
        &self.get(id).children
    }

    pub fn parent(&self, id: TagId) -> Option<TagId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// All nodes in document (open tag) order.
    pub fn iter(&self) -> impl Iterator<Item = &TagNode> + '_ {
        self.nodes.iter()
    }

    pub fn mentions(&self) -> impl Iterator<Item = &TagNode> + '_ {
        self.nodes.iter().filter(|n| n.is_mention())
    }

    /// Open tag offset relative to the parent's content (or the document for
    /// root nodes).
    pub fn local_open_tag_start(&self, id: TagId) -> usize {
        self.get(id).open_tag.start - self.local_base(id)
    }

    /// Close tag offset relative to the parent's content. Self-closing tags
    /// report the end of their open tag.
    pub fn local_close_tag_start(&self, id: TagId) -> usize {
        let node = self.get(id);
        let close = node.close_tag.map_or(node.open_tag.end, |c| c.start);
        close - self.local_base(id)
    }

    fn local_base(&self, id: TagId) -> usize {
        self.parent(id)
            .map_or(0, |parent| self.get(parent).content_span().start)
    }
}
