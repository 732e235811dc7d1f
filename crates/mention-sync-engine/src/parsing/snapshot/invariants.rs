use crate::{
    parsing::{ParseResult, TagId, TagNode},
    text::{char_len, decode_html_text, slice_chars},
};

/// Validates parser output invariants against the HTML it came from.
///
/// Asserts that:
/// - Every HTML span is within bounds and every plain span within the projection
/// - `plain.start <= plain.end` for every node
/// - Siblings are ordered and disjoint, and sit inside their parent
/// - Mentions have no children and their projection starts with `trigger`
/// - Re-assembling text outside tags plus each root's projection gives back
///   the plain text
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(html: &str, trigger: &str, result: &ParseResult) {
    let plain_len = char_len(&result.plain_text);
    for node in result.tags.iter() {
        let outer = node.outer_span();
        assert!(
            outer.start <= outer.end && outer.end <= html.len(),
            "tag html span out of bounds: {outer:?} (html len: {})",
            html.len()
        );
        assert!(
            node.plain.start <= node.plain.end && node.plain.end <= plain_len,
            "tag plain span out of bounds: {:?} (plain len: {plain_len})",
            node.plain
        );
        if node.is_mention() {
            assert!(node.children.is_empty(), "mention {:?} has children", node.id);
            assert!(
                slice_chars(&result.plain_text, node.plain).starts_with(trigger),
                "mention {:?} projection does not start with trigger",
                node.id
            );
        }
        check_siblings(result, Some(node), &node.children);
    }
    check_siblings(result, None, result.tags.roots());

    let mut rebuilt = String::new();
    let mut cursor = 0;
    for &id in result.tags.roots() {
        let node = result.tags.get(id);
        rebuilt.push_str(&decode_html_text(&html[cursor..node.open_tag.start]));
        rebuilt.push_str(slice_chars(&result.plain_text, node.plain));
        cursor = node.outer_span().end;
    }
    rebuilt.push_str(&decode_html_text(&html[cursor..]));
    assert_eq!(
        rebuilt, result.plain_text,
        "projection does not reassemble from root tags"
    );
}

fn check_siblings(result: &ParseResult, parent: Option<&TagNode>, siblings: &[TagId]) {
    let mut prev: Option<&TagNode> = None;
    for &id in siblings {
        let node = result.tags.get(id);
        if let Some(parent) = parent {
            assert!(
                parent.plain.start <= node.plain.start && node.plain.end <= parent.plain.end,
                "child {:?} plain span {:?} outside parent {:?}",
                node.id,
                node.plain,
                parent.plain
            );
        }
        if let Some(prev) = prev {
            assert!(
                prev.plain.end <= node.plain.start && prev.outer_span().end <= node.open_tag.start,
                "siblings {:?} and {:?} overlap or are out of order",
                prev.id,
                node.id
            );
        }
        prev = Some(node);
    }
}
