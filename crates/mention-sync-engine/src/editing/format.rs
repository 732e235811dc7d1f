use crate::{parsing::kinds::Mention, text::encode_html_text};

/// `<mention id="...">display</mention>`, the markup the parser reads back as
/// a mention.
///
/// Blank display text is replaced by `placeholder`.
pub fn render_mention_tag_html(id: &str, display_text: &str, placeholder: &str) -> String {
    render_tag_html(Mention::TAG, id, display_text, placeholder)
}

/// Like [`render_mention_tag_html`] with a configurable tag name.
///
/// The id is attribute-escaped and the display text text-escaped, so the
/// result always re-parses as a single leaf tag showing `display_text`.
pub fn render_tag_html(tag: &str, id: &str, display_text: &str, placeholder: &str) -> String {
    let display = if display_text.trim().is_empty() {
        placeholder
    } else {
        display_text
    };
    format!(
        r#"<{tag} {attr}="{id}">{display}</{tag}>"#,
        attr = Mention::ID_ATTR,
        id = html_escape::encode_double_quoted_attribute(id),
        display = encode_html_text(display),
    )
}
