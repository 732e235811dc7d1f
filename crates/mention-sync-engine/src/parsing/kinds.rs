//! # Markup Kinds
//!
//! Delimiter constants live here, not scattered in parser code.

/// Angle-bracket tag delimiters.
pub struct Markup;

impl Markup {
    pub const OPEN: u8 = b'<';
    pub const CLOSE: u8 = b'>';
    /// Leads a close tag (`</b>`) or trails a self-closing one (`<br/>`).
    pub const SLASH: u8 = b'/';
}

/// The mention element.
pub struct Mention;

impl Mention {
    /// Default element name for mentions.
    pub const TAG: &'static str = "mention";
    /// Default trigger shown before a mention's display text.
    pub const TRIGGER: &'static str = "@";
    /// Attribute carrying the mentioned entity's id.
    pub const ID_ATTR: &'static str = "id";
}
