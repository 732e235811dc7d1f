/*!
 * # Editing
 *
 * Keeps stored HTML in step with a plain-text input that knows nothing about
 * markup.
 *
 * ## Edit Cycle
 *
 * The HTML is the single source of truth. On every keystroke:
 *
 * 1. **`diff::locate`** finds the changed range between the previous and the
 *    current plain text, using the editor's selections to resolve ambiguity
 * 2. **`patch::patch`** rewrites the HTML so its projection matches the new
 *    text, keeping every byte outside the change and treating mentions as
 *    atomic tokens
 * 3. the patched HTML is re-parsed; the new `ParseResult` replaces the old
 *    one wholesale
 *
 * Typed text is written escaped, so `<div>` typed by a user stays text.
 * `session::EditorSession` runs that cycle and keeps the selection.
 *
 * ## Mentions
 *
 * A mention cannot be partially edited. Deleting inside one removes whole
 * words of its display text (or the whole mention), typing inside one
 * replaces it, and the caret is kept out of the middle of its words
 * (`boundary`).
 *
 * ## Module Structure
 *
 * - **`diff`**: `Selection`, `DiffRegion` and the diff locator
 * - **`boundary`**: caret and selection snapping around mentions
 * - **`words`**: word segmentation for deleting inside mentions
 * - **`patch`**: the HTML patcher and `splice_markup`
 * - **`format`**: rendering new mention tags
 * - **`query`**: detecting a mention being typed (`@pa|`)
 * - **`session`**: `EditorSession`, the host-facing edit loop
 *
 * ## Usage Pattern
 *
 * ```rust
 * use mention_sync_config::Config;
 * use mention_sync_engine::editing::{EditorSession, Selection};
 *
 * let html = r#"Hello <mention id="1">everyone</mention>!"#;
 * let mut session = EditorSession::new(html, Config::default()).unwrap();
 * assert_eq!(session.plain_text(), "Hello @everyone!");
 *
 * session.apply_text_change("Hello @everyone!!", Selection::caret(17)).unwrap();
 * assert_eq!(session.html(), r#"Hello <mention id="1">everyone</mention>!!"#);
 * ```
 */

pub mod boundary;
pub mod diff;
pub mod format;
pub mod patch;
pub mod query;
pub mod session;
pub mod words;

pub use boundary::{
    clamp_index, find_enclosing_mention_tag, resolve_caret_after_mention_traversal,
    word_range_around_selection,
};
pub use diff::{DiffRegion, Selection, locate};
pub use format::{render_mention_tag_html, render_tag_html};
pub use patch::{Patch, PatchError, patch, splice_markup};
pub use query::{MentionQuery, find_mention_query};
pub use session::{EditOutcome, EditorSession};
