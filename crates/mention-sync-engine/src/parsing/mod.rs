//! # Tag Parsing
//!
//! Turns stored HTML into a [`TagForest`] plus the plain-text projection that
//! the editor's text input shows.
//!
//! ## Projection
//!
//! Text outside tags and inside ordinary elements is copied, with character
//! references such as `&lt;` decoded to the one char they stand for. A
//! mention contributes the trigger followed by its content, so
//! `Hello <mention id="1">everyone</mention>!` projects to `Hello @everyone!`
//! with the mention spanning chars `6..15`.
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor used by the tokenizer
//! - **`kinds`**: delimiter constants and the mention element defaults
//! - **`tokenizer`**: bracket scan and open/close/self-closing classification
//! - **`tag`**: `TagNode` and the `TagForest` arena
//! - **`parser`**: explicit-stack parser, `parse()` / `parse_with()` entry points
//! - **`error`**: `MarkupError`
//! - **`snapshot`**: normalisation and invariant checks for tests
//!
//! ## Tolerance
//!
//! Anything between `<` and `>` that is not a well-formed tag stays text, so
//! `x<y and z` parses cleanly. So does a close tag with nothing open or an
//! open tag that is never closed. Only a close tag that names a different
//! element than the innermost open one is an error, besides the nesting bound.

pub mod cursor;
pub mod error;
pub mod kinds;
pub mod parser;
pub mod snapshot;
pub mod tag;
pub mod tokenizer;

pub use error::MarkupError;
pub use parser::{DEFAULT_MAX_DEPTH, ParseOptions, ParseResult, parse, parse_with};
pub use tag::{TagForest, TagId, TagKind, TagNode};
