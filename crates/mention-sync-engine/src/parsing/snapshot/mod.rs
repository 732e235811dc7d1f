//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! - **`normalize`**: converts a parse result into a stable `Snap` tree for
//!   `insta` debug snapshots
//! - **`invariants`**: runtime checks for parser correctness (spans in bounds,
//!   children disjoint and inside their parent, mentions are leaves, the
//!   projection reassembles from the tree)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
