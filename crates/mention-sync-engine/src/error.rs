use mention_sync_config::ConfigError;
use thiserror::Error;

use crate::{editing::patch::PatchError, parsing::MarkupError};

/// Everything an edit cycle can fail with.
///
/// None of these come from user typing; they mean the stored HTML or the
/// caller's bookkeeping is broken. Hosts should keep the current content and
/// carry on.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed markup: {0}")]
    MalformedMarkup(#[from] MarkupError),
    #[error(transparent)]
    InvariantViolation(#[from] PatchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
