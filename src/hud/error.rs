//! Error taxonomy for the status bar core.
//!
//! Only programmer-contract violations surface as errors. Out-of-range
//! configuration is clamped, lookup misses return `None`, and missing art is
//! skipped, so none of those appear here.

/// Contract violations raised while drawing the HUD.
///
/// These indicate a logic error in the caller (usually a status bar hook)
/// and are not meant to be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HudError {
    #[error("Attempt to draw a string with no font")]
    MissingFont,

    #[error("Attempt to draw to screen outside a draw function")]
    DrawOutsidePass,
}

/// Result alias used by drawing operations.
pub type HudResult<T> = std::result::Result<T, HudError>;
