//! Error types
//!
//! Every failure in this crate is a silent degradation of a decorative layer:
//! callers log the error and carry on without the hero animation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The host page has no element to render into
    #[error("host container #{0} not found")]
    MissingContainer(String),

    /// A DOM call failed (canvas creation, 2D context, image upload)
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// Tunables JSON could not be parsed
    #[error("invalid hero config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
