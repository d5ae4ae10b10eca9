//! Test utility errors.

use thiserror::Error;

/// Errors raised while building test requests.
#[derive(Debug, Error)]
pub enum TestError {
    /// The request could not be assembled.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// A value could not be form-encoded.
    #[error("failed to encode form body: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}
