//! Validator setup errors.

use thiserror::Error;

/// Errors raised while building a [`ValidatorProvider`](crate::ValidatorProvider).
///
/// These are startup errors; a built provider never fails at request time.
#[derive(Debug, Error)]
pub enum ValidationSetupError {
    /// A custom regex rule does not compile.
    #[error("invalid pattern for rule '{name}': {source}")]
    InvalidPattern {
        /// Rule name.
        name: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// The date format is not a valid chrono format string.
    #[error("invalid date format: '{format}'")]
    InvalidDateFormat {
        /// The rejected format.
        format: String,
    },

    /// A rule name is empty or contains `,` or `=`.
    #[error("invalid rule name: '{name}'")]
    InvalidRuleName {
        /// The rejected name.
        name: String,
    },
}
