//! Error types for the author registry.

use thiserror::Error;

/// Errors raised by [`AuthorRegistry`](crate::AuthorRegistry) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthorError {
    /// The name is empty once accents, control characters and surrounding
    /// whitespace are removed.
    #[error("author name '{raw}' is empty after normalization")]
    EmptyName { raw: String },

    /// The author is not registered.
    #[error("unknown author: {0}")]
    UnknownAuthor(String),
}

/// Result type alias for author operations.
pub type Result<T> = std::result::Result<T, AuthorError>;
