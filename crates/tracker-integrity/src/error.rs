//! Error types for integrity digests.

use thiserror::Error;
use tracker_model::ModelError;

/// Errors raised while configuring or applying the integrity codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntegrityError {
    /// The configured digest algorithm is not supported. Raised once, when
    /// the codec is built.
    #[error("digest algorithm '{requested}' is unavailable (supported: sha256, sha384, sha512)")]
    DigestAlgorithmUnavailable { requested: String },

    /// An attribute set rejected a read or write.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IntegrityError {
    /// Returns a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::DigestAlgorithmUnavailable { .. } => {
                "Integrity checking is disabled: the configured digest algorithm is not available."
            }
            Self::Model(_) => "This element does not support tracking attributes.",
        }
    }
}

/// Result type alias for integrity operations.
pub type Result<T> = std::result::Result<T, IntegrityError>;
