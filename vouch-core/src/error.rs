use thiserror::Error;

use crate::identity::crypto::CryptoError;
use crate::identity::record::ValidationError;

/// Error taxonomy for the identity engine.
///
/// Messages are safe to surface to callers: they never carry stored hashes,
/// the signing secret, or raw driver error text. `Internal` detail is logged
/// server-side and replaced with a generic message at the HTTP boundary.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("No matching identity")]
    NotFound,

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CryptoError> for IdentityError {
    fn from(err: CryptoError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
