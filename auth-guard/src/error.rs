use crate::models::ResourceKey;
use error_common::AppError;
use thiserror::Error;

/// Failures reported by an ownership lookup
#[derive(Error, Debug)]
pub enum OwnershipError {
    /// The resource does not exist. Recoverable into a NOT_FOUND decision.
    #[error("Resource not found: {0}")]
    NotFound(ResourceKey),

    /// The persistence collaborator failed
    #[error("Ownership lookup failed: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<OwnershipError> for AppError {
    fn from(error: OwnershipError) -> Self {
        match error {
            OwnershipError::NotFound(key) => AppError::not_found(key.kind),
            OwnershipError::Backend(cause) => AppError::internal(cause),
        }
    }
}

pub type Result<T> = std::result::Result<T, OwnershipError>;
