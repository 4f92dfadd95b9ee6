use error_common::{AppError, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity has no subject id")]
    MissingSubjectId,

    #[error("Identity has no role")]
    MissingRole,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Malformed identity claims: {0}")]
    MalformedClaims(String),

    #[error("Identity provider failure: {0}")]
    Provider(#[from] anyhow::Error),
}

impl From<IdentityError> for AppError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Provider(cause) => AppError::internal(cause),
            // Never tell the client which part of its identity was rejected
            _ => AppError::from_kind(ErrorKind::Unauthorized),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
