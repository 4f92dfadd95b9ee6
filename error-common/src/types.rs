use crate::codes;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Per-field validation messages keyed by field path (e.g. `author.name`)
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Client-visible message for every internal failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Uniqueness constraints surfaced by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateKind {
    Slug,
    TagName,
    Email,
    CategoryName,
}

impl DuplicateKind {
    pub fn code(&self) -> &'static str {
        match self {
            DuplicateKind::Slug => codes::conflict::DUPLICATE_SLUG,
            DuplicateKind::TagName => codes::conflict::DUPLICATE_TAG_NAME,
            DuplicateKind::Email => codes::conflict::DUPLICATE_EMAIL,
            DuplicateKind::CategoryName => codes::conflict::DUPLICATE_CATEGORY_NAME,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            DuplicateKind::Slug => "slug",
            DuplicateKind::TagName => "tag name",
            DuplicateKind::Email => "email",
            DuplicateKind::CategoryName => "category name",
        }
    }
}

/// Every failure the authorization core can surface.
///
/// The status mapping lives here and nowhere else; boundary handlers must go
/// through [`ErrorKind::status_code`] instead of picking codes themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No valid identity
    Unauthorized,
    /// Role lacks the permission
    Forbidden,
    /// Role is sufficient but the subject does not own the quote
    QuoteAccessDenied,
    /// Role is sufficient but the subject does not own the resource
    AccessDenied,
    /// Input failed schema validation
    Validation,
    /// Referenced resource is absent
    NotFound,
    /// Uniqueness constraint violated
    Duplicate(DuplicateKind),
    /// Unexpected failure; details never reach the client
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => codes::authentication::UNAUTHORIZED,
            ErrorKind::Forbidden => codes::authorization::FORBIDDEN,
            ErrorKind::QuoteAccessDenied => codes::authorization::QUOTE_ACCESS_DENIED,
            ErrorKind::AccessDenied => codes::authorization::ACCESS_DENIED,
            ErrorKind::Validation => codes::validation::VALIDATION_ERROR,
            ErrorKind::NotFound => codes::resource::NOT_FOUND,
            ErrorKind::Duplicate(kind) => kind.code(),
            ErrorKind::Internal => codes::system::INTERNAL_ERROR,
        }
    }

    /// HTTP status for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden | ErrorKind::QuoteAccessDenied | ErrorKind::AccessDenied => 403,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Duplicate(_) => 409,
            ErrorKind::Internal => 500,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "Authentication required",
            ErrorKind::Forbidden => "You do not have permission to perform this action",
            ErrorKind::QuoteAccessDenied => "You can only modify your own quotes",
            ErrorKind::AccessDenied => "You can only modify resources you own",
            ErrorKind::Validation => "Request validation failed",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Duplicate(_) => "Resource already exists",
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// True for the kinds a denied authorization decision can carry
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unauthorized
                | ErrorKind::Forbidden
                | ErrorKind::QuoteAccessDenied
                | ErrorKind::AccessDenied
                | ErrorKind::NotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Typed application error carried from the core to the request boundary.
///
/// Fields are private so an error cannot change after construction. For
/// [`ErrorKind::Internal`] the original cause is kept for logging but is never
/// part of [`AppError::client_message`] or the wire envelope.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    details: Option<FieldErrors>,
    cause: Option<Arc<anyhow::Error>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    /// Error carrying the kind's default message
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    pub fn unauthorized() -> Self {
        Self::from_kind(ErrorKind::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::from_kind(ErrorKind::Forbidden)
    }

    pub fn quote_access_denied() -> Self {
        Self::from_kind(ErrorKind::QuoteAccessDenied)
    }

    pub fn access_denied() -> Self {
        Self::from_kind(ErrorKind::AccessDenied)
    }

    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource))
    }

    /// Validation failure with every collected field message
    pub fn validation(details: FieldErrors) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: ErrorKind::Validation.default_message().to_string(),
            details: Some(details),
            cause: None,
        }
    }

    /// Re-type a uniqueness violation reported by persistence
    pub fn duplicate(kind: DuplicateKind, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Duplicate(kind),
            format!("A resource with {} '{}' already exists", kind.field(), value),
        )
    }

    /// Wrap an unexpected failure. The cause is retained for the boundary log only.
    pub fn internal(cause: impl Into<anyhow::Error>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            details: None,
            cause: Some(Arc::new(cause.into())),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&FieldErrors> {
        self.details.as_ref()
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    /// Message safe to show to the client
    pub fn client_message(&self) -> &str {
        match self.kind {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE,
            _ => &self.message,
        }
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        let mut details = FieldErrors::new();
        details.insert("body".to_string(), vec![format!("Invalid JSON: {}", error)]);
        Self::validation(details)
    }
}

/// Result type alias for operations that surface an [`AppError`]
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let table = [
            (ErrorKind::Unauthorized, "UNAUTHORIZED", 401),
            (ErrorKind::Forbidden, "FORBIDDEN", 403),
            (ErrorKind::QuoteAccessDenied, "QUOTE_ACCESS_DENIED", 403),
            (ErrorKind::AccessDenied, "ACCESS_DENIED", 403),
            (ErrorKind::Validation, "VALIDATION_ERROR", 400),
            (ErrorKind::NotFound, "NOT_FOUND", 404),
            (ErrorKind::Duplicate(DuplicateKind::Slug), "DUPLICATE_SLUG", 409),
            (ErrorKind::Duplicate(DuplicateKind::TagName), "DUPLICATE_TAG_NAME", 409),
            (ErrorKind::Internal, "INTERNAL_ERROR", 500),
        ];

        for (kind, code, status) in table {
            assert_eq!(kind.code(), code);
            assert_eq!(kind.status_code(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = AppError::internal(anyhow::anyhow!("connection refused: db-01.internal:5432"));

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
        assert!(!err.to_string().contains("db-01"));
        assert!(err.cause().unwrap().to_string().contains("db-01"));
    }

    #[test]
    fn test_internal_kind_with_custom_message_stays_generic() {
        let err = AppError::new(ErrorKind::Internal, "panic in worker 3");
        assert_eq!(err.client_message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_duplicate_message() {
        let err = AppError::duplicate(DuplicateKind::TagName, "wisdom");
        assert_eq!(err.code(), "DUPLICATE_TAG_NAME");
        assert_eq!(err.status_code(), 409);
        assert!(err.message().contains("wisdom"));
    }

    #[test]
    fn test_invalid_json_becomes_validation_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = AppError::from(parse_err);

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.details().unwrap().contains_key("body"));
    }

    #[test]
    fn test_denial_kinds() {
        assert!(ErrorKind::Forbidden.is_denial());
        assert!(ErrorKind::NotFound.is_denial());
        assert!(!ErrorKind::Validation.is_denial());
        assert!(!ErrorKind::Internal.is_denial());
    }
}
