//! Error taxonomy for the Quotevault authorization core
//!
//! One [`ErrorKind`] enum with a single status-mapping table replaces
//! per-feature error hierarchies. Errors are produced by the guard and the
//! validation gate and serialized by the boundary layer as
//! `{ "error": { "code", "message", "details"? } }`.
//!
//! | kind | code | status |
//! |---|---|---|
//! | [`ErrorKind::Unauthorized`] | `UNAUTHORIZED` | 401 |
//! | [`ErrorKind::Forbidden`] | `FORBIDDEN` | 403 |
//! | [`ErrorKind::QuoteAccessDenied`] | `QUOTE_ACCESS_DENIED` | 403 |
//! | [`ErrorKind::AccessDenied`] | `ACCESS_DENIED` | 403 |
//! | [`ErrorKind::Validation`] | `VALIDATION_ERROR` | 400 |
//! | [`ErrorKind::NotFound`] | `NOT_FOUND` | 404 |
//! | [`ErrorKind::Duplicate`] | `DUPLICATE_*` | 409 |
//! | [`ErrorKind::Internal`] | `INTERNAL_ERROR` | 500 |
//!
//! # Example
//!
//! ```rust
//! use error_common::{AppError, DuplicateKind};
//!
//! let err = AppError::duplicate(DuplicateKind::Slug, "stoic-quotes");
//! assert_eq!(err.status_code(), 409);
//! assert_eq!(err.envelope().error.code, "DUPLICATE_SLUG");
//! ```

pub mod codes;
pub mod envelope;
pub mod reporting;
pub mod types;

pub use envelope::*;
pub use reporting::*;
pub use types::*;
