//! Subject model and identity normalization
//!
//! The identity collaborator (session or token resolution) lives outside the
//! authorization core. This crate turns what it returns into a [`Subject`]
//! with a typed [`Role`], which is then passed explicitly to the guard. There
//! is no ambient session state.
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{IdentityService, RawIdentity, Role};
//!
//! let service = IdentityService::default();
//! let subject = service.normalize(&RawIdentity::new("u1", "author")).unwrap();
//! assert_eq!(subject.role(), Role::Author);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod service;

pub use config::*;
pub use error::*;
pub use models::*;
pub use provider::*;
pub use service::*;
