//! Authorization guard for the Quotevault platform
//!
//! Decides ALLOW or DENY for a (subject, permission, resource) triple using
//! two inputs only:
//! - **Role**: the fixed role → permission [`matrix`]
//! - **Ownership**: whether the subject owns the target, read fresh from an
//!   [`OwnershipResolver`] supplied by the persistence layer
//!
//! The role gate is always evaluated before ownership. Owning a quote does not
//! let a USER edit it; ownership only narrows what AUTHOR may touch. ADMIN is
//! granted every permission and bypasses ownership.
//!
//! # Example
//!
//! ```rust
//! use auth_guard::{authorize, Ownership, Permission, ResourceRef};
//! use auth_identity::Subject;
//!
//! let alice = Subject::author("u1");
//! let quote = ResourceRef::quote("q1", "u1");
//!
//! let decision = authorize(
//!     Some(&alice),
//!     Permission::UpdateQuote,
//!     Some(&|s: &Subject| Ownership::of(s, &quote)),
//! );
//! assert!(decision.is_allowed());
//! ```

pub mod check;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod models;
pub mod ownership;

pub use check::{authorize, OwnershipCheck};
pub use engine::*;
pub use error::*;
pub use matrix::{permissions_for, role_has, PermissionSet};
pub use models::*;
pub use ownership::*;
