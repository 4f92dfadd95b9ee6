//! Request boundary for the Quotevault authorization core
//!
//! Wires the core into axum handlers:
//!
//! - [`validation`]: the validation gate that runs before the guard
//! - [`pipeline`]: validate → resolve target → authorize, as one call
//! - [`response`]: [`ApiError`] rendering `{ "error": { code, message, details? } }`
//! - [`extract`]: subject extraction from verified claims
//! - [`config`] / [`telemetry`]: start-up configuration and tracing
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_gateway::{AuthzConfig, RequestAuthorizer, ResourceTarget, Rule, Schema, telemetry};
//! use auth_guard::{AuthorizationGuard, InMemoryOwnershipStore, Permission};
//! use auth_identity::Subject;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthzConfig::load(None)?;
//!     telemetry::init_tracing(&config.logging)?;
//!
//!     let authorizer = RequestAuthorizer::new(
//!         AuthorizationGuard::new(Arc::new(InMemoryOwnershipStore::new())),
//!         config.validation.clone(),
//!     );
//!     let schema = Schema::new().field("id", [Rule::Required]).field("text", [Rule::Required]);
//!
//!     let body = serde_json::json!({ "id": "q1", "text": "Memento mori" });
//!     let result = authorizer
//!         .authorize_input(Some(&Subject::author("u1")), Permission::UpdateQuote, &schema, &body, ResourceTarget::Field("id"))
//!         .await;
//!     println!("allowed: {}", result.is_ok());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod extract;
pub mod pipeline;
pub mod response;
pub mod telemetry;
pub mod validation;

pub use config::*;
pub use extract::*;
pub use pipeline::*;
pub use response::*;
pub use validation::{field_errors_from, validate, validate_request, Rule, Schema, ValidatedInput, ValueType};
