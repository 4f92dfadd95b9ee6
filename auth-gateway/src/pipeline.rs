use crate::{
    config::ValidationConfig,
    response::ApiError,
    validation::{validate, Schema, ValidatedInput},
};
use auth_guard::{AuthorizationDecision, AuthorizationGuard, Permission};
use auth_identity::Subject;
use error_common::{AppError, FieldErrors};
use serde_json::Value;
use tracing::debug;

/// Where the target resource id of a request comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceTarget<'a> {
    /// Role-only permission; no resource is involved
    None,
    /// Id taken from this field of the validated input
    Field(&'a str),
}

/// Control flow for a guarded request: validation gate, then guard.
///
/// Validation always comes first so the guard only ever sees an id that
/// passed its schema. Path parameters should be merged into the body with
/// [`with_path_param`] before calling in. Every schema is capped with the
/// deployment's [`ValidationConfig`] limits.
#[derive(Clone)]
pub struct RequestAuthorizer {
    guard: AuthorizationGuard,
    limits: ValidationConfig,
}

impl RequestAuthorizer {
    pub fn new(guard: AuthorizationGuard, limits: ValidationConfig) -> Self {
        Self { guard, limits }
    }

    pub fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }

    pub fn limits(&self) -> &ValidationConfig {
        &self.limits
    }

    /// Validate `raw`, then authorize `permission` against the target it names.
    ///
    /// # Errors
    ///
    /// VALIDATION_ERROR when the input fails `schema`; the denial kind when the
    /// guard denies; INTERNAL_ERROR when the ownership lookup fails.
    pub async fn authorize_input(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        schema: &Schema,
        raw: &Value,
        target: ResourceTarget<'_>,
    ) -> Result<ValidatedInput, ApiError> {
        let schema = schema.clone().with_limits(&self.limits);
        let input = validate(&schema, raw).map_err(|err| {
            debug!(
                permission = %permission,
                fields = ?err.details().map(|d| d.keys().collect::<Vec<_>>()),
                "Request failed validation"
            );
            ApiError(err)
        })?;

        let decision = match target {
            ResourceTarget::None => self.guard.authorize(subject, permission, None),
            ResourceTarget::Field(field) => {
                let resource_id = target_id(&input, field)?;
                self.guard
                    .authorize_resource(subject, permission, resource_id)
                    .await?
            }
        };

        enforce(subject, permission, decision)?;
        Ok(input)
    }

    /// Authorize an action that carries no input (e.g. a DELETE by path id).
    ///
    /// The id is still run through `schema` under `field` before the guard sees it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::authorize_input`].
    pub async fn authorize_path(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        schema: &Schema,
        field: &str,
        id: &str,
    ) -> Result<ValidatedInput, ApiError> {
        let raw = with_path_param(Value::Object(serde_json::Map::new()), field, id);
        self.authorize_input(subject, permission, schema, &raw, ResourceTarget::Field(field))
            .await
    }
}

/// Merge a path parameter into a JSON body so both are validated together.
///
/// The path value wins over a body field of the same name.
pub fn with_path_param(body: Value, field: &str, value: &str) -> Value {
    match body {
        Value::Object(mut map) => {
            map.insert(field.to_string(), Value::String(value.to_string()));
            Value::Object(map)
        }
        // Leave non-objects alone; validation reports them
        other => other,
    }
}

fn target_id<'a>(input: &'a ValidatedInput, field: &str) -> Result<&'a str, AppError> {
    let message = match input.get(field) {
        Some(Value::String(id)) => return Ok(id.as_str()),
        Some(_) => format!("{} must be a string", field),
        None => format!("{} is required", field),
    };

    let mut details = FieldErrors::new();
    details.insert(field.to_string(), vec![message]);
    Err(AppError::validation(details))
}

fn enforce(subject: Option<&Subject>, permission: Permission, decision: AuthorizationDecision) -> Result<(), AppError> {
    if !decision.is_allowed() {
        debug!(
            subject = %subject.map_or_else(|| "anonymous".to_string(), ToString::to_string),
            permission = %permission,
            reason = ?decision.reason,
            "Authorization denied"
        );
    }
    decision.into_result()
}
