use crate::{config::*, error::*, models::*, provider::IdentityProvider};
use serde_json::Value;

/// Turns whatever the identity provider returns into a stable [`Subject`]
#[derive(Debug, Clone, Default)]
pub struct IdentityService {
    config: IdentityConfig,
}

impl IdentityService {
    pub fn new(config: IdentityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Resolve the subject for the current request.
    ///
    /// `Ok(None)` when the provider reports no identity. A present but
    /// unusable identity is an error rather than an anonymous request.
    pub async fn current_subject(&self, provider: &dyn IdentityProvider) -> Result<Option<Subject>> {
        match provider.current_identity().await? {
            Some(raw) => self.normalize(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn normalize(&self, raw: &RawIdentity) -> Result<Subject> {
        let id = raw
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(IdentityError::MissingSubjectId)?;

        let role = self.resolve_role(raw.role.as_deref())?;

        Ok(Subject::new(id, role))
    }

    /// Normalize a JSON claim set (token payload or session callback object)
    pub fn from_claims(&self, claims: &Value) -> Result<Subject> {
        let object = claims
            .as_object()
            .ok_or_else(|| IdentityError::MalformedClaims("claims must be an object".to_string()))?;

        let id = std::iter::once(&self.config.id_claim)
            .chain(self.config.fallback_id_claims.iter())
            .find_map(|claim| object.get(claim))
            .map(claim_to_string)
            .transpose()?;

        let role = object
            .get(&self.config.role_claim)
            .filter(|v| !v.is_null())
            .map(claim_to_string)
            .transpose()?;

        self.normalize(&RawIdentity {
            id,
            email: object.get("email").and_then(Value::as_str).map(str::to_string),
            name: object.get("name").and_then(Value::as_str).map(str::to_string),
            role,
        })
    }

    fn resolve_role(&self, role: Option<&str>) -> Result<Role> {
        match role.map(str::trim).filter(|r| !r.is_empty()) {
            Some(name) => name.parse(),
            None => self.config.default_role.ok_or(IdentityError::MissingRole),
        }
    }
}

fn claim_to_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(IdentityError::MalformedClaims(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}
