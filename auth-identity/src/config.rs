use serde::{Deserialize, Serialize};

use crate::models::Role;

/// How raw provider claims map onto a [`crate::Subject`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Claim carrying the subject id
    pub id_claim: String,
    /// Claims tried in order when `id_claim` is absent
    pub fallback_id_claims: Vec<String>,
    /// Claim carrying the role name
    pub role_claim: String,
    /// Role assigned when the provider sends none. `None` rejects such identities.
    pub default_role: Option<Role>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id_claim: "sub".to_string(),
            fallback_id_claims: vec!["id".to_string(), "user_id".to_string()],
            role_claim: "role".to_string(),
            default_role: Some(Role::User),
        }
    }
}
