use async_trait::async_trait;

use crate::{error::*, models::*};

/// Identity collaborator (session or token resolution).
///
/// Implementations are request-scoped: they answer for the request they were
/// built from. `Ok(None)` means the request is unauthenticated.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> Result<Option<RawIdentity>>;
}

/// Provider returning a fixed identity, for tests and tooling
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    identity: Option<RawIdentity>,
}

impl StaticIdentityProvider {
    pub fn new(identity: Option<RawIdentity>) -> Self {
        Self { identity }
    }

    pub fn anonymous() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(&self) -> Result<Option<RawIdentity>> {
        Ok(self.identity.clone())
    }
}
