use crate::{
    check::{self, OwnershipCheck},
    error::OwnershipError,
    models::*,
    ownership::OwnershipResolver,
};
use auth_identity::Subject;
use error_common::AppError;
use std::sync::Arc;

/// Authorization guard bound to an ownership collaborator.
///
/// Holds no per-request state and no cache: every decision is computed from
/// its arguments and a fresh ownership lookup, so one guard can be shared
/// across worker tasks behind an `Arc`.
#[derive(Clone)]
pub struct AuthorizationGuard {
    resolver: Arc<dyn OwnershipResolver>,
}

impl AuthorizationGuard {
    pub fn new(resolver: Arc<dyn OwnershipResolver>) -> Self {
        Self { resolver }
    }

    // =============================================================================
    // Core Authorization Operations
    // =============================================================================

    /// Decide with a caller-supplied ownership predicate. See [`check::authorize`].
    pub fn authorize(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        ownership_check: Option<OwnershipCheck<'_>>,
    ) -> AuthorizationDecision {
        check::authorize(subject, permission, ownership_check)
    }

    /// Decide against the current owner of `resource_id`.
    ///
    /// The role gate runs before any lookup, so requests the role already
    /// denies never reach the collaborator. A missing resource becomes a
    /// `NOT_FOUND` decision. Any other lookup failure is returned as an
    /// internal error. No timeout or retry is applied here.
    ///
    /// # Errors
    ///
    /// Returns an INTERNAL_ERROR [`AppError`] when the ownership collaborator fails.
    pub async fn authorize_resource(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        resource_id: &str,
    ) -> Result<AuthorizationDecision, AppError> {
        let subject = match check::role_gate(subject, permission) {
            Ok(subject) => subject,
            Err(denied) => return Ok(denied),
        };

        if !check::requires_ownership(subject, permission) {
            return Ok(AuthorizationDecision::allow());
        }

        let ownership = match self
            .resolver
            .resolve_owner(permission.target_kind(), resource_id)
            .await
        {
            Ok(owner_id) => Ownership::from(owner_id == subject.id()),
            Err(OwnershipError::NotFound(_)) => Ownership::NotFound,
            Err(err @ OwnershipError::Backend(_)) => return Err(err.into()),
        };

        Ok(check::ownership_decision(permission, ownership))
    }

    /// Like [`Self::authorize_resource`] but turns a denial into its typed error
    ///
    /// # Errors
    ///
    /// Returns the denial as an [`AppError`], or INTERNAL_ERROR when the lookup fails.
    pub async fn require(
        &self,
        subject: Option<&Subject>,
        permission: Permission,
        resource_id: &str,
    ) -> Result<(), AppError> {
        self.authorize_resource(subject, permission, resource_id)
            .await?
            .into_result()
    }

    /// Evaluate independent queries in order.
    ///
    /// Requests without a resource id are decided with no ownership check, so
    /// ownership-scoped permissions fail closed for non-admins.
    ///
    /// # Errors
    ///
    /// Stops at the first ownership collaborator failure.
    pub async fn authorize_batch(
        &self,
        requests: &[AuthorizationRequest],
    ) -> Result<Vec<AuthorizationDecision>, AppError> {
        let mut decisions = Vec::with_capacity(requests.len());

        for request in requests {
            let decision = match request.resource_id.as_deref() {
                Some(resource_id) => {
                    self.authorize_resource(request.subject.as_ref(), request.permission, resource_id)
                        .await?
                }
                None => self.authorize(request.subject.as_ref(), request.permission, None),
            };
            decisions.push(decision);
        }

        Ok(decisions)
    }
}
