use crate::{
    matrix::role_has,
    models::{AuthorizationDecision, Ownership, Permission},
};
use auth_identity::{Role, Subject};
use error_common::ErrorKind;

/// Ownership predicate supplied by the caller for ownership-scoped actions
pub type OwnershipCheck<'a> = &'a dyn Fn(&Subject) -> Ownership;

/// Decide whether `subject` may exercise `permission`.
///
/// Evaluation order is fixed:
/// 1. no subject → `UNAUTHORIZED`
/// 2. permission missing from the role's row → `FORBIDDEN`
/// 3. ownership-scoped permission held by a non-admin → run `ownership_check`
/// 4. otherwise ALLOW
///
/// The role gate always runs before ownership, so owning a resource never
/// widens what a role may do. A missing `ownership_check` where one is
/// required is a denial.
pub fn authorize(
    subject: Option<&Subject>,
    permission: Permission,
    ownership_check: Option<OwnershipCheck<'_>>,
) -> AuthorizationDecision {
    let subject = match role_gate(subject, permission) {
        Ok(subject) => subject,
        Err(denied) => return denied,
    };

    if !requires_ownership(subject, permission) {
        return AuthorizationDecision::allow();
    }

    let ownership = ownership_check.map_or(Ownership::NotOwned, |check| check(subject));
    ownership_decision(permission, ownership)
}

/// Steps 1 and 2: returns the subject when the role alone does not deny
pub(crate) fn role_gate(
    subject: Option<&Subject>,
    permission: Permission,
) -> Result<&Subject, AuthorizationDecision> {
    let subject = subject.ok_or_else(|| AuthorizationDecision::deny(ErrorKind::Unauthorized))?;

    if !role_has(subject.role(), permission) {
        return Err(AuthorizationDecision::deny(ErrorKind::Forbidden));
    }

    Ok(subject)
}

/// ADMIN bypasses ownership for every permission
pub(crate) fn requires_ownership(subject: &Subject, permission: Permission) -> bool {
    permission.is_ownership_scoped() && subject.role() != Role::Admin
}

pub(crate) fn ownership_decision(permission: Permission, ownership: Ownership) -> AuthorizationDecision {
    match ownership {
        Ownership::Owned => AuthorizationDecision::allow(),
        Ownership::NotOwned => AuthorizationDecision::deny(permission.ownership_denial()),
        Ownership::NotFound => AuthorizationDecision::deny(ErrorKind::NotFound),
    }
}
