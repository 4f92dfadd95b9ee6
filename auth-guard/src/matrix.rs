use crate::models::Permission;
use auth_identity::Role;
use std::fmt;

/// Compact set of permissions backed by a bitmask
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(u16);

impl PermissionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::from_slice(&Permission::ALL)
    }

    pub fn from_slice(permissions: &[Permission]) -> Self {
        Self(permissions.iter().fold(0, |bits, p| bits | p.bit()))
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    pub fn is_superset(&self, other: &PermissionSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0, |bits, p| bits | p.bit()))
    }
}

const AUTHOR_PERMISSIONS: [Permission; 4] = [
    Permission::CreateQuote,
    Permission::UpdateQuote,
    Permission::DeleteQuote,
    Permission::ManageAuthorProfile,
];

// Management actions are never granted to USER by default
const USER_PERMISSIONS: [Permission; 0] = [];

/// Permissions held by a role.
///
/// Total over [`Role`]; a missing permission is simply absent from the set.
/// The table is fixed at compile time, so it is shared by every request
/// without synchronization.
pub fn permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::Admin => PermissionSet::all(),
        Role::Author => PermissionSet::from_slice(&AUTHOR_PERMISSIONS),
        Role::User => PermissionSet::from_slice(&USER_PERMISSIONS),
    }
}

pub fn role_has(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(permission)
}
