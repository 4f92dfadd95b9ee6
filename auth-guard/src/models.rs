use auth_identity::Subject;
use error_common::{AppError, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named action classes guarded by the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Permission {
    CreateQuote,
    UpdateQuote,
    DeleteQuote,
    ManageAuthorProfile,
    ManageCategories,
    ManageTags,
    ManageUsers,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::CreateQuote,
        Permission::UpdateQuote,
        Permission::DeleteQuote,
        Permission::ManageAuthorProfile,
        Permission::ManageCategories,
        Permission::ManageTags,
        Permission::ManageUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CreateQuote => "CREATE_QUOTE",
            Permission::UpdateQuote => "UPDATE_QUOTE",
            Permission::DeleteQuote => "DELETE_QUOTE",
            Permission::ManageAuthorProfile => "MANAGE_AUTHOR_PROFILE",
            Permission::ManageCategories => "MANAGE_CATEGORIES",
            Permission::ManageTags => "MANAGE_TAGS",
            Permission::ManageUsers => "MANAGE_USERS",
        }
    }

    /// Whether a non-admin grant additionally requires owning the target
    pub fn is_ownership_scoped(&self) -> bool {
        matches!(
            self,
            Permission::CreateQuote
                | Permission::UpdateQuote
                | Permission::DeleteQuote
                | Permission::ManageAuthorProfile
        )
    }

    /// Kind of resource whose owner decides an ownership-scoped grant.
    ///
    /// Creating a quote is checked against the author profile the quote is
    /// filed under, since the quote does not exist yet.
    pub fn target_kind(&self) -> ResourceKind {
        match self {
            Permission::CreateQuote | Permission::ManageAuthorProfile => ResourceKind::AuthorProfile,
            Permission::UpdateQuote | Permission::DeleteQuote => ResourceKind::Quote,
            Permission::ManageCategories => ResourceKind::Category,
            Permission::ManageTags => ResourceKind::Tag,
            Permission::ManageUsers => ResourceKind::User,
        }
    }

    /// Denial kind when the role is sufficient but the subject is not the owner
    pub fn ownership_denial(&self) -> ErrorKind {
        match self {
            Permission::CreateQuote | Permission::UpdateQuote | Permission::DeleteQuote => {
                ErrorKind::QuoteAccessDenied
            }
            _ => ErrorKind::AccessDenied,
        }
    }

    pub(crate) fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown permission: {}", s))
    }
}

/// Resource families owned by users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Quote,
    AuthorProfile,
    Category,
    Tag,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Quote => "quote",
            ResourceKind::AuthorProfile => "author_profile",
            ResourceKind::Category => "category",
            ResourceKind::Tag => "tag",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a resource for an ownership lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// An already-fetched resource together with its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
    pub owner_id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            owner_id: owner_id.into(),
        }
    }

    pub fn quote(id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self::new(ResourceKind::Quote, id, owner_id)
    }

    pub fn is_owned_by(&self, subject: &Subject) -> bool {
        self.owner_id == subject.id()
    }
}

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    NotOwned,
    /// The lookup reported that the resource does not exist
    NotFound,
}

impl Ownership {
    pub fn of(subject: &Subject, resource: &ResourceRef) -> Self {
        resource.is_owned_by(subject).into()
    }
}

impl From<bool> for Ownership {
    fn from(owned: bool) -> Self {
        if owned {
            Ownership::Owned
        } else {
            Ownership::NotOwned
        }
    }
}

/// Result of one authorization query. Pure value, no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub reason: Option<ErrorKind>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: ErrorKind) -> Self {
        debug_assert!(reason.is_denial(), "{} is not a denial kind", reason.code());
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// `Ok(())` on ALLOW, the typed error on DENY
    pub fn into_result(self) -> Result<(), AppError> {
        match (self.allowed, self.reason) {
            (true, _) => Ok(()),
            (false, Some(kind)) => Err(AppError::from_kind(kind)),
            (false, None) => Err(AppError::forbidden()),
        }
    }
}

/// One query for [`crate::AuthorizationGuard::authorize_batch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub subject: Option<Subject>,
    pub permission: Permission,
    /// Target resource id; only consulted for ownership-scoped permissions
    pub resource_id: Option<String>,
}

impl AuthorizationRequest {
    pub fn new(subject: Option<Subject>, permission: Permission) -> Self {
        Self {
            subject,
            permission,
            resource_id: None,
        }
    }

    pub fn on(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }
}
