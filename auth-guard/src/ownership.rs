use crate::{error::*, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Ownership lookup supplied by the persistence collaborator.
///
/// Implementations must read the current owner on every call. The guard keeps
/// no cache, so an ownership transfer takes effect on the next request.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// Owning subject id of `kind`/`id`, or [`OwnershipError::NotFound`]
    async fn resolve_owner(&self, kind: ResourceKind, id: &str) -> Result<String>;
}

/// Adapts a plain lookup function into an [`OwnershipResolver`]
pub struct FnOwnershipResolver<F> {
    lookup: F,
}

impl<F> FnOwnershipResolver<F>
where
    F: Fn(ResourceKind, &str) -> Result<String> + Send + Sync,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl<F> OwnershipResolver for FnOwnershipResolver<F>
where
    F: Fn(ResourceKind, &str) -> Result<String> + Send + Sync,
{
    async fn resolve_owner(&self, kind: ResourceKind, id: &str) -> Result<String> {
        (self.lookup)(kind, id)
    }
}

/// In-memory owner table for testing and development
#[derive(Clone, Default)]
pub struct InMemoryOwnershipStore {
    owners: Arc<DashMap<ResourceKey, String>>,
}

impl InMemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource: ResourceRef) {
        self.owners
            .insert(ResourceKey::new(resource.kind, resource.id), resource.owner_id);
    }

    /// Hand a resource to a new owner. Returns the previous owner if the resource existed.
    pub fn transfer(&self, key: &ResourceKey, new_owner: impl Into<String>) -> Option<String> {
        self.owners
            .get_mut(key)
            .map(|mut owner| std::mem::replace(owner.value_mut(), new_owner.into()))
    }

    pub fn remove(&self, key: &ResourceKey) -> Option<String> {
        self.owners.remove(key).map(|(_, owner)| owner)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[async_trait]
impl OwnershipResolver for InMemoryOwnershipStore {
    async fn resolve_owner(&self, kind: ResourceKind, id: &str) -> Result<String> {
        let key = ResourceKey::new(kind, id);
        match self.owners.get(&key) {
            Some(owner) => Ok(owner.value().clone()),
            None => Err(OwnershipError::NotFound(key)),
        }
    }
}
