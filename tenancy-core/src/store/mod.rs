//! Plain data-access backends wrapped by the tenant-scoped layers.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entity::{Entity, TenantId};
use crate::error::AppError;

/// Tenant pre-filter pushed down to a backend, the moral equivalent of
/// `WHERE tenant_id = :current` injected into generated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// No tenant filter. Used for shared (non-tenant-owned) entity types.
    Unscoped,
    /// Only rows owned by the given tenant.
    Tenant(TenantId),
    /// Matches nothing. Produced when a tenant-owned collection is queried
    /// with no tenant resolved in context.
    Empty,
}

impl TenantScope {
    pub fn admits<E: Entity>(&self, entity: &E) -> bool {
        match self {
            TenantScope::Unscoped => true,
            TenantScope::Tenant(tenant_id) => entity.tenant_id() == Some(*tenant_id),
            TenantScope::Empty => false,
        }
    }
}

/// A plain data-access backend: rows keyed by id, with a tenant scope the
/// caller supplies on reads. The backend applies no tenancy policy of its
/// own; stamping and boundary checks live in the layers above.
///
/// Cancellation propagates from the caller's request: every method is
/// cooperative at its `.await` points and performs no retry of its own.
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync + 'static {
    /// Insert a new row. Fails with a conflict if the id already exists.
    async fn insert(&self, entity: E) -> Result<(), AppError>;

    /// Replace an existing row in full.
    async fn replace(&self, entity: E) -> Result<(), AppError>;

    /// Remove a row. Removing an absent id is a no-op.
    async fn remove(&self, id: Uuid) -> Result<(), AppError>;

    /// Fetch a row by id, unscoped.
    async fn fetch(&self, id: Uuid) -> Result<Option<E>, AppError>;

    async fn list(&self, scope: TenantScope) -> Result<Vec<E>, AppError>;

    /// Page numbers are 1-based.
    async fn list_paged(
        &self,
        scope: TenantScope,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<E>, AppError>;

    async fn count(&self, scope: TenantScope) -> Result<u64, AppError>;
}
