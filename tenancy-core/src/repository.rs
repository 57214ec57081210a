//! Tenant-scoped repository.
//!
//! Wraps a plain [`EntityStore`] and enforces tenant boundaries transparently
//! for callers. Every call takes the request's [`TenantContext`] explicitly
//! and is evaluated independently against it; there is no state machine and
//! no hidden global. Cross-tenant administration must go through an unscoped
//! backend deliberately, never through this wrapper.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::context::TenantContext;
use crate::entity::{Entity, TenantOwnership};
use crate::error::AppError;
use crate::store::{EntityStore, TenantScope};

pub struct TenantScopedRepository<E, S> {
    store: Arc<S>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for TenantScopedRepository<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E, S> TenantScopedRepository<E, S>
where
    E: Entity,
    S: EntityStore<E>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn read_scope(&self, ctx: &TenantContext) -> TenantScope {
        match E::OWNERSHIP {
            TenantOwnership::Shared => TenantScope::Unscoped,
            TenantOwnership::Owned => match ctx.tenant_id() {
                Some(tenant_id) => TenantScope::Tenant(tenant_id),
                // Unresolved context sees nothing, not everything.
                None => TenantScope::Empty,
            },
        }
    }

    /// Guard a mutation of an existing entity: the entity must belong to the
    /// current tenant, both as passed in and as persisted.
    async fn check_owner(
        &self,
        ctx: &TenantContext,
        entity: &E,
        op: &'static str,
    ) -> Result<(), AppError> {
        let current = ctx.require_tenant()?;
        if entity.tenant_id() != Some(current) {
            return Err(AppError::CrossTenantAccess(op));
        }
        // The persisted row is authoritative; an in-memory tenant mutation
        // must not smuggle a row across the boundary.
        if let Some(persisted) = self.store.fetch(entity.id()).await? {
            if persisted.tenant_id() != Some(current) {
                return Err(AppError::CrossTenantAccess(op));
            }
        }
        Ok(())
    }

    /// Create an entity. Tenant-owned entities are stamped with the current
    /// tenant; with no tenant resolved the call fails and nothing persists.
    pub async fn add(&self, ctx: &TenantContext, mut entity: E) -> Result<E, AppError> {
        if E::is_owned() {
            let tenant = ctx.require_tenant()?;
            entity.assign_tenant(tenant);
        }
        entity.stamp_created(Utc::now());
        self.store.insert(entity.clone()).await?;
        Ok(entity)
    }

    /// Fetch by id. A tenant-owned entity belonging to another tenant is
    /// reported as absent; existence is never revealed across the boundary.
    pub async fn get_by_id(&self, ctx: &TenantContext, id: Uuid) -> Result<Option<E>, AppError> {
        match self.store.fetch(id).await? {
            Some(entity) if E::is_owned() && entity.tenant_id() != ctx.tenant_id() => Ok(None),
            other => Ok(other),
        }
    }

    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<E>, AppError> {
        self.store.list(self.read_scope(ctx)).await
    }

    pub async fn list_paged(
        &self,
        ctx: &TenantContext,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<E>, AppError> {
        self.store
            .list_paged(self.read_scope(ctx), page, page_size)
            .await
    }

    pub async fn count(&self, ctx: &TenantContext) -> Result<u64, AppError> {
        self.store.count(self.read_scope(ctx)).await
    }

    /// Update an entity within the current tenant. Cross-tenant updates are
    /// rejected outright, never downgraded to "not found".
    pub async fn update(&self, ctx: &TenantContext, mut entity: E) -> Result<E, AppError> {
        if E::is_owned() {
            self.check_owner(ctx, &entity, "update").await?;
        }
        entity.stamp_modified(Utc::now());
        self.store.replace(entity.clone()).await?;
        Ok(entity)
    }

    /// Delete an entity within the current tenant. Same boundary check as
    /// [`Self::update`].
    pub async fn delete(&self, ctx: &TenantContext, entity: E) -> Result<(), AppError> {
        if E::is_owned() {
            self.check_owner(ctx, &entity, "delete").await?;
        }
        self.store.remove(entity.id()).await
    }
}
