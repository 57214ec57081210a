//! Tenant-aware persistence context.
//!
//! A unit-of-work at the data-access boundary, below the repository. Every
//! read it serves carries the global tenant predicate, and every save stamps
//! tenant and audit fields from context, reverting any in-memory mutation of
//! an already-persisted tenant id, so no call path through it can escape
//! tenant isolation.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::context::TenantContext;
use crate::entity::Entity;
use crate::error::AppError;
use crate::repository::TenantScopedRepository;
use crate::store::{EntityStore, TenantScope};

enum Pending<E> {
    Added(E),
    Modified(E),
    Removed(E),
}

pub struct PersistenceContext<E, S> {
    store: Arc<S>,
    pending: Mutex<Vec<Pending<E>>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> PersistenceContext<E, S>
where
    E: Entity,
    S: EntityStore<E>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            pending: Mutex::new(Vec::new()),
            _entity: PhantomData,
        }
    }

    /// A scoped repository over the same backend, for callers that want the
    /// per-call enforcement surface instead of the unit-of-work.
    pub fn repository(&self) -> TenantScopedRepository<E, S> {
        TenantScopedRepository::new(Arc::clone(&self.store))
    }

    pub fn track_new(&self, entity: E) {
        self.lock_pending().push(Pending::Added(entity));
    }

    pub fn track_modified(&self, entity: E) {
        self.lock_pending().push(Pending::Modified(entity));
    }

    pub fn track_removed(&self, entity: E) {
        self.lock_pending().push(Pending::Removed(entity));
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.lock_pending().is_empty()
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<Pending<E>>> {
        // The context is request-scoped and logically single-writer; the
        // lock only guards incidental sharing, it is never held across await.
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn scope(ctx: &TenantContext) -> TenantScope {
        if E::is_owned() {
            match ctx.tenant_id() {
                Some(tenant_id) => TenantScope::Tenant(tenant_id),
                None => TenantScope::Empty,
            }
        } else {
            TenantScope::Unscoped
        }
    }

    /// Read a collection with the global tenant predicate applied. This type
    /// exposes no unscoped read.
    pub async fn query(&self, ctx: &TenantContext) -> Result<Vec<E>, AppError> {
        self.store.list(Self::scope(ctx)).await
    }

    pub async fn query_paged(
        &self,
        ctx: &TenantContext,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<E>, AppError> {
        self.store.list_paged(Self::scope(ctx), page, page_size).await
    }

    pub async fn query_count(&self, ctx: &TenantContext) -> Result<u64, AppError> {
        self.store.count(Self::scope(ctx)).await
    }

    pub async fn find(&self, ctx: &TenantContext, id: Uuid) -> Result<Option<E>, AppError> {
        match self.store.fetch(id).await? {
            Some(entity) if E::is_owned() && entity.tenant_id() != ctx.tenant_id() => Ok(None),
            other => Ok(other),
        }
    }

    /// Flush pending changes. All changes are validated against the current
    /// context before the first write is issued; a validation failure restores
    /// the queue intact and leaves the store untouched.
    ///
    /// A backend failure mid-flush keeps the rows already written and
    /// re-queues the failing change together with the unapplied remainder, so
    /// no queued change is ever silently dropped.
    ///
    /// Returns the number of rows written.
    pub async fn save_changes(&self, ctx: &TenantContext) -> Result<u64, AppError> {
        let pending = std::mem::take(&mut *self.lock_pending());
        if pending.is_empty() {
            return Ok(0);
        }

        if let Err(err) = self.validate(ctx, &pending).await {
            self.restore_queue(pending);
            return Err(err);
        }

        let now = Utc::now();
        let mut queue: VecDeque<Pending<E>> = pending.into();
        let mut written = 0u64;

        while let Some(change) = queue.pop_front() {
            if let Err(err) = self.apply_one(ctx, &change, now).await {
                queue.push_front(change);
                self.restore_queue(queue.into_iter().collect());
                return Err(err);
            }
            written += 1;
        }

        Ok(written)
    }

    /// Put changes back at the front of the queue, ahead of anything tracked
    /// while the flush was in flight.
    fn restore_queue(&self, pending: Vec<Pending<E>>) {
        let mut queue = self.lock_pending();
        let trailing: Vec<Pending<E>> = queue.drain(..).collect();
        *queue = pending;
        queue.extend(trailing);
    }

    async fn validate(&self, ctx: &TenantContext, pending: &[Pending<E>]) -> Result<(), AppError> {
        if !E::is_owned() {
            return Ok(());
        }
        for change in pending {
            match change {
                Pending::Added(_) => {
                    ctx.require_tenant()?;
                }
                Pending::Modified(entity) => {
                    self.check_persisted_owner(ctx, entity, "update").await?;
                }
                Pending::Removed(entity) => {
                    self.check_persisted_owner(ctx, entity, "delete").await?;
                }
            }
        }
        Ok(())
    }

    async fn check_persisted_owner(
        &self,
        ctx: &TenantContext,
        entity: &E,
        op: &'static str,
    ) -> Result<(), AppError> {
        let current = ctx.require_tenant()?;
        if let Some(persisted) = self.store.fetch(entity.id()).await? {
            if persisted.tenant_id() != Some(current) {
                return Err(AppError::CrossTenantAccess(op));
            }
        }
        Ok(())
    }

    async fn apply_one(
        &self,
        ctx: &TenantContext,
        change: &Pending<E>,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        match change {
            Pending::Added(entity) => {
                let mut entity = entity.clone();
                if E::is_owned() {
                    entity.assign_tenant(ctx.require_tenant()?);
                }
                entity.stamp_created(now);
                self.store.insert(entity).await
            }
            Pending::Modified(entity) => {
                let mut entity = entity.clone();
                if E::is_owned() {
                    // The persisted tenant id always wins over an in-memory
                    // mutation of this field.
                    if let Some(persisted) = self.store.fetch(entity.id()).await? {
                        if let Some(owner) = persisted.tenant_id() {
                            entity.assign_tenant(owner);
                        }
                    }
                }
                entity.stamp_modified(now);
                self.store.replace(entity).await
            }
            Pending::Removed(entity) => self.store.remove(entity.id()).await,
        }
    }
}
