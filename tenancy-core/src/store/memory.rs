//! In-memory backend used by tests and single-node deployments.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::AppError;
use crate::store::{EntityStore, TenantScope};

/// Dashmap-backed [`EntityStore`]. Listing is ordered by creation time then
/// id so paging is stable.
#[derive(Debug, Default)]
pub struct MemoryStore<E> {
    rows: DashMap<Uuid, E>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn snapshot(&self, scope: TenantScope) -> Vec<E> {
        let mut items: Vec<E> = self
            .rows
            .iter()
            .filter(|row| scope.admits(row.value()))
            .map(|row| row.value().clone())
            .collect();
        items.sort_by_key(|e| (e.created_at(), e.id()));
        items
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn insert(&self, entity: E) -> Result<(), AppError> {
        let id = entity.id();
        if self.rows.contains_key(&id) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "entity {} already exists",
                id
            )));
        }
        self.rows.insert(id, entity);
        Ok(())
    }

    async fn replace(&self, entity: E) -> Result<(), AppError> {
        let id = entity.id();
        if !self.rows.contains_key(&id) {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "entity {} not found",
                id
            )));
        }
        self.rows.insert(id, entity);
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.remove(&id);
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<E>, AppError> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn list(&self, scope: TenantScope) -> Result<Vec<E>, AppError> {
        Ok(self.snapshot(scope))
    }

    async fn list_paged(
        &self,
        scope: TenantScope,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<E>, AppError> {
        let page = page.max(1);
        let skip = (page as usize - 1) * page_size as usize;
        Ok(self
            .snapshot(scope)
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect())
    }

    async fn count(&self, scope: TenantScope) -> Result<u64, AppError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| scope.admits(row.value()))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{TenantId, TenantOwnership};
    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone)]
    struct Note {
        id: Uuid,
        tenant_id: Option<TenantId>,
        created_at: Option<DateTime<Utc>>,
    }

    impl Note {
        fn owned_by(tenant: TenantId) -> Self {
            Self {
                id: Uuid::new_v4(),
                tenant_id: Some(tenant),
                created_at: Some(Utc::now()),
            }
        }
    }

    impl Entity for Note {
        const OWNERSHIP: TenantOwnership = TenantOwnership::Owned;

        fn id(&self) -> Uuid {
            self.id
        }

        fn tenant_id(&self) -> Option<TenantId> {
            self.tenant_id
        }

        fn assign_tenant(&mut self, tenant: TenantId) {
            self.tenant_id = Some(tenant);
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            self.created_at
        }

        fn stamp_created(&mut self, at: DateTime<Utc>) {
            if self.created_at.is_none() {
                self.created_at = Some(at);
            }
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let note = Note::owned_by(TenantId::new());
        store.insert(note.clone()).await.unwrap();
        assert!(matches!(
            store.insert(note).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn replace_requires_an_existing_row() {
        let store = MemoryStore::new();
        let note = Note::owned_by(TenantId::new());
        assert!(matches!(
            store.replace(note).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn scope_filters_rows() {
        let store = MemoryStore::new();
        let t1 = TenantId::new();
        let t2 = TenantId::new();
        store.insert(Note::owned_by(t1)).await.unwrap();
        store.insert(Note::owned_by(t1)).await.unwrap();
        store.insert(Note::owned_by(t2)).await.unwrap();

        assert_eq!(store.count(TenantScope::Tenant(t1)).await.unwrap(), 2);
        assert_eq!(store.count(TenantScope::Tenant(t2)).await.unwrap(), 1);
        assert_eq!(store.count(TenantScope::Unscoped).await.unwrap(), 3);
        assert_eq!(store.count(TenantScope::Empty).await.unwrap(), 0);
        assert!(store.list(TenantScope::Empty).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn paging_is_stable() {
        let store = MemoryStore::new();
        let tenant = TenantId::new();
        for _ in 0..5 {
            store.insert(Note::owned_by(tenant)).await.unwrap();
        }

        let scope = TenantScope::Tenant(tenant);
        let first = store.list_paged(scope, 1, 2).await.unwrap();
        let second = store.list_paged(scope, 2, 2).await.unwrap();
        let third = store.list_paged(scope, 3, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 1);

        let mut seen: Vec<Uuid> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .map(|n| n.id())
            .collect();
        seen.dedup();
        assert_eq!(seen.len(), 5);
    }
}
