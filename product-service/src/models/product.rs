//! Product entity - tenant-owned and audited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tenancy_core::entity::{Entity, TenantId, TenantOwnership};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price: f64,
    /// Owning tenant. Stamped once by the scoped layers at creation and
    /// never settable through the API.
    pub tenant_id: Option<TenantId>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(name: String, code: String, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            code,
            price,
            tenant_id: None,
            created_at: None,
            last_modified_at: None,
        }
    }

    /// Apply an update from the API. Tenant and audit fields are untouched;
    /// those belong to the scoped layers.
    pub fn apply_update(&mut self, name: String, code: String, price: f64) {
        self.name = name;
        self.code = code;
        self.price = price;
    }
}

impl Entity for Product {
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

    fn stamp_modified(&mut self, at: DateTime<Utc>) {
        self.last_modified_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_is_set_exactly_once() {
        let mut product = Product::new("Widget".into(), "WID-1".into(), 9.99);
        let first = Utc::now();
        product.stamp_created(first);
        product.stamp_created(first + chrono::Duration::hours(1));
        assert_eq!(product.created_at, Some(first));
    }

    #[test]
    fn apply_update_leaves_tenant_untouched() {
        let mut product = Product::new("Widget".into(), "WID-1".into(), 9.99);
        let tenant = TenantId::new();
        product.assign_tenant(tenant);
        product.apply_update("Gadget".into(), "GAD-1".into(), 19.99);
        assert_eq!(product.tenant_id, Some(tenant));
        assert_eq!(product.name, "Gadget");
    }
}
