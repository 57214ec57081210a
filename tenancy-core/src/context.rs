//! Request-scoped tenant context.
//!
//! One `TenantContext` exists per inbound request, created empty, populated
//! at most once by the propagation middleware, and read many times for the
//! rest of the request. It travels in request extensions and by value into
//! any fan-out work, never through a process-wide mutable slot, so
//! concurrent requests cannot observe each other's tenant.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::entity::TenantId;
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct TenantContext {
    tenant_id: Option<TenantId>,
    tenant_name: Option<String>,
}

impl TenantContext {
    /// An empty context: no tenant resolved. Tenant-scoped mutations against
    /// it fail with [`AppError::UnresolvedTenant`].
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn resolved(tenant_id: TenantId, tenant_name: Option<String>) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            tenant_name,
        }
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn tenant_name(&self) -> Option<&str> {
        self.tenant_name.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.tenant_id.is_some()
    }

    /// Get the resolved tenant or fail as an authorization error.
    pub fn require_tenant(&self) -> Result<TenantId, AppError> {
        self.tenant_id.ok_or(AppError::UnresolvedTenant)
    }
}

/// Extractor for handlers. A request that went through the propagation
/// middleware always carries a context; absent one (e.g. a route mounted
/// without the middleware) the handler sees an empty context and the
/// enforcement layers fail closed.
#[axum::async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_no_tenant() {
        let ctx = TenantContext::empty();
        assert!(!ctx.is_resolved());
        assert!(ctx.tenant_id().is_none());
        assert!(matches!(
            ctx.require_tenant(),
            Err(AppError::UnresolvedTenant)
        ));
    }

    #[test]
    fn resolved_context_yields_tenant() {
        let tenant = TenantId::new();
        let ctx = TenantContext::resolved(tenant, Some("Acme".to_string()));
        assert!(ctx.is_resolved());
        assert_eq!(ctx.require_tenant().unwrap(), tenant);
        assert_eq!(ctx.tenant_name(), Some("Acme"));
    }

    #[test]
    fn clones_share_the_same_tenant_value() {
        // Fan-out inherits the resolved tenant by value, not by re-resolving.
        let ctx = TenantContext::resolved(TenantId::new(), None);
        let inherited = ctx.clone();
        assert_eq!(inherited.tenant_id(), ctx.tenant_id());
    }
}
