//! Tenant identity and persisted-entity capabilities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque tenant identifier. Immutable once assigned to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A supplied identifier (claim, header, or query param) failed to parse.
/// Resolution treats this as "absent"; it is never surfaced to a caller.
#[derive(Debug, Clone, Error)]
#[error("malformed tenant identifier: {0}")]
pub struct MalformedTenantId(pub String);

impl FromStr for TenantId {
    type Err = MalformedTenantId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Uuid::parse_str(trimmed)
            .map(TenantId)
            .map_err(|_| MalformedTenantId(trimmed.to_string()))
    }
}

/// How an entity type participates in tenant isolation. Resolved once at the
/// data-model layer via [`Entity::OWNERSHIP`], never by per-call inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantOwnership {
    /// Visible to every tenant; no filter or stamping applies.
    Shared,
    /// Carries a tenant id set exactly once at creation; all access is
    /// filtered by the current tenant.
    Owned,
}

/// Capability surface of a persisted record.
///
/// Tenant-owned types override [`Entity::OWNERSHIP`] and the tenant
/// accessors; audited types override the stamp methods. The defaults make
/// both capabilities opt-in while keeping a single generic data path.
pub trait Entity: Clone + Send + Sync + 'static {
    const OWNERSHIP: TenantOwnership = TenantOwnership::Shared;

    fn id(&self) -> Uuid;

    /// Owning tenant, if stamped. Shared entity types always return `None`.
    fn tenant_id(&self) -> Option<TenantId> {
        None
    }

    /// Stamp the owning tenant. Called by the scoped layers at creation;
    /// the persisted value wins over any later in-memory mutation.
    fn assign_tenant(&mut self, _tenant: TenantId) {}

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Record the creation instant. Implementations must keep the first
    /// stamp; later calls are ignored.
    fn stamp_created(&mut self, _at: DateTime<Utc>) {}

    /// Refresh the last-modified instant.
    fn stamp_modified(&mut self, _at: DateTime<Utc>) {}

    fn is_owned() -> bool {
        matches!(Self::OWNERSHIP, TenantOwnership::Owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_id_parses_uuid() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let id: TenantId = raw.parse().expect("valid uuid should parse");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn tenant_id_trims_whitespace() {
        let raw = "  550e8400-e29b-41d4-a716-446655440000 ";
        assert!(raw.parse::<TenantId>().is_ok());
    }

    #[test]
    fn malformed_tenant_id_is_an_error() {
        assert!("not-a-uuid".parse::<TenantId>().is_err());
        assert!("".parse::<TenantId>().is_err());
    }

    #[test]
    fn tenant_id_serde_is_transparent() {
        let id = TenantId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
