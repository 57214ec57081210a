//! Outbound tenant propagation for gateway-forwarded requests.
//!
//! When a gateway relays a request to an internal service, the tenant it
//! resolved is re-injected as `X-Tenant-ID` on the outbound message so the
//! receiving service's own middleware resolves independently. Tenant
//! identity is never implicitly trusted from a single layer.

use axum::http::{HeaderMap, HeaderValue};

use crate::context::TenantContext;
use crate::resolver::TENANT_ID_HEADER;

/// Stamp the resolved tenant onto an outbound header map, overwriting any
/// value the caller supplied. With no tenant resolved the inbound header is
/// stripped, so a malformed or spoofed value never travels further.
pub fn inject_tenant_header(ctx: &TenantContext, headers: &mut HeaderMap) {
    headers.remove(TENANT_ID_HEADER);

    if let Some(tenant_id) = ctx.tenant_id() {
        if let Ok(value) = HeaderValue::from_str(&tenant_id.to_string()) {
            headers.insert(TENANT_ID_HEADER, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TenantId;

    const T1: &str = "11111111-1111-1111-1111-111111111111";
    const T2: &str = "22222222-2222-2222-2222-222222222222";

    #[test]
    fn resolved_tenant_overwrites_inbound_header() {
        let ctx = TenantContext::resolved(T1.parse::<TenantId>().unwrap(), None);
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_ID_HEADER, HeaderValue::from_static(T2));

        inject_tenant_header(&ctx, &mut headers);

        assert_eq!(headers.get(TENANT_ID_HEADER).unwrap(), T1);
        assert_eq!(headers.get_all(TENANT_ID_HEADER).iter().count(), 1);
    }

    #[test]
    fn unresolved_context_strips_the_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_ID_HEADER, HeaderValue::from_static(T2));

        inject_tenant_header(&TenantContext::empty(), &mut headers);

        assert!(headers.get(TENANT_ID_HEADER).is_none());
    }
}
