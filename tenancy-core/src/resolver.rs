//! Tenant resolution for one inbound request.
//!
//! Resolution is pure and deterministic: given the same claims, headers, and
//! query string it always produces the same result, and it performs no I/O.
//! Failures never abort the request; they yield "unresolved" and the
//! enforcement layers fail closed later.

use axum::http::HeaderMap;

use crate::claims::AccessClaims;
use crate::context::TenantContext;
use crate::entity::TenantId;

/// Claim type carrying the tenant id on an authenticated principal.
pub const TENANT_CLAIM: &str = "tenant_id";

/// Fallback (and forwarded) tenant header.
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Fallback tenant query parameter, for anonymous/bootstrap endpoints.
pub const TENANT_QUERY_PARAM: &str = "tenantId";

/// Where the tenant id was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Claim,
    QueryParam,
    Header,
    Unresolved,
}

/// Outcome of resolving one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tenant_id: Option<TenantId>,
    pub tenant_name: Option<String>,
    pub source: ResolutionSource,
}

impl Resolution {
    fn unresolved() -> Self {
        Self {
            tenant_id: None,
            tenant_name: None,
            source: ResolutionSource::Unresolved,
        }
    }

    pub fn into_context(self) -> TenantContext {
        match self.tenant_id {
            Some(id) => TenantContext::resolved(id, self.tenant_name),
            None => TenantContext::empty(),
        }
    }
}

/// Resolve the tenant for one inbound request.
///
/// Order, first match wins:
/// 1. The `tenant_id` claim on an authenticated principal. An authenticated
///    claim always wins over header/query; a malformed claim value is treated
///    as absent and resolution falls through.
/// 2. The `tenantId` query parameter, then the `X-Tenant-ID` header. These
///    exist so anonymous/bootstrap endpoints (login, registration) can name
///    the tenant to operate against.
/// 3. Unresolved.
pub fn resolve_tenant(
    claims: Option<&AccessClaims>,
    headers: &HeaderMap,
    raw_query: Option<&str>,
) -> Resolution {
    if let Some(claims) = claims {
        if let Some(raw) = claims.tenant_id.as_deref() {
            match raw.parse::<TenantId>() {
                Ok(tenant_id) => {
                    return Resolution {
                        tenant_id: Some(tenant_id),
                        tenant_name: claims.tenant_name.clone(),
                        source: ResolutionSource::Claim,
                    };
                }
                Err(err) => {
                    tracing::debug!(error = %err, "tenant claim malformed, falling through");
                }
            }
        }
    }

    if let Some(raw) = raw_query.and_then(|q| query_param(q, TENANT_QUERY_PARAM)) {
        if let Ok(tenant_id) = raw.parse::<TenantId>() {
            return Resolution {
                tenant_id: Some(tenant_id),
                tenant_name: None,
                source: ResolutionSource::QueryParam,
            };
        }
        tracing::debug!("tenant query parameter malformed, falling through");
    }

    if let Some(raw) = headers.get(TENANT_ID_HEADER).and_then(|v| v.to_str().ok()) {
        if let Ok(tenant_id) = raw.parse::<TenantId>() {
            return Resolution {
                tenant_id: Some(tenant_id),
                tenant_name: None,
                source: ResolutionSource::Header,
            };
        }
        tracing::debug!("tenant header malformed, treating as absent");
    }

    Resolution::unresolved()
}

fn query_param(raw_query: &str, name: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(raw_query)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const T1: &str = "11111111-1111-1111-1111-111111111111";
    const T2: &str = "22222222-2222-2222-2222-222222222222";

    fn claims(tenant_id: Option<&str>, tenant_name: Option<&str>) -> AccessClaims {
        AccessClaims {
            sub: "user-1".to_string(),
            tenant_id: tenant_id.map(str::to_string),
            tenant_name: tenant_name.map(str::to_string),
            exp: 0,
            iat: 0,
        }
    }

    fn headers_with_tenant(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TENANT_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn claim_resolves_first() {
        let claims = claims(Some(T1), Some("Acme"));
        let resolution = resolve_tenant(Some(&claims), &HeaderMap::new(), None);
        assert_eq!(resolution.source, ResolutionSource::Claim);
        assert_eq!(resolution.tenant_id.unwrap().to_string(), T1);
        assert_eq!(resolution.tenant_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn claim_wins_over_header_and_query() {
        let claims = claims(Some(T1), None);
        let headers = headers_with_tenant(T2);
        let query = format!("{}={}", TENANT_QUERY_PARAM, T2);
        let resolution = resolve_tenant(Some(&claims), &headers, Some(&query));
        assert_eq!(resolution.source, ResolutionSource::Claim);
        assert_eq!(resolution.tenant_id.unwrap().to_string(), T1);
    }

    #[test]
    fn malformed_claim_falls_through_to_header() {
        let claims = claims(Some("not-a-uuid"), None);
        let headers = headers_with_tenant(T2);
        let resolution = resolve_tenant(Some(&claims), &headers, None);
        assert_eq!(resolution.source, ResolutionSource::Header);
        assert_eq!(resolution.tenant_id.unwrap().to_string(), T2);
    }

    #[test]
    fn query_param_is_consulted_before_header() {
        let headers = headers_with_tenant(T2);
        let query = format!("{}={}", TENANT_QUERY_PARAM, T1);
        let resolution = resolve_tenant(None, &headers, Some(&query));
        assert_eq!(resolution.source, ResolutionSource::QueryParam);
        assert_eq!(resolution.tenant_id.unwrap().to_string(), T1);
    }

    #[test]
    fn header_resolves_for_anonymous_requests() {
        let headers = headers_with_tenant(T1);
        let resolution = resolve_tenant(None, &headers, None);
        assert_eq!(resolution.source, ResolutionSource::Header);
    }

    #[test]
    fn nothing_present_is_unresolved() {
        let resolution = resolve_tenant(None, &HeaderMap::new(), None);
        assert_eq!(resolution.source, ResolutionSource::Unresolved);
        assert!(resolution.tenant_id.is_none());
        assert!(!resolution.into_context().is_resolved());
    }

    #[test]
    fn malformed_everything_is_unresolved_not_an_error() {
        let claims = claims(Some("bad"), None);
        let headers = headers_with_tenant("also-bad");
        let query = format!("{}=worse", TENANT_QUERY_PARAM);
        let resolution = resolve_tenant(Some(&claims), &headers, Some(&query));
        assert_eq!(resolution.source, ResolutionSource::Unresolved);
    }

    #[test]
    fn resolution_is_deterministic() {
        // Re-entering the resolver with the same inputs yields the same id.
        let claims = claims(Some(T1), None);
        let first = resolve_tenant(Some(&claims), &HeaderMap::new(), None);
        let second = resolve_tenant(Some(&claims), &HeaderMap::new(), None);
        assert_eq!(first.tenant_id, second.tenant_id);
        assert_eq!(first.source, second.source);
    }
}
