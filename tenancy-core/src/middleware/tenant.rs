//! Tenant propagation middleware.
//!
//! Runs once per inbound request, after claims verification. Invokes the
//! resolver and writes the result into a [`TenantContext`] in request
//! extensions. The request always proceeds, resolved or not: "tenant
//! required" is enforced at the repository/persistence boundary, not here.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::claims::AccessClaims;
use crate::resolver::{ResolutionSource, resolve_tenant};

pub async fn tenant_propagation_middleware(mut req: Request, next: Next) -> Response {
    let claims = req.extensions().get::<AccessClaims>().cloned();
    let resolution = resolve_tenant(claims.as_ref(), req.headers(), req.uri().query());

    match (&resolution.tenant_id, resolution.source) {
        (Some(tenant_id), source) => {
            tracing::debug!(tenant_id = %tenant_id, ?source, "tenant resolved");
        }
        (None, ResolutionSource::Unresolved) => {
            tracing::debug!("no tenant resolved for request");
        }
        _ => {}
    }

    req.extensions_mut().insert(resolution.into_context());
    next.run(req).await
}
