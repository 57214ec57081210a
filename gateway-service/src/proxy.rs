//! Request forwarding with tenant re-injection.
//!
//! The gateway resolves the tenant from its own middleware stack and stamps
//! `X-Tenant-ID` on the outbound request, overwriting whatever the caller
//! sent. The downstream service re-resolves via its own middleware; no hop
//! trusts another's headers blindly.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    response::Response,
};

use tenancy_core::context::TenantContext;
use tenancy_core::error::AppError;
use tenancy_core::forward::inject_tenant_header;

use crate::AppState;

/// Cap on buffered request/response bodies.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub async fn forward(
    State(state): State<AppState>,
    ctx: TenantContext,
    req: Request,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();
    let route = state
        .routes
        .iter()
        .find(|route| path.starts_with(&route.prefix))
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("no route for {}", path)))?;

    let stripped = path.strip_prefix(&route.prefix).unwrap_or("");
    let mut url = format!("{}{}", route.upstream, stripped);
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let (parts, body) = req.into_parts();
    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("request body error: {}", e)))?;

    let mut headers = parts.headers.clone();
    headers.remove(header::HOST);
    inject_tenant_header(&ctx, &mut headers);

    tracing::debug!(upstream = %url, tenant = ?ctx.tenant_id(), "forwarding request");

    let upstream_response = state
        .client
        .request(parts.method, &url)
        .headers(headers)
        .body(body_bytes)
        .send()
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    let status = upstream_response.status();
    let response_headers = upstream_response.headers().clone();
    let response_bytes = upstream_response
        .bytes()
        .await
        .map_err(|e| AppError::BadGateway(e.to_string()))?;

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(response_bytes))
        .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

    for (name, value) in response_headers.iter() {
        // Hop-by-hop headers stay on the hop.
        if name == &header::TRANSFER_ENCODING || name == &header::CONNECTION {
            continue;
        }
        response.headers_mut().append(name, value.clone());
    }

    Ok(response)
}
