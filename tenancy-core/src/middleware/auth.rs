//! Bearer-token claims middleware.
//!
//! Verifies the `Authorization: Bearer` token when one is present and stashes
//! the typed [`AccessClaims`] in request extensions for the tenant resolver
//! and handlers. Anonymous requests and rejected tokens pass through without
//! claims; endpoints that need a principal enforce it downstream.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::claims::{AccessClaims, TokenVerifier};
use crate::error::AppError;

pub async fn claims_middleware(
    State(verifier): State<TokenVerifier>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    if let Some(token) = token {
        match verifier.verify(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(err) => {
                // An invalid token downgrades the request to anonymous; the
                // header/query fallbacks may still name a tenant.
                tracing::debug!(error = %err, "bearer token rejected");
            }
        }
    }

    next.run(req).await
}

/// Strict variant for routes that require an authenticated principal.
/// Mounted after [`claims_middleware`]; rejects requests that carry no
/// verified claims.
pub async fn require_claims_middleware(req: Request, next: Next) -> Response {
    if req.extensions().get::<AccessClaims>().is_none() {
        return AppError::Unauthorized(anyhow::anyhow!("authentication required")).into_response();
    }
    next.run(req).await
}
