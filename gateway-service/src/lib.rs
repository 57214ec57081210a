pub mod config;
pub mod proxy;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use tenancy_core::claims::TokenVerifier;
use tenancy_core::middleware::{
    claims_middleware, request_id_middleware, tenant_propagation_middleware,
};

use crate::config::{GatewayConfig, RouteConfig};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub routes: Arc<Vec<RouteConfig>>,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            routes: Arc::new(config.routes.clone()),
        }
    }
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(json!({ "status": "healthy" }))
}

/// Build the gateway router: a health endpoint and a catch-all proxy, with
/// the same claims + tenant middleware stack the services run.
pub fn app(config: &GatewayConfig) -> Router {
    let verifier = TokenVerifier::new(&config.jwt);
    let state = AppState::new(config);

    Router::new()
        .route("/health", get(health_check))
        .fallback(proxy::forward)
        .layer(from_fn(tenant_propagation_middleware))
        .layer(from_fn_with_state(verifier, claims_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
