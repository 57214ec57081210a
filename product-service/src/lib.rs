pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use tenancy_core::claims::TokenVerifier;
use tenancy_core::middleware::{
    claims_middleware, request_id_middleware, tenant_propagation_middleware,
};
use tenancy_core::repository::TenantScopedRepository;
use tenancy_core::store::MemoryStore;

use crate::config::ProductConfig;
use crate::handlers::health_check;
use crate::handlers::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use crate::models::Product;

#[derive(Clone)]
pub struct AppState {
    pub config: ProductConfig,
    /// Unscoped backend. Handlers use it only to load rows for mutations;
    /// every tenant decision goes through the scoped repository.
    pub store: Arc<MemoryStore<Product>>,
    pub products: TenantScopedRepository<Product, MemoryStore<Product>>,
}

impl AppState {
    pub fn new(config: ProductConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            config,
            products: TenantScopedRepository::new(Arc::clone(&store)),
            store,
        }
    }
}

/// Build the product-service router.
///
/// Layer order per request: request-id, claims verification, tenant
/// propagation, then the handler.
pub fn app(state: AppState) -> Router {
    let verifier = TokenVerifier::new(&state.config.jwt);

    Router::new()
        .route("/health", get(health_check))
        .route("/products", post(create_product).get(list_products))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(from_fn(tenant_propagation_middleware))
        .layer(from_fn_with_state(verifier, claims_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
