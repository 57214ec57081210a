//! tenancy-core: Shared multi-tenancy infrastructure.
//!
//! Resolves a tenant identity from bearer-token claims (with header/query
//! fallbacks), propagates it through the request lifecycle, and enforces
//! tenant-scoped row visibility and mutation rights at the data-access
//! boundary.

pub mod claims;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod forward;
pub mod middleware;
pub mod observability;
pub mod persistence;
pub mod repository;
pub mod resolver;
pub mod store;

pub use async_trait;
pub use axum;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower;
pub use tower_http;
pub use tracing;
pub use uuid;
pub use validator;
