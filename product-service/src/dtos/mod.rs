//! Request/response types for the product API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tenancy_core::entity::TenantId;

use crate::models::Product;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub code: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price: f64,
    pub tenant_id: Option<TenantId>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            code: p.code,
            price: p.price,
            tenant_id: p.tenant_id,
            created_at: p.created_at,
            last_modified_at: p.last_modified_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<ProductResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}
