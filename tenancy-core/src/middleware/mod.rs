pub mod auth;
pub mod request_id;
pub mod tenant;

pub use auth::{claims_middleware, require_claims_middleware};
pub use request_id::{RequestId, request_id_middleware};
pub use tenant::tenant_propagation_middleware;
