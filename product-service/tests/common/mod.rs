//! Test helpers for product-service integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use product_service::{AppState, app, config::ProductConfig};
use tenancy_core::claims::AccessClaims;
use tenancy_core::config::JwtConfig;

pub const TEST_JWT_SECRET: &str = "product-service-test-secret";

/// Test application with a running HTTP server on an ephemeral port.
pub struct TestApp {
    pub address: String,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = ProductConfig {
            port: 0,
            log_level: "warn".to_string(),
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let state = AppState::new(config);
        let router = app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server error");
        });

        Self { address, state }
    }

    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::new()
    }
}

/// Mint an access token carrying a `tenant_id` claim.
pub fn token_for_tenant(tenant_id: &str) -> String {
    mint_token(Some(tenant_id.to_string()), None)
}

pub fn token_without_tenant() -> String {
    mint_token(None, None)
}

pub fn mint_token(tenant_id: Option<String>, tenant_name: Option<String>) -> String {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: "user-1".to_string(),
        tenant_id,
        tenant_name,
        exp: (now + Duration::minutes(10)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to mint test token")
}
