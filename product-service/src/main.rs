use product_service::{AppState, app, config::ProductConfig};
use tenancy_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ProductConfig::load()?;
    init_tracing("product-service", &config.log_level);

    let port = config.port;
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "product-service listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
