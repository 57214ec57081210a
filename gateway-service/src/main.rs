use gateway_service::{app, config::GatewayConfig};
use tenancy_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = GatewayConfig::load()?;
    init_tracing("gateway-service", &config.log_level);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, routes = config.routes.len(), "gateway listening");
    axum::serve(listener, app(&config)).await?;

    Ok(())
}
