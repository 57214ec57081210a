use serde::Deserialize;

use tenancy_core::config::JwtConfig;
use tenancy_core::error::AppError;

/// One forwarding rule: requests whose path starts with `prefix` are relayed
/// to `upstream` with the prefix stripped.
#[derive(Debug, Deserialize, Clone)]
pub struct RouteConfig {
    pub prefix: String,
    pub upstream: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        tenancy_core::config::load()
    }
}
