use serde::Deserialize;

use tenancy_core::config::JwtConfig;
use tenancy_core::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub jwt: JwtConfig,
}

fn default_port() -> u16 {
    8081
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        tenancy_core::config::load()
    }
}
