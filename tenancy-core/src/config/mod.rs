//! Configuration loading shared by the services.
//!
//! Each service defines its own typed config struct and deserializes it via
//! [`load`], which layers an optional `configuration` file under
//! `APP__`-prefixed environment variables.

use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Settings for verifying inbound bearer tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// HS256 shared secret used to verify access tokens.
    pub secret: String,
}

/// Load a service configuration from file + environment.
pub fn load<T: DeserializeOwned>() -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
