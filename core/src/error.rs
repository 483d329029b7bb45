use crate::{
    config::ConfigError, gateway::GatewayError, tools::schema::SchemaError, tools::RegistryError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
