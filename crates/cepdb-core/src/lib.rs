pub mod address;
pub mod app_config;
pub mod cep;
mod config;
pub mod geo;
pub mod repository;
pub mod store;

use thiserror::Error;

pub use address::{reconcile_address, Address, PartialAddress};
pub use app_config::{AppConfig, Environment, GeocodeProviderKind};
pub use cep::is_valid_cep;
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, Coordinates};
pub use repository::{RepositoryError, StoreRepository};
pub use store::{
    AddressPatch, NewStore, OperatingInfo, OperatingInfoPatch, StorePatch, StoreRecord,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
