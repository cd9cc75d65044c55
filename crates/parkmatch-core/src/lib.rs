pub mod app_config;
pub mod config;
pub mod criteria;
pub mod locations;
pub mod providers;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use criteria::{load_criteria, parse_criteria, MatchCriteria};
pub use locations::{
    Address, Coordinates, LocationRecord, MatchedLocation, Pricing, Provider, RecordKey,
};
pub use providers::{load_providers, ConnectorKind, ProviderConfig, ProvidersFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read providers file {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse providers file: {0}")]
    ProvidersFileParse(#[source] serde_yaml::Error),

    #[error("failed to read criteria file {path}: {source}")]
    CriteriaFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse criteria file: {0}")]
    CriteriaFileParse(#[source] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
