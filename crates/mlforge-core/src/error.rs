use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or interpreting a deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
