use mlforge_cloud::CloudError;
use mlforge_core::ConfigError;
use thiserror::Error;

pub type DeployResult<T> = std::result::Result<T, DeployError>;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}
