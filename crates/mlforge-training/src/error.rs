use mlforge_cloud::CloudError;
use thiserror::Error;

pub type TrainResult<T> = std::result::Result<T, TrainError>;

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Tensor(#[from] candle_core::Error),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset error: {0}")]
    Dataset(String),
}
