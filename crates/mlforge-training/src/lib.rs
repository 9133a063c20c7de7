//! Training wrapper: device selection, optional data-parallel mode,
//! object-store-backed data loading, checkpoint upload, and best-effort
//! metric publication.

pub mod dataset;
pub mod distributed;
pub mod error;
pub mod metrics;
pub mod trainer;

pub use dataset::{data_loaders, EmptyPolicy, ObjectStoreDataset};
pub use distributed::{CollectiveBackend, DistributedContext};
pub use error::{TrainError, TrainResult};
pub use metrics::MetricsPublisher;
pub use trainer::DistributedTrainer;
