//! MLForge Core
//!
//! Shared foundation for the mlforge deployment and training crates:
//! - Typed deployment configuration (`DeploymentConfig`)
//! - Alert condition grammar (`AlertCondition`)
//! - Deterministic resource naming (`ResourceNames`)

pub mod alert;
pub mod config;
pub mod error;
pub mod names;

pub use alert::{AlertCondition, ComparisonOp, ThresholdUnit};
pub use config::{
    AlertSpec, DeploymentConfig, InfrastructureSection, LoggingSection, MetricSpec,
    MonitoringSection, StorageSection, TrainingSection,
};
pub use error::{ConfigError, ConfigResult};
pub use names::{alarm_name, ResourceNames, CLUSTER_NAME, DASHBOARD_NAME, METRIC_NAMESPACE};
