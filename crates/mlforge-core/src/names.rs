//! Deterministic resource naming.
//!
//! Every external resource name is derived from the configured bucket
//! prefix or is a fixed literal. Re-running provisioning against the same
//! configuration always targets the same names, which is what makes the
//! whole flow idempotent without any state tracking.

use crate::config::DeploymentConfig;

/// Fixed container cluster name.
pub const CLUSTER_NAME: &str = "ml-training-cluster";

/// Fixed metrics dashboard name.
pub const DASHBOARD_NAME: &str = "MLTrainingDashboard";

/// Namespace under which training metrics and alarms live.
pub const METRIC_NAMESPACE: &str = "MLTraining";

/// The full set of resource names for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub data_bucket: String,
    pub checkpoint_bucket: String,
    pub log_bucket: String,
    pub cluster: String,
    pub dashboard: String,
}

impl ResourceNames {
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Self {
        Self {
            data_bucket: format!("{prefix}-data"),
            checkpoint_bucket: format!("{prefix}-checkpoints"),
            log_bucket: format!("{prefix}-logs"),
            cluster: CLUSTER_NAME.to_string(),
            dashboard: DASHBOARD_NAME.to_string(),
        }
    }

    #[must_use]
    pub fn for_config(config: &DeploymentConfig) -> Self {
        Self::from_prefix(&config.infrastructure.storage.s3_bucket_prefix)
    }

    /// The three buckets in creation order: data, checkpoints, logs.
    #[must_use]
    pub fn buckets(&self) -> [&str; 3] {
        [&self.data_bucket, &self.checkpoint_bucket, &self.log_bucket]
    }
}

/// Alarm name for a configured metric: `MLTraining_<metric>`.
#[must_use]
pub fn alarm_name(metric: &str) -> String {
    format!("{METRIC_NAMESPACE}_{metric}")
}
