//! Provider ports.
//!
//! Every operation against the managed cloud goes through one of these
//! traits. Construct the backing clients once and pass them in; tests use
//! the in-memory implementation instead of patching globals.

use crate::error::CloudResult;
use async_trait::async_trait;
use mlforge_core::ComparisonOp;

/// Outcome of a "create if absent" call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Container cluster lifecycle state, as reported by a describe call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterState {
    Active,
    Other(String),
}

/// A provider-native alarm record, derived from a parsed alert definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmSpec {
    pub name: String,
    pub metric: String,
    pub namespace: String,
    pub comparison: ComparisonOp,
    pub threshold: f64,
    /// Evaluation window in seconds.
    pub period_seconds: u32,
    /// Number of consecutive periods the condition must hold.
    pub evaluation_periods: u32,
}

/// Object storage: buckets and the objects inside them.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_bucket(&self, bucket: &str) -> CloudResult<CreateOutcome>;

    /// Head call; `Ok(())` means the bucket exists and is accessible.
    async fn bucket_exists(&self, bucket: &str) -> CloudResult<()>;

    async fn list_buckets(&self) -> CloudResult<Vec<String>>;

    async fn list_objects(&self, bucket: &str, prefix: &str) -> CloudResult<Vec<String>>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> CloudResult<()>;

    async fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>>;

    async fn upload_file(
        &self,
        path: &std::path::Path,
        bucket: &str,
        key: &str,
    ) -> CloudResult<()>;

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> CloudResult<()>;

    async fn delete_bucket(&self, bucket: &str) -> CloudResult<()>;
}

/// Container cluster control plane.
#[async_trait]
pub trait ClusterControl: Send + Sync {
    async fn create_cluster(&self, name: &str) -> CloudResult<CreateOutcome>;

    /// `None` when the cluster does not exist.
    async fn cluster_status(&self, name: &str) -> CloudResult<Option<ClusterState>>;

    async fn delete_cluster(&self, name: &str) -> CloudResult<()>;
}

/// Dashboards, alarms, and metric data.
#[async_trait]
pub trait Monitoring: Send + Sync {
    /// `body` is the provider's dashboard JSON document.
    async fn put_dashboard(&self, name: &str, body: &str) -> CloudResult<()>;

    async fn dashboard_exists(&self, name: &str) -> CloudResult<()>;

    async fn delete_dashboard(&self, name: &str) -> CloudResult<()>;

    async fn put_alarm(&self, alarm: &AlarmSpec) -> CloudResult<()>;

    async fn alarm_exists(&self, name: &str) -> CloudResult<()>;

    async fn delete_alarm(&self, name: &str) -> CloudResult<()>;

    async fn publish_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: f64,
        dimensions: &[(String, String)],
    ) -> CloudResult<()>;

    /// Whether any datapoint has been recorded for the metric.
    async fn metric_exists(&self, namespace: &str, metric: &str) -> CloudResult<()>;
}

/// Log group lookups.
#[async_trait]
pub trait LogGroups: Send + Sync {
    async fn log_group_exists(&self, name_prefix: &str) -> CloudResult<()>;
}
