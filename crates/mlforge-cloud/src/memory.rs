//! In-memory provider used by tests.
//!
//! Implements every port against a shared `Mutex` state so provisioning,
//! validation, and teardown can be exercised end to end without a cloud
//! account. Supports injecting transient cluster-creation failures to
//! exercise the retry path.

use crate::error::{CloudError, CloudResult};
use crate::ports::{
    AlarmSpec, ClusterControl, ClusterState, CreateOutcome, LogGroups, Monitoring, ObjectStore,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct State {
    buckets: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    clusters: BTreeMap<String, ClusterState>,
    dashboards: BTreeMap<String, String>,
    alarms: BTreeMap<String, AlarmSpec>,
    metrics: BTreeSet<(String, String)>,
    log_groups: BTreeSet<String>,
    transient_cluster_failures: u32,
    deletions: Vec<String>,
}

/// All four ports backed by one in-memory state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCloud {
    state: Arc<Mutex<State>>,
}

impl InMemoryCloud {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        // The lock is only held across pure map operations.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make the next `n` cluster creations fail with a transient error.
    pub fn inject_transient_cluster_failures(&self, n: u32) {
        self.state().transient_cluster_failures = n;
    }

    /// Pre-create a log group so validation can find it.
    pub fn seed_log_group(&self, name: &str) {
        self.state().log_groups.insert(name.to_string());
    }

    /// Record a datapoint without going through `publish_metric`.
    pub fn seed_metric(&self, namespace: &str, metric: &str) {
        self.state().metrics.insert((namespace.to_string(), metric.to_string()));
    }

    /// Mark a cluster as something other than active.
    pub fn set_cluster_state(&self, name: &str, state: ClusterState) {
        self.state().clusters.insert(name.to_string(), state);
    }

    /// Names of resources deleted so far, in deletion order.
    #[must_use]
    pub fn deletions(&self) -> Vec<String> {
        self.state().deletions.clone()
    }

    #[must_use]
    pub fn bucket_names(&self) -> Vec<String> {
        self.state().buckets.keys().cloned().collect()
    }

    #[must_use]
    pub fn object_count(&self, bucket: &str) -> usize {
        self.state().buckets.get(bucket).map_or(0, BTreeMap::len)
    }
}

fn not_found(resource: &str) -> CloudError {
    CloudError::NotFound { resource: resource.to_string() }
}

#[async_trait]
impl ObjectStore for InMemoryCloud {
    async fn create_bucket(&self, bucket: &str) -> CloudResult<CreateOutcome> {
        let mut state = self.state();
        if state.buckets.contains_key(bucket) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        state.buckets.insert(bucket.to_string(), BTreeMap::new());
        Ok(CreateOutcome::Created)
    }

    async fn bucket_exists(&self, bucket: &str) -> CloudResult<()> {
        if self.state().buckets.contains_key(bucket) {
            Ok(())
        } else {
            Err(not_found(bucket))
        }
    }

    async fn list_buckets(&self) -> CloudResult<Vec<String>> {
        Ok(self.bucket_names())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> CloudResult<Vec<String>> {
        let state = self.state();
        let objects = state.buckets.get(bucket).ok_or_else(|| not_found(bucket))?;
        Ok(objects.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> CloudResult<()> {
        let mut state = self.state();
        let objects = state.buckets.get_mut(bucket).ok_or_else(|| not_found(bucket))?;
        objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let state = self.state();
        let objects = state.buckets.get(bucket).ok_or_else(|| not_found(bucket))?;
        objects.get(key).cloned().ok_or_else(|| not_found(key))
    }

    async fn upload_file(
        &self,
        path: &std::path::Path,
        bucket: &str,
        key: &str,
    ) -> CloudResult<()> {
        let body = std::fs::read(path)
            .map_err(|e| CloudError::Other(format!("read {}: {e}", path.display())))?;
        self.put_object(bucket, key, body).await
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> CloudResult<()> {
        let mut state = self.state();
        let objects = state.buckets.get_mut(bucket).ok_or_else(|| not_found(bucket))?;
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> CloudResult<()> {
        let mut state = self.state();
        if state.buckets.remove(bucket).is_none() {
            return Err(not_found(bucket));
        }
        state.deletions.push(format!("bucket:{bucket}"));
        Ok(())
    }
}

#[async_trait]
impl ClusterControl for InMemoryCloud {
    async fn create_cluster(&self, name: &str) -> CloudResult<CreateOutcome> {
        let mut state = self.state();
        if state.transient_cluster_failures > 0 {
            state.transient_cluster_failures -= 1;
            return Err(CloudError::Transient {
                resource: name.to_string(),
                message: "server error, please retry".to_string(),
            });
        }
        if state.clusters.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        state.clusters.insert(name.to_string(), ClusterState::Active);
        Ok(CreateOutcome::Created)
    }

    async fn cluster_status(&self, name: &str) -> CloudResult<Option<ClusterState>> {
        Ok(self.state().clusters.get(name).cloned())
    }

    async fn delete_cluster(&self, name: &str) -> CloudResult<()> {
        let mut state = self.state();
        if state.clusters.remove(name).is_none() {
            return Err(not_found(name));
        }
        state.deletions.push(format!("cluster:{name}"));
        Ok(())
    }
}

#[async_trait]
impl Monitoring for InMemoryCloud {
    async fn put_dashboard(&self, name: &str, body: &str) -> CloudResult<()> {
        self.state().dashboards.insert(name.to_string(), body.to_string());
        Ok(())
    }

    async fn dashboard_exists(&self, name: &str) -> CloudResult<()> {
        if self.state().dashboards.contains_key(name) {
            Ok(())
        } else {
            Err(not_found(name))
        }
    }

    async fn delete_dashboard(&self, name: &str) -> CloudResult<()> {
        let mut state = self.state();
        if state.dashboards.remove(name).is_none() {
            return Err(not_found(name));
        }
        state.deletions.push(format!("dashboard:{name}"));
        Ok(())
    }

    async fn put_alarm(&self, alarm: &AlarmSpec) -> CloudResult<()> {
        self.state().alarms.insert(alarm.name.clone(), alarm.clone());
        Ok(())
    }

    async fn alarm_exists(&self, name: &str) -> CloudResult<()> {
        if self.state().alarms.contains_key(name) {
            Ok(())
        } else {
            Err(not_found(name))
        }
    }

    async fn delete_alarm(&self, name: &str) -> CloudResult<()> {
        let mut state = self.state();
        if state.alarms.remove(name).is_none() {
            return Err(not_found(name));
        }
        state.deletions.push(format!("alarm:{name}"));
        Ok(())
    }

    async fn publish_metric(
        &self,
        namespace: &str,
        metric: &str,
        _value: f64,
        _dimensions: &[(String, String)],
    ) -> CloudResult<()> {
        self.seed_metric(namespace, metric);
        Ok(())
    }

    async fn metric_exists(&self, namespace: &str, metric: &str) -> CloudResult<()> {
        if self.state().metrics.contains(&(namespace.to_string(), metric.to_string())) {
            Ok(())
        } else {
            Err(not_found(&format!("{namespace}/{metric}")))
        }
    }
}

#[async_trait]
impl LogGroups for InMemoryCloud {
    async fn log_group_exists(&self, name_prefix: &str) -> CloudResult<()> {
        let state = self.state();
        if state.log_groups.iter().any(|g| g.starts_with(name_prefix)) {
            Ok(())
        } else {
            Err(not_found(name_prefix))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bucket_lifecycle() {
        let cloud = InMemoryCloud::new();
        assert_eq!(cloud.create_bucket("b").await.unwrap(), CreateOutcome::Created);
        assert_eq!(cloud.create_bucket("b").await.unwrap(), CreateOutcome::AlreadyExists);
        cloud.bucket_exists("b").await.unwrap();

        cloud.put_object("b", "train/a", vec![1]).await.unwrap();
        cloud.put_object("b", "val/b", vec![2]).await.unwrap();
        let train = cloud.list_objects("b", "train/").await.unwrap();
        assert_eq!(train, vec!["train/a".to_string()]);

        cloud.delete_objects("b", &["train/a".to_string(), "val/b".to_string()]).await.unwrap();
        cloud.delete_bucket("b").await.unwrap();
        assert!(cloud.bucket_exists("b").await.is_err());
        assert_eq!(cloud.deletions(), vec!["bucket:b".to_string()]);
    }

    #[tokio::test]
    async fn test_transient_cluster_failure_injection() {
        let cloud = InMemoryCloud::new();
        cloud.inject_transient_cluster_failures(1);
        let err = cloud.create_cluster("c").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(cloud.create_cluster("c").await.unwrap(), CreateOutcome::Created);
        assert_eq!(cloud.cluster_status("c").await.unwrap(), Some(ClusterState::Active));
    }

    #[tokio::test]
    async fn test_metric_seeding_and_lookup() {
        let cloud = InMemoryCloud::new();
        assert!(cloud.metric_exists("MLTraining", "loss").await.is_err());
        cloud.publish_metric("MLTraining", "loss", 0.5, &[]).await.unwrap();
        cloud.metric_exists("MLTraining", "loss").await.unwrap();
    }
}
