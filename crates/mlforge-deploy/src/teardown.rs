//! Best-effort resource teardown.
//!
//! Deletes everything the provisioner creates, one resource at a time.
//! A failed deletion is recorded and the remaining resources are still
//! attempted; the caller decides how loudly to complain.

use mlforge_cloud::{CloudResult, CloudServices};
use mlforge_core::{alarm_name, DeploymentConfig, ResourceNames};

/// What teardown deleted and what it could not.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub deleted: Vec<String>,
    /// Resource name paired with the provider's error text.
    pub failures: Vec<(String, String)>,
}

impl TeardownReport {
    fn record(&mut self, resource: &str, result: CloudResult<()>) {
        match result {
            Ok(()) => {
                tracing::info!("deleted {resource}");
                self.deleted.push(resource.to_string());
            }
            Err(err) => {
                tracing::warn!("failed to delete {resource}: {err}");
                self.failures.push((resource.to_string(), err.to_string()));
            }
        }
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a teardown request, confirmation included.
#[derive(Debug)]
pub enum TeardownOutcome {
    /// The confirmation callback declined; nothing was touched.
    Cancelled,
    Completed(TeardownReport),
}

async fn empty_and_delete_bucket(services: &CloudServices, bucket: &str) -> CloudResult<()> {
    let keys = services.object_store.list_objects(bucket, "").await?;
    if !keys.is_empty() {
        services.object_store.delete_objects(bucket, &keys).await?;
    }
    services.object_store.delete_bucket(bucket).await
}

/// Tear down the deployment's resource set.
///
/// `confirm` runs before anything is deleted; returning false cancels the
/// whole operation. Pass `|| true` when the caller has already confirmed.
pub async fn teardown(
    services: &CloudServices,
    config: &DeploymentConfig,
    confirm: impl FnOnce() -> bool,
) -> TeardownOutcome {
    if !confirm() {
        tracing::info!("teardown cancelled");
        return TeardownOutcome::Cancelled;
    }

    let names = ResourceNames::for_config(config);
    let mut report = TeardownReport::default();

    for bucket in names.buckets() {
        let result = empty_and_delete_bucket(services, bucket).await;
        report.record(&format!("bucket {bucket}"), result);
    }

    let result = services.clusters.delete_cluster(&names.cluster).await;
    report.record(&format!("cluster {}", names.cluster), result);

    let result = services.monitoring.delete_dashboard(&names.dashboard).await;
    report.record(&format!("dashboard {}", names.dashboard), result);

    for alert in &config.monitoring.alerts {
        let name = alarm_name(&alert.metric);
        let result = services.monitoring.delete_alarm(&name).await;
        report.record(&format!("alarm {name}"), result);
    }

    TeardownOutcome::Completed(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::provision;
    use mlforge_cloud::{ClusterControl, InMemoryCloud, ObjectStore, RetryPolicy};
    use std::time::Duration;

    fn config() -> DeploymentConfig {
        serde_yaml::from_str(
            r"
infrastructure:
  region: us-east-1
  storage:
    s3_bucket_prefix: ml-pipeline
training: {}
monitoring:
  metrics:
    - name: loss
  alerts:
    - metric: loss
      condition: '> 90%'
logging:
  cloudwatch:
    log_group: /ml/train
",
        )
        .unwrap()
    }

    async fn provisioned_cloud() -> (InMemoryCloud, CloudServices) {
        let cloud = InMemoryCloud::new();
        let services = CloudServices::in_memory(&cloud);
        provision(&services, &config(), &RetryPolicy::new(1, Duration::from_millis(1), false))
            .await
            .unwrap();
        (cloud, services)
    }

    #[tokio::test]
    async fn test_teardown_deletes_everything() {
        let (cloud, services) = provisioned_cloud().await;
        cloud.put_object("ml-pipeline-data", "train/x", vec![1]).await.unwrap();

        let outcome = teardown(&services, &config(), || true).await;
        let TeardownOutcome::Completed(report) = outcome else {
            panic!("expected completion");
        };
        assert!(report.all_succeeded(), "failures: {:?}", report.failures);
        assert_eq!(report.deleted.len(), 6);
        assert!(cloud.bucket_names().is_empty());
        assert_eq!(
            cloud.deletions(),
            vec![
                "bucket:ml-pipeline-data".to_string(),
                "bucket:ml-pipeline-checkpoints".to_string(),
                "bucket:ml-pipeline-logs".to_string(),
                "cluster:ml-training-cluster".to_string(),
                "dashboard:MLTrainingDashboard".to_string(),
                "alarm:MLTraining_loss".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_declined_confirmation_deletes_nothing() {
        let (cloud, services) = provisioned_cloud().await;
        let outcome = teardown(&services, &config(), || false).await;
        assert!(matches!(outcome, TeardownOutcome::Cancelled));
        assert!(cloud.deletions().is_empty());
        assert_eq!(cloud.bucket_names().len(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_rest() {
        let (cloud, services) = provisioned_cloud().await;
        // Remove the cluster out of band so its deletion fails.
        cloud.delete_cluster("ml-training-cluster").await.unwrap();

        let TeardownOutcome::Completed(report) = teardown(&services, &config(), || true).await
        else {
            panic!("expected completion");
        };
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].0.contains("cluster"));
        // Everything after the cluster was still deleted.
        assert!(cloud.deletions().iter().any(|d| d == "dashboard:MLTrainingDashboard"));
        assert!(cloud.deletions().iter().any(|d| d == "alarm:MLTraining_loss"));
    }
}
