//! Resource provisioner.
//!
//! Brings the full resource set into existence: three buckets, the
//! container cluster, the metrics dashboard, and one alarm per configured
//! alert. "Already exists" is success; any other provider error aborts the
//! remaining steps. There is no rollback of resources created before a
//! failure; re-running against the same configuration is safe because all
//! names are deterministic.

use crate::dashboard::build_dashboard_body;
use crate::error::DeployResult;
use mlforge_cloud::{AlarmSpec, CloudServices, CreateOutcome, RetryPolicy};
use mlforge_core::{alarm_name, DeploymentConfig, ResourceNames, METRIC_NAMESPACE};

/// Default alarm evaluation window when an alert has none configured.
pub const DEFAULT_ALARM_PERIOD_SECONDS: u32 = 300;

/// Consecutive periods the condition must hold before an alarm fires.
pub const ALARM_EVALUATION_PERIODS: u32 = 2;

/// What provisioning did, resource by resource.
#[derive(Debug, Default)]
pub struct ProvisionSummary {
    pub created: Vec<String>,
    pub already_existed: Vec<String>,
}

impl ProvisionSummary {
    fn record(&mut self, resource: &str, outcome: CreateOutcome) {
        match outcome {
            CreateOutcome::Created => {
                tracing::info!("created {resource}");
                self.created.push(resource.to_string());
            }
            CreateOutcome::AlreadyExists => {
                tracing::info!("{resource} already exists");
                self.already_existed.push(resource.to_string());
            }
        }
    }

    fn record_upsert(&mut self, resource: &str) {
        tracing::info!("put {resource}");
        self.created.push(resource.to_string());
    }
}

/// Build the alarm record for one configured alert.
#[must_use]
pub fn alarm_spec(metric: &str, condition: mlforge_core::AlertCondition, window: Option<u32>) -> AlarmSpec {
    AlarmSpec {
        name: alarm_name(metric),
        metric: metric.to_string(),
        namespace: METRIC_NAMESPACE.to_string(),
        comparison: condition.operator,
        threshold: condition.threshold,
        period_seconds: window.unwrap_or(DEFAULT_ALARM_PERIOD_SECONDS),
        evaluation_periods: ALARM_EVALUATION_PERIODS,
    }
}

/// Provision the deployment's resource set.
///
/// Cluster creation is retried through `retry` on transient provider
/// errors; every other call gets exactly one attempt.
pub async fn provision(
    services: &CloudServices,
    config: &DeploymentConfig,
    retry: &RetryPolicy,
) -> DeployResult<ProvisionSummary> {
    let names = ResourceNames::for_config(config);
    let mut summary = ProvisionSummary::default();

    for bucket in names.buckets() {
        let outcome = services.object_store.create_bucket(bucket).await?;
        summary.record(&format!("bucket {bucket}"), outcome);
    }

    let outcome = retry
        .run("create cluster", || services.clusters.create_cluster(&names.cluster))
        .await?;
    summary.record(&format!("cluster {}", names.cluster), outcome);

    let body = build_dashboard_body(config);
    services.monitoring.put_dashboard(&names.dashboard, &body).await?;
    summary.record_upsert(&format!("dashboard {}", names.dashboard));

    for alert in &config.monitoring.alerts {
        let spec = alarm_spec(&alert.metric, alert.condition, alert.window);
        services.monitoring.put_alarm(&spec).await?;
        summary.record_upsert(&format!("alarm {}", spec.name));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlforge_cloud::{ClusterControl, ClusterState, InMemoryCloud, Monitoring};
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
    - metric: accuracy
      condition: '< 10'
      window: 600
logging:
  cloudwatch:
    log_group: /ml/train
",
        )
        .unwrap()
    }

    fn quick_retry() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1), false)
    }

    #[tokio::test]
    async fn test_provision_creates_full_resource_set() {
        let cloud = InMemoryCloud::new();
        let services = CloudServices::in_memory(&cloud);
        let summary = provision(&services, &config(), &quick_retry()).await.unwrap();

        assert_eq!(
            cloud.bucket_names(),
            vec![
                "ml-pipeline-checkpoints".to_string(),
                "ml-pipeline-data".to_string(),
                "ml-pipeline-logs".to_string(),
            ]
        );
        assert_eq!(
            cloud.cluster_status("ml-training-cluster").await.unwrap(),
            Some(ClusterState::Active)
        );
        cloud.dashboard_exists("MLTrainingDashboard").await.unwrap();
        cloud.alarm_exists("MLTraining_loss").await.unwrap();
        cloud.alarm_exists("MLTraining_accuracy").await.unwrap();
        assert!(summary.already_existed.is_empty());
    }

    #[tokio::test]
    async fn test_provision_twice_is_idempotent() {
        let cloud = InMemoryCloud::new();
        let services = CloudServices::in_memory(&cloud);
        provision(&services, &config(), &quick_retry()).await.unwrap();
        let second = provision(&services, &config(), &quick_retry()).await.unwrap();

        // Buckets and cluster report already-exists the second time around.
        assert_eq!(second.already_existed.len(), 4);
    }

    #[tokio::test]
    async fn test_cluster_creation_retries_transient_errors() {
        let cloud = InMemoryCloud::new();
        cloud.inject_transient_cluster_failures(2);
        let services = CloudServices::in_memory(&cloud);
        provision(&services, &config(), &quick_retry()).await.unwrap();
        assert_eq!(
            cloud.cluster_status("ml-training-cluster").await.unwrap(),
            Some(ClusterState::Active)
        );
    }

    #[tokio::test]
    async fn test_cluster_retries_exhausted_aborts_remaining_steps() {
        let cloud = InMemoryCloud::new();
        cloud.inject_transient_cluster_failures(10);
        let services = CloudServices::in_memory(&cloud);
        let err = provision(&services, &config(), &quick_retry()).await.unwrap_err();
        assert!(err.to_string().contains("transient"));
        // Buckets were created before the abort; dashboard was not reached.
        assert_eq!(cloud.bucket_names().len(), 3);
        assert!(cloud.dashboard_exists("MLTrainingDashboard").await.is_err());
    }

    #[test]
    fn test_alarm_spec_from_condition() {
        let condition: mlforge_core::AlertCondition = "> 90%".parse().unwrap();
        let spec = alarm_spec("loss", condition, None);
        assert_eq!(spec.name, "MLTraining_loss");
        assert_eq!(spec.namespace, "MLTraining");
        assert!((spec.threshold - 90.0).abs() < f64::EPSILON);
        assert_eq!(spec.period_seconds, 300);
        assert_eq!(spec.evaluation_periods, 2);

        let condition: mlforge_core::AlertCondition = "< 10".parse().unwrap();
        let spec = alarm_spec("accuracy", condition, Some(600));
        assert_eq!(spec.period_seconds, 600);
        assert_eq!(spec.comparison, mlforge_core::ComparisonOp::Lt);
    }
}
