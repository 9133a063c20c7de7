//! Training-metric publication.
//!
//! Publishing is strictly best-effort: a monitoring outage must never take
//! down a training run, so failures are logged and swallowed.

use mlforge_cloud::Monitoring;
use mlforge_core::METRIC_NAMESPACE;
use std::sync::Arc;

pub struct MetricsPublisher {
    monitoring: Arc<dyn Monitoring>,
    namespace: String,
}

impl MetricsPublisher {
    #[must_use]
    pub fn new(monitoring: Arc<dyn Monitoring>) -> Self {
        Self::with_namespace(monitoring, METRIC_NAMESPACE)
    }

    #[must_use]
    pub fn with_namespace(monitoring: Arc<dyn Monitoring>, namespace: &str) -> Self {
        Self { monitoring, namespace: namespace.to_string() }
    }

    /// Publish one datapoint. Never fails.
    pub async fn publish(&self, metric: &str, value: f64, dimensions: &[(String, String)]) {
        if let Err(err) =
            self.monitoring.publish_metric(&self.namespace, metric, value, dimensions).await
        {
            tracing::warn!("failed to publish {metric}={value}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlforge_cloud::InMemoryCloud;

    #[tokio::test]
    async fn test_publish_records_datapoint() {
        let cloud = Arc::new(InMemoryCloud::new());
        let publisher = MetricsPublisher::new(Arc::clone(&cloud) as Arc<dyn Monitoring>);
        publisher.publish("loss", 0.42, &[]).await;
        cloud.metric_exists("MLTraining", "loss").await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_namespace() {
        let cloud = Arc::new(InMemoryCloud::new());
        let publisher =
            MetricsPublisher::with_namespace(Arc::clone(&cloud) as Arc<dyn Monitoring>, "Custom");
        publisher.publish("accuracy", 91.0, &[("rank".to_string(), "0".to_string())]).await;
        cloud.metric_exists("Custom", "accuracy").await.unwrap();
    }
}
