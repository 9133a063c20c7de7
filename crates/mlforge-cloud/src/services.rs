//! Dependency-injection bundle for the provider ports.

use crate::aws::{sdk_config, AwsClusterControl, AwsLogGroups, AwsMonitoring, AwsObjectStore};
use crate::memory::InMemoryCloud;
use crate::ports::{ClusterControl, LogGroups, Monitoring, ObjectStore};
use std::sync::Arc;

/// One handle per port, constructed once and passed into each operation.
#[derive(Clone)]
pub struct CloudServices {
    pub object_store: Arc<dyn ObjectStore>,
    pub clusters: Arc<dyn ClusterControl>,
    pub monitoring: Arc<dyn Monitoring>,
    pub logs: Arc<dyn LogGroups>,
}

impl CloudServices {
    /// Connect the AWS adapters for the given region.
    pub async fn aws(region: &str) -> Self {
        let config = sdk_config(region).await;
        Self {
            object_store: Arc::new(AwsObjectStore::new(&config, region)),
            clusters: Arc::new(AwsClusterControl::new(&config)),
            monitoring: Arc::new(AwsMonitoring::new(&config)),
            logs: Arc::new(AwsLogGroups::new(&config)),
        }
    }

    /// All ports backed by one shared in-memory provider.
    #[must_use]
    pub fn in_memory(cloud: &InMemoryCloud) -> Self {
        Self {
            object_store: Arc::new(cloud.clone()),
            clusters: Arc::new(cloud.clone()),
            monitoring: Arc::new(cloud.clone()),
            logs: Arc::new(cloud.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CreateOutcome;

    #[tokio::test]
    async fn test_in_memory_services_share_state() {
        let cloud = InMemoryCloud::new();
        let services = CloudServices::in_memory(&cloud);
        assert_eq!(
            services.object_store.create_bucket("b").await.unwrap(),
            CreateOutcome::Created
        );
        assert_eq!(cloud.bucket_names(), vec!["b".to_string()]);
    }
}
