use super::classify;
use crate::error::CloudResult;
use crate::ports::{ClusterControl, ClusterState, CreateOutcome};
use async_trait::async_trait;

/// ECS-backed cluster control plane.
///
/// Clusters are created on Fargate Spot capacity. ECS cluster creation is
/// idempotent on the provider side; re-creating an existing cluster is
/// reported as `AlreadyExists` only when the provider says so.
#[derive(Debug, Clone)]
pub struct AwsClusterControl {
    client: aws_sdk_ecs::Client,
}

impl AwsClusterControl {
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self { client: aws_sdk_ecs::Client::new(config) }
    }
}

#[async_trait]
impl ClusterControl for AwsClusterControl {
    async fn create_cluster(&self, name: &str) -> CloudResult<CreateOutcome> {
        match self
            .client
            .create_cluster()
            .cluster_name(name)
            .capacity_providers("FARGATE_SPOT")
            .send()
            .await
        {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(err) => {
                let classified = classify(name, err);
                if classified.is_already_exists() {
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(classified)
                }
            }
        }
    }

    async fn cluster_status(&self, name: &str) -> CloudResult<Option<ClusterState>> {
        let resp = self
            .client
            .describe_clusters()
            .clusters(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        // A missing cluster comes back as an empty clusters list, not an error.
        let Some(cluster) = resp.clusters().first() else {
            return Ok(None);
        };
        let state = match cluster.status() {
            Some("ACTIVE") => ClusterState::Active,
            Some(other) => ClusterState::Other(other.to_string()),
            None => ClusterState::Other("UNKNOWN".to_string()),
        };
        Ok(Some(state))
    }

    async fn delete_cluster(&self, name: &str) -> CloudResult<()> {
        self.client
            .delete_cluster()
            .cluster(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        Ok(())
    }
}
