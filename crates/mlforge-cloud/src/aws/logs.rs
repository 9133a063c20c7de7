use super::classify;
use crate::error::{CloudError, CloudResult};
use crate::ports::LogGroups;
use async_trait::async_trait;

/// CloudWatch Logs-backed log group lookups.
#[derive(Debug, Clone)]
pub struct AwsLogGroups {
    client: aws_sdk_cloudwatchlogs::Client,
}

impl AwsLogGroups {
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self { client: aws_sdk_cloudwatchlogs::Client::new(config) }
    }
}

#[async_trait]
impl LogGroups for AwsLogGroups {
    async fn log_group_exists(&self, name_prefix: &str) -> CloudResult<()> {
        let resp = self
            .client
            .describe_log_groups()
            .log_group_name_prefix(name_prefix)
            .send()
            .await
            .map_err(|e| classify(name_prefix, e))?;
        if resp.log_groups().is_empty() {
            return Err(CloudError::NotFound { resource: name_prefix.to_string() });
        }
        Ok(())
    }
}
