//! AWS adapters for the provider ports.
//!
//! All SDK-specific code lives under this module; everything else in the
//! workspace talks to the ports. Errors are classified into the
//! `CloudError` taxonomy by provider error code.

mod cloudwatch;
mod ecs;
mod logs;
mod s3;

pub use cloudwatch::AwsMonitoring;
pub use ecs::AwsClusterControl;
pub use logs::AwsLogGroups;
pub use s3::AwsObjectStore;

use crate::error::CloudError;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Build an AWS SDK configuration for the given region.
pub async fn sdk_config(region: &str) -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await
}

/// Map an SDK error onto the `CloudError` taxonomy by its error code.
pub(crate) fn classify<E>(resource: &str, err: SdkError<E>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let code = err.code().unwrap_or_default().to_string();
    let message = err
        .message()
        .map_or_else(|| format!("{}", DisplayErrorContext(&err)), str::to_string);
    let resource = resource.to_string();

    match code.as_str() {
        "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "ResourceAlreadyExistsException" => {
            CloudError::AlreadyExists { resource }
        }
        "NoSuchBucket" | "NotFound" | "ResourceNotFound" | "ResourceNotFoundException"
        | "ClusterNotFoundException" => CloudError::NotFound { resource },
        "ServerException" | "InternalError" | "InternalFailure" | "ServiceUnavailable"
        | "ServiceUnavailableException" | "Throttling" | "ThrottlingException"
        | "RequestLimitExceeded" | "SlowDown" => CloudError::Transient { resource, message },
        "" => CloudError::Provider { resource, code: "unknown".to_string(), message },
        _ => CloudError::Provider { resource, code, message },
    }
}
