use super::classify;
use crate::error::{CloudError, CloudResult};
use crate::ports::{CreateOutcome, ObjectStore};
use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier};
use std::path::Path;

/// S3-backed object storage.
#[derive(Debug, Clone)]
pub struct AwsObjectStore {
    client: aws_sdk_s3::Client,
    region: String,
}

impl AwsObjectStore {
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig, region: &str) -> Self {
        Self { client: aws_sdk_s3::Client::new(config), region: region.to_string() }
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    async fn create_bucket(&self, bucket: &str) -> CloudResult<CreateOutcome> {
        let mut request = self.client.create_bucket().bucket(bucket);
        // us-east-1 is the one region that must not carry a location constraint.
        if self.region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(err) => {
                let classified = classify(bucket, err);
                if classified.is_already_exists() {
                    Ok(CreateOutcome::AlreadyExists)
                } else {
                    Err(classified)
                }
            }
        }
    }

    async fn bucket_exists(&self, bucket: &str) -> CloudResult<()> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                // Head responses carry no body, so the generic code-based
                // classification cannot see the 404.
                if let SdkError::ServiceError(ctx) = &err {
                    if ctx.err().is_not_found() {
                        return Err(CloudError::NotFound { resource: bucket.to_string() });
                    }
                }
                Err(classify(bucket, err))
            }
        }
    }

    async fn list_buckets(&self) -> CloudResult<Vec<String>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify("buckets", e))?;
        Ok(resp
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> CloudResult<Vec<String>> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .send()
            .await
            .map_err(|e| classify(bucket, e))?;
        Ok(resp
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> CloudResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| classify(key, e))?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify(key, e))?;
        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| CloudError::Other(format!("reading object {key}: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn upload_file(&self, path: &Path, bucket: &str, key: &str) -> CloudResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| CloudError::Other(format!("opening {}: {e}", path.display())))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| classify(key, e))?;
        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> CloudResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut objects = Vec::with_capacity(keys.len());
        for key in keys {
            let id = ObjectIdentifier::builder()
                .key(key)
                .build()
                .map_err(|e| CloudError::Other(format!("invalid object key {key}: {e}")))?;
            objects.push(id);
        }
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| CloudError::Other(format!("building delete request: {e}")))?;
        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| classify(bucket, e))?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> CloudResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| classify(bucket, e))?;
        Ok(())
    }
}
