//! Test-resource seeding.
//!
//! Creates the integration-test buckets and drops placeholder objects into
//! the data bucket so the data-loading path has something to list.

use crate::error::DeployResult;
use mlforge_cloud::{CreateOutcome, ObjectStore};

/// Environment variable naming the test data bucket.
pub const TEST_DATA_BUCKET_VAR: &str = "TEST_DATA_BUCKET";

/// Environment variable naming the test checkpoint bucket.
pub const TEST_CHECKPOINT_BUCKET_VAR: &str = "TEST_CHECKPOINT_BUCKET";

const PLACEHOLDER_KEYS: [&str; 2] = ["train/class_0/dummy1.jpg", "val/class_0/dummy1.jpg"];

/// Create both test buckets and upload the placeholder objects.
///
/// Buckets that already exist are fine; the placeholder uploads overwrite
/// whatever was there.
pub async fn seed_test_buckets(
    store: &dyn ObjectStore,
    data_bucket: &str,
    checkpoint_bucket: &str,
) -> DeployResult<()> {
    for bucket in [data_bucket, checkpoint_bucket] {
        match store.create_bucket(bucket).await? {
            CreateOutcome::Created => tracing::info!("created bucket {bucket}"),
            CreateOutcome::AlreadyExists => tracing::info!("bucket {bucket} already exists"),
        }
    }

    for key in PLACEHOLDER_KEYS {
        store.put_object(data_bucket, key, b"dummy data".to_vec()).await?;
        tracing::info!("uploaded {data_bucket}/{key}");
    }

    Ok(())
}
