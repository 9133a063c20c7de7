//! Deployment lifecycle for the training infrastructure.
//!
//! Three entry points over the provider ports: [`provision`] brings the
//! resource set up, [`validate`] checks it read-only, [`teardown`] removes
//! it best-effort. [`seed_test_buckets`] prepares integration-test buckets.

pub mod dashboard;
pub mod error;
pub mod provision;
pub mod seed;
pub mod teardown;
pub mod validate;

pub use dashboard::{build_dashboard_body, HARDWARE_METRIC};
pub use error::{DeployError, DeployResult};
pub use provision::{alarm_spec, provision, ProvisionSummary};
pub use seed::{seed_test_buckets, TEST_CHECKPOINT_BUCKET_VAR, TEST_DATA_BUCKET_VAR};
pub use teardown::{teardown, TeardownOutcome, TeardownReport};
pub use validate::{validate, ResourceCheck, SectionReport, ValidationReport};

use mlforge_core::DeploymentConfig;
use std::path::Path;

/// Load the deployment configuration every operation in this crate runs
/// against. Wraps the load error so callers handle one error type.
pub fn load_config<P: AsRef<Path>>(path: P) -> DeployResult<DeploymentConfig> {
    Ok(DeploymentConfig::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_missing_file_is_a_config_error() {
        let err = load_config("/nonexistent/deployment.yml").unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
        assert!(err.to_string().contains("failed to read"));
    }
}
