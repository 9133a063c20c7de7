//! Deployment configuration.
//!
//! The configuration file is YAML with four required sections:
//! `infrastructure`, `training`, `monitoring`, and `logging`. A missing
//! section fails the load immediately. The file is read once per invocation
//! and the resulting value is immutable for the process lifetime.

use crate::alert::AlertCondition;
use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;

/// Root deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    pub infrastructure: InfrastructureSection,
    pub training: TrainingSection,
    pub monitoring: MonitoringSection,
    pub logging: LoggingSection,
}

impl DeploymentConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a required section is
    /// missing, or an alert condition string does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.infrastructure.region.trim().is_empty() {
            return Err(ConfigError::Invalid("infrastructure.region is empty".to_string()));
        }
        if self.infrastructure.storage.s3_bucket_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "infrastructure.storage.s3_bucket_prefix is empty".to_string(),
            ));
        }
        if self.logging.cloudwatch.log_group.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.cloudwatch.log_group is empty".to_string()));
        }
        Ok(())
    }
}

/// `infrastructure` section: where resources live.
#[derive(Debug, Clone, Deserialize)]
pub struct InfrastructureSection {
    pub region: String,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    pub s3_bucket_prefix: String,
}

/// `training` section: hyperparameters for the training wrapper.
///
/// Unused by the provisioning core, but required to be present so a
/// deployment and the training run it serves share one file.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingSection {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_optimizer")]
    pub optimizer: String,
    /// Bucket override for checkpoints; defaults to `<prefix>-checkpoints`.
    #[serde(default)]
    pub checkpoint_bucket: Option<String>,
    /// Bucket override for training data; defaults to `<prefix>-data`.
    #[serde(default)]
    pub data_bucket: Option<String>,
}

fn default_batch_size() -> usize {
    32
}

fn default_learning_rate() -> f64 {
    0.001
}

fn default_epochs() -> u32 {
    10
}

fn default_num_workers() -> usize {
    4
}

fn default_model_name() -> String {
    "resnet50".to_string()
}

fn default_optimizer() -> String {
    "sgd".to_string()
}

impl Default for TrainingSection {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
            num_workers: default_num_workers(),
            model_name: default_model_name(),
            optimizer: default_optimizer(),
            checkpoint_bucket: None,
            data_bucket: None,
        }
    }
}

/// `monitoring` section: dashboard metrics and alarm definitions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitoringSection {
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub alerts: Vec<AlertSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricSpec {
    pub name: String,
}

/// A threshold alarm on a named metric.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertSpec {
    pub metric: String,
    /// Decoded at load time; `"> 90%"`, `"<= 10"`, etc.
    pub condition: AlertCondition,
    /// Evaluation window in seconds. Defaults to 300 when absent.
    #[serde(default)]
    pub window: Option<u32>,
}

/// `logging` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    pub cloudwatch: CloudwatchLogging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudwatchLogging {
    pub log_group: String,
}
