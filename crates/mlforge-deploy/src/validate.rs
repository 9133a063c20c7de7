//! Read-only deployment validation.
//!
//! Checks existence/active-state of everything the provisioner creates,
//! plus the configured metrics and log group. Never mutates remote state
//! and never retries; a transient read failure is a failed check for that
//! resource.

use mlforge_cloud::{CloudResult, CloudServices, ClusterState};
use mlforge_core::{alarm_name, DeploymentConfig, ResourceNames, METRIC_NAMESPACE};

/// One resource check: pass/fail plus "OK" or the provider's error text.
#[derive(Debug, Clone)]
pub struct ResourceCheck {
    pub resource: String,
    pub passed: bool,
    pub detail: String,
}

impl ResourceCheck {
    fn from_result(resource: &str, result: CloudResult<()>) -> Self {
        match result {
            Ok(()) => Self { resource: resource.to_string(), passed: true, detail: "OK".to_string() },
            Err(err) => Self {
                resource: resource.to_string(),
                passed: false,
                detail: err.to_string(),
            },
        }
    }
}

/// A named group of checks (buckets, cluster, dashboard, ...).
#[derive(Debug, Clone)]
pub struct SectionReport {
    pub name: String,
    pub checks: Vec<ResourceCheck>,
}

impl SectionReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }
}

/// Full validation run. Overall pass is the AND of every individual check.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub sections: Vec<SectionReport>,
}

impl ValidationReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.sections.iter().all(SectionReport::passed)
    }
}

async fn check_cluster(services: &CloudServices, name: &str) -> ResourceCheck {
    match services.clusters.cluster_status(name).await {
        Ok(Some(ClusterState::Active)) => {
            ResourceCheck { resource: name.to_string(), passed: true, detail: "ACTIVE".to_string() }
        }
        Ok(Some(ClusterState::Other(status))) => ResourceCheck {
            resource: name.to_string(),
            passed: false,
            detail: format!("NOT ACTIVE ({status})"),
        },
        Ok(None) => ResourceCheck {
            resource: name.to_string(),
            passed: false,
            detail: "NOT FOUND".to_string(),
        },
        Err(err) => {
            ResourceCheck { resource: name.to_string(), passed: false, detail: err.to_string() }
        }
    }
}

/// Validate the deployed resource set against the configuration.
pub async fn validate(services: &CloudServices, config: &DeploymentConfig) -> ValidationReport {
    let names = ResourceNames::for_config(config);
    let mut sections = Vec::new();

    let mut bucket_checks = Vec::new();
    for bucket in names.buckets() {
        let result = services.object_store.bucket_exists(bucket).await;
        bucket_checks.push(ResourceCheck::from_result(bucket, result));
    }
    sections.push(SectionReport { name: "S3 Buckets".to_string(), checks: bucket_checks });

    sections.push(SectionReport {
        name: "ECS Cluster".to_string(),
        checks: vec![check_cluster(services, &names.cluster).await],
    });

    let dashboard = services.monitoring.dashboard_exists(&names.dashboard).await;
    sections.push(SectionReport {
        name: "CloudWatch Dashboard".to_string(),
        checks: vec![ResourceCheck::from_result(&names.dashboard, dashboard)],
    });

    let mut alarm_checks = Vec::new();
    for alert in &config.monitoring.alerts {
        let name = alarm_name(&alert.metric);
        let result = services.monitoring.alarm_exists(&name).await;
        alarm_checks.push(ResourceCheck::from_result(&name, result));
    }
    sections.push(SectionReport { name: "CloudWatch Alarms".to_string(), checks: alarm_checks });

    let mut metric_checks = Vec::new();
    for metric in &config.monitoring.metrics {
        let result = services.monitoring.metric_exists(METRIC_NAMESPACE, &metric.name).await;
        metric_checks.push(ResourceCheck::from_result(&metric.name, result));
    }
    sections.push(SectionReport { name: "CloudWatch Metrics".to_string(), checks: metric_checks });

    let log_group = &config.logging.cloudwatch.log_group;
    let result = services.logs.log_group_exists(log_group).await;
    sections.push(SectionReport {
        name: "Log Group".to_string(),
        checks: vec![ResourceCheck::from_result(log_group, result)],
    });

    ValidationReport { sections }
}
