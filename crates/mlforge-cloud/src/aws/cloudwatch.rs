use super::classify;
use crate::error::{CloudError, CloudResult};
use crate::ports::{AlarmSpec, Monitoring};
use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{ComparisonOperator, Dimension, MetricDatum, StandardUnit, Statistic};
use mlforge_core::ComparisonOp;

/// CloudWatch-backed dashboards, alarms, and metric data.
#[derive(Debug, Clone)]
pub struct AwsMonitoring {
    client: aws_sdk_cloudwatch::Client,
}

impl AwsMonitoring {
    #[must_use]
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self { client: aws_sdk_cloudwatch::Client::new(config) }
    }
}

fn comparison_operator(op: ComparisonOp) -> ComparisonOperator {
    match op {
        ComparisonOp::Gt => ComparisonOperator::GreaterThanThreshold,
        ComparisonOp::Ge => ComparisonOperator::GreaterThanOrEqualToThreshold,
        ComparisonOp::Lt => ComparisonOperator::LessThanThreshold,
        ComparisonOp::Le => ComparisonOperator::LessThanOrEqualToThreshold,
    }
}

#[async_trait]
impl Monitoring for AwsMonitoring {
    async fn put_dashboard(&self, name: &str, body: &str) -> CloudResult<()> {
        self.client
            .put_dashboard()
            .dashboard_name(name)
            .dashboard_body(body)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        Ok(())
    }

    async fn dashboard_exists(&self, name: &str) -> CloudResult<()> {
        self.client
            .get_dashboard()
            .dashboard_name(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        Ok(())
    }

    async fn delete_dashboard(&self, name: &str) -> CloudResult<()> {
        self.client
            .delete_dashboards()
            .dashboard_names(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        Ok(())
    }

    async fn put_alarm(&self, alarm: &AlarmSpec) -> CloudResult<()> {
        self.client
            .put_metric_alarm()
            .alarm_name(&alarm.name)
            .metric_name(&alarm.metric)
            .namespace(&alarm.namespace)
            .statistic(Statistic::Average)
            .period(alarm.period_seconds as i32)
            .evaluation_periods(alarm.evaluation_periods as i32)
            .threshold(alarm.threshold)
            .comparison_operator(comparison_operator(alarm.comparison))
            .actions_enabled(true)
            .send()
            .await
            .map_err(|e| classify(&alarm.name, e))?;
        Ok(())
    }

    async fn alarm_exists(&self, name: &str) -> CloudResult<()> {
        let resp = self
            .client
            .describe_alarms()
            .alarm_names(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        if resp.metric_alarms().is_empty() {
            return Err(CloudError::NotFound { resource: name.to_string() });
        }
        Ok(())
    }

    async fn delete_alarm(&self, name: &str) -> CloudResult<()> {
        self.client
            .delete_alarms()
            .alarm_names(name)
            .send()
            .await
            .map_err(|e| classify(name, e))?;
        Ok(())
    }

    async fn publish_metric(
        &self,
        namespace: &str,
        metric: &str,
        value: f64,
        dimensions: &[(String, String)],
    ) -> CloudResult<()> {
        let mut datum = MetricDatum::builder()
            .metric_name(metric)
            .value(value)
            .unit(StandardUnit::None);
        for (name, dim_value) in dimensions {
            datum = datum.dimensions(Dimension::builder().name(name).value(dim_value).build());
        }
        self.client
            .put_metric_data()
            .namespace(namespace)
            .metric_data(datum.build())
            .send()
            .await
            .map_err(|e| classify(metric, e))?;
        Ok(())
    }

    async fn metric_exists(&self, namespace: &str, metric: &str) -> CloudResult<()> {
        let resp = self
            .client
            .list_metrics()
            .namespace(namespace)
            .metric_name(metric)
            .send()
            .await
            .map_err(|e| classify(metric, e))?;
        if resp.metrics().is_empty() {
            return Err(CloudError::NotFound {
                resource: format!("{namespace}/{metric}"),
            });
        }
        Ok(())
    }
}
