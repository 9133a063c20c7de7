//! Dashboard body construction.

use mlforge_core::{DeploymentConfig, METRIC_NAMESPACE};
use serde_json::json;

/// Hardware-utilization metric that is always charted, whether or not it
/// appears in the configured metric list.
pub const HARDWARE_METRIC: &str = "GPUUtilization";

fn metric_widget(region: &str, metric: &str) -> serde_json::Value {
    json!({
        "type": "metric",
        "properties": {
            "metrics": [[METRIC_NAMESPACE, metric]],
            "period": 300,
            "stat": "Average",
            "region": region,
            "title": format!("{metric} Over Time"),
        }
    })
}

/// Build the provider's dashboard JSON document: one widget per configured
/// metric plus the fixed hardware-utilization widget.
#[must_use]
pub fn build_dashboard_body(config: &DeploymentConfig) -> String {
    let region = &config.infrastructure.region;
    let mut widgets: Vec<serde_json::Value> = config
        .monitoring
        .metrics
        .iter()
        .map(|m| metric_widget(region, &m.name))
        .collect();
    widgets.push(metric_widget(region, HARDWARE_METRIC));
    json!({ "widgets": widgets }).to_string()
}
