//! Setup-test-resources command implementation.

use colored::Colorize;
use mlforge_cloud::CloudServices;
use mlforge_deploy::{TEST_CHECKPOINT_BUCKET_VAR, TEST_DATA_BUCKET_VAR};

const DEFAULT_REGION: &str = "us-east-1";

fn required_var(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            eprintln!("{} {}", "✗".red(), format!("{name} must be set").red());
            std::process::exit(1);
        }
    }
}

/// Create the integration-test buckets and placeholder objects.
pub async fn execute() -> anyhow::Result<()> {
    let data_bucket = required_var(TEST_DATA_BUCKET_VAR);
    let checkpoint_bucket = required_var(TEST_CHECKPOINT_BUCKET_VAR);
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());

    let services = CloudServices::aws(&region).await;
    match mlforge_deploy::seed_test_buckets(
        services.object_store.as_ref(),
        &data_bucket,
        &checkpoint_bucket,
    )
    .await
    {
        Ok(()) => {
            println!("  {} bucket {data_bucket} with placeholder objects", "✓".green());
            println!("  {} bucket {checkpoint_bucket}", "✓".green());
            println!("{}", "Test resources ready".green().bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} {}", "✗".red(), format!("setup failed: {e}").red());
            std::process::exit(1);
        }
    }
}
