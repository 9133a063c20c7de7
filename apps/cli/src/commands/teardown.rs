//! Teardown command implementation.

use super::load_config_or_exit;
use colored::Colorize;
use inquire::Confirm;
use mlforge_cloud::CloudServices;
use mlforge_deploy::TeardownOutcome;
use std::path::Path;

/// Delete the deployed resource set after a confirmation prompt.
pub async fn execute(config_path: &Path, force: bool) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path);

    let confirmed = force
        || Confirm::new("Delete all deployed training resources?")
            .with_default(false)
            .with_help_message("This removes buckets, their contents, the cluster, and monitoring")
            .prompt()
            .unwrap_or(false);

    let services = CloudServices::aws(&config.infrastructure.region).await;
    match mlforge_deploy::teardown(&services, &config, || confirmed).await {
        TeardownOutcome::Cancelled => {
            println!("{}", "Teardown cancelled, nothing deleted".yellow());
            std::process::exit(1);
        }
        TeardownOutcome::Completed(report) => {
            for resource in &report.deleted {
                println!("  {} {resource}", "✓".green());
            }
            for (resource, detail) in &report.failures {
                eprintln!("  {} {resource} {}", "✗".red(), detail.dimmed());
            }
            println!();
            if report.all_succeeded() {
                println!("{}", "Teardown complete".green().bold());
                Ok(())
            } else {
                eprintln!(
                    "{}",
                    format!("Teardown finished with {} failure(s)", report.failures.len())
                        .red()
                        .bold()
                );
                std::process::exit(1);
            }
        }
    }
}
