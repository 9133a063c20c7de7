//! Deploy command implementation.

use super::load_config_or_exit;
use colored::Colorize;
use mlforge_cloud::{CloudServices, RetryPolicy};
use std::path::Path;

/// Provision the full resource set described by the configuration.
pub async fn execute(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path);
    let services = CloudServices::aws(&config.infrastructure.region).await;

    println!("{}", "Deploying ML training infrastructure".bold().cyan());
    println!();

    match mlforge_deploy::provision(&services, &config, &RetryPolicy::default()).await {
        Ok(summary) => {
            for resource in &summary.created {
                println!("  {} {resource}", "✓".green());
            }
            for resource in &summary.already_existed {
                println!("  {} {resource} {}", "✓".green(), "(already existed)".dimmed());
            }
            println!();
            println!("{}", "Deployment complete".green().bold());
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} {}", "✗".red(), format!("deployment failed: {e}").red());
            std::process::exit(1);
        }
    }
}
