//! Validate command implementation.

use super::load_config_or_exit;
use colored::Colorize;
use mlforge_cloud::CloudServices;
use std::path::Path;

/// Check every deployed resource; exit 0 only if all checks pass.
pub async fn execute(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path);
    let services = CloudServices::aws(&config.infrastructure.region).await;

    println!("{}", "Validating deployment".bold().cyan());

    let report = mlforge_deploy::validate(&services, &config).await;
    let mut passed = 0usize;
    let mut failed = 0usize;

    for section in &report.sections {
        println!();
        println!("{}", section.name.bold());
        for check in &section.checks {
            if check.passed {
                passed += 1;
                print!("  {} {}", "✓".green(), check.resource);
            } else {
                failed += 1;
                print!("  {} {}", "✗".red(), check.resource);
            }
            if verbose || !check.passed {
                print!(" {}", check.detail.dimmed());
            }
            println!();
        }
    }

    println!();
    println!("{} passed, {} failed", passed.to_string().green(), failed.to_string().red());
    if report.passed() {
        println!("{}", "Deployment is healthy".green().bold());
        Ok(())
    } else {
        eprintln!("{}", "Deployment validation failed".red().bold());
        std::process::exit(1);
    }
}
