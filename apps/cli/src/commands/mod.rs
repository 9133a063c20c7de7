//! Command implementations.

pub mod deploy;
pub mod setup;
pub mod teardown;
pub mod validate;

use colored::Colorize;
use mlforge_core::DeploymentConfig;
use std::path::Path;

/// Load the configuration or exit with a readable message. Runs before any
/// provider client is constructed.
pub fn load_config_or_exit(path: &Path) -> DeploymentConfig {
    match mlforge_deploy::load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), format!("configuration error: {e}").red());
            std::process::exit(1);
        }
    }
}
