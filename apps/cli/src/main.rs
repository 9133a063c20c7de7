//! mlforge CLI - deployment lifecycle for the ML training infrastructure.
//!
//! Provides a `mlforge` command for provisioning, validating, and tearing
//! down the training resource set, plus test-resource seeding.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// mlforge - ML training infrastructure management
#[derive(Parser, Debug)]
#[command(
    name = "mlforge",
    author,
    version,
    about = "Provision, validate, and tear down ML training infrastructure"
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision the training resource set
    ///
    /// Creates the data, checkpoint, and log buckets, the container
    /// cluster, the metrics dashboard, and one alarm per configured alert.
    /// Safe to re-run; existing resources are left alone.
    Deploy {
        /// Path to the deployment configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Check every deployed resource and report pass/fail
    Validate {
        /// Path to the deployment configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Show the provider detail for each check
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete the training resource set
    ///
    /// Asks for confirmation first; deletions are best-effort, so one
    /// failure does not stop the rest.
    Teardown {
        /// Path to the deployment configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Create the integration-test buckets named by TEST_DATA_BUCKET and
    /// TEST_CHECKPOINT_BUCKET, with placeholder training objects
    SetupTestResources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber =
        FmtSubscriber::builder().with_max_level(level).without_time().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Deploy { config } => commands::deploy::execute(&config).await,
        Command::Validate { config, verbose } => commands::validate::execute(&config, verbose).await,
        Command::Teardown { config, force } => commands::teardown::execute(&config, force).await,
        Command::SetupTestResources => commands::setup::execute().await,
    }
}
