//! Integration tests for the `mlforge` command surface.
//!
//! These exercise argument parsing and configuration loading only; nothing
//! here talks to a cloud provider.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join("deployment.yml");
    fs::write(&path, contents).unwrap();
    path
}

const BAD_CONDITION_CONFIG: &str = r"
infrastructure:
  region: us-east-1
  storage:
    s3_bucket_prefix: ml-pipeline
training: {}
monitoring:
  metrics:
    - name: loss
  alerts:
    - metric: loss
      condition: '= 90'
logging:
  cloudwatch:
    log_group: /ml/train
";

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("teardown"))
        .stdout(predicate::str::contains("setup-test-resources"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("--version").assert().success();
}

#[test]
fn test_deploy_requires_config_argument() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("deploy").assert().failure().stderr(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_file_fails_before_any_provider_call() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("deploy")
        .arg("--config")
        .arg("/nonexistent/deployment.yml")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_invalid_alert_condition_fails_load() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, BAD_CONDITION_CONFIG);

    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("validate")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn test_setup_test_resources_requires_env_vars() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.env_remove("TEST_DATA_BUCKET")
        .env_remove("TEST_CHECKPOINT_BUCKET")
        .arg("setup-test-resources")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("TEST_DATA_BUCKET"));
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    let mut cmd = Command::cargo_bin("mlforge").unwrap();
    cmd.arg("frobnicate").assert().failure();
}
