use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn blog_infra() -> Command {
    Command::cargo_bin("blog-infra").unwrap()
}

/// Writes a config pointing at an AWS CLI binary that does not exist.
fn write_config(dir: &TempDir) {
    let mut table = toml::Table::new();
    table.insert("domain".into(), "blog.example.com".into());
    table.insert("aws_binary".into(), "/nonexistent/bin/aws".into());
    table.insert(
        "log_path".into(),
        dir.path().join("infra.log").to_string_lossy().into_owned().into(),
    );
    fs::write(
        dir.path().join("config.toml"),
        toml::to_string(&table).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_help() {
    blog_infra()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bootstrap"))
        .stdout(predicate::str::contains("deploy"));
}

#[test]
fn test_missing_aws_cli_exits_with_1() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    blog_infra()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/bin/aws"));

    // nothing is generated when preflight fails
    assert!(!dir.path().join("website.json").exists());
    let log = fs::read_to_string(dir.path().join("infra.log")).unwrap();
    assert!(log.contains("[ERROR]"));
}

#[test]
fn test_plan_and_deploy_also_fail_fast() {
    let dir = TempDir::new().unwrap();
    write_config(&dir);

    for command in ["plan", "deploy"] {
        blog_infra()
            .current_dir(dir.path())
            .arg(command)
            .assert()
            .code(1);
    }
}

#[test]
fn test_invalid_config_exits_with_1() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "settle_attempts = \"many\"").unwrap();

    blog_infra()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read config file"));
}
