//! Integration tests for the `mvnscope` command-line interface.
//!
//! Each test runs the compiled binary from a temporary working directory so
//! that no stray `mvnscope.toml` is picked up.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

const TREE: &str = "\
[INFO] com.example:shop:jar:2.1.0
[INFO] +- org.springframework:spring-core:jar:5.3.20:compile
[INFO] |  \\- org.springframework:spring-jcl:jar:5.3.20:compile (version managed from 5.3.18)
[INFO] +- org.slf4j:slf4j-api:jar:1.7.36:compile
[INFO] +- ch.qos.logback:logback-classic:jar:1.2.11:compile
[INFO] |  +- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)
[INFO] |  \\- ch.qos.logback:logback-core:jar:1.2.11:compile
[INFO] \\- junit:junit:jar:4.13.2:test
[INFO]    \\- (org.hamcrest:hamcrest-core:jar:1.3:test - omitted for duplicate)
";

fn mvnscope_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mvnscope").expect("Failed to find mvnscope binary for testing");
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn test_version_subcommand() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("mvnscope v"));
}

#[test]
fn test_no_subcommand_prints_usage_hint() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("mvnscope analyze"));
}

#[test]
fn test_analyze_default_format_is_tree() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .arg("analyze")
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("com.example:shop:jar:2.1.0\n"))
        .stdout(predicate::str::contains(
            "|  +- (org.slf4j:slf4j-api:jar:1.7.32:compile - omitted for conflict with 1.7.36)",
        ));
}

#[test]
fn test_analyze_json_from_stdin() {
    let dir = tempdir().unwrap();
    let output = mvnscope_cmd(&dir)
        .args(["analyze", "-", "--format", "json"])
        .write_stdin(TREE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["total"], 9);
    assert_eq!(json["summary"]["conflicts"], 1);
    assert_eq!(json["conflicts"][0]["key"], "org.slf4j:slf4j-api");
    assert_eq!(json["groupWeights"].as_array().unwrap().len(), 6);
    assert_eq!(json["groupWeights"][0]["name"], "org.springframework");
}

#[test]
fn test_analyze_csv_from_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tree.txt");
    fs::write(&input, TREE).unwrap();

    mvnscope_cmd(&dir)
        .arg("analyze")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "id,depth,groupId,artifactId,type,version,scope,status,winner,managedFrom\n",
        ))
        .stdout(predicate::str::contains("conflict,1.7.36"));
}

#[test]
fn test_analyze_markdown_respects_top_override() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["analyze", "--format", "md", "--top", "0"])
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Maven Dependency Report"))
        .stdout(predicate::str::contains("| Multi-Version Artifacts | 1 |"))
        .stdout(predicate::str::contains("## Version Conflicts").not());
}

#[test]
fn test_analyze_reads_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "top_conflicts = 0\n").unwrap();

    mvnscope_cmd(&dir)
        .args(["analyze", "--format", "markdown", "--config"])
        .arg(&config)
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::contains("| Multi-Version Artifacts | 1 |"))
        .stdout(predicate::str::contains("## Version Conflicts").not());
}

#[test]
fn test_analyze_discovers_default_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mvnscope.toml"), "top_conflicts = 0\n").unwrap();

    mvnscope_cmd(&dir)
        .args(["analyze", "--format", "markdown"])
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::contains("| Multi-Version Artifacts | 1 |"))
        .stdout(predicate::str::contains("## Version Conflicts").not());
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "unknown_key = 1\n").unwrap();

    mvnscope_cmd(&dir)
        .args(["analyze", "--config"])
        .arg(&config)
        .write_stdin(TREE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Could not load config"));
}

#[test]
fn test_threshold_out_of_range_fails() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["analyze", "--threshold", "150"])
        .write_stdin(TREE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("other_threshold_percent"));
}

#[test]
fn test_unknown_format_rejected() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["analyze", "--format", "yaml"])
        .write_stdin(TREE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}

#[test]
fn test_input_without_root_fails() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .arg("analyze")
        .write_stdin("[INFO] BUILD SUCCESS\n[INFO] Total time: 1.2 s\n")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["analyze", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn test_conflicts_subcommand() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .arg("conflicts")
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "org.slf4j:slf4j-api: 1.7.32, 1.7.36 (resolved 1.7.36)",
        ))
        .stdout(predicate::str::contains("  omitted 1.7.32 (node-5)"))
        .stdout(predicate::str::contains("1 artifact(s) with several versions"));
}

#[test]
fn test_conflicts_subcommand_clean_tree() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .arg("conflicts")
        .write_stdin("g:root:jar:1\n\\- g:a:jar:1:compile\n")
        .assert()
        .success()
        .stdout("No version conflicts found.\n");
}

#[test]
fn test_conflicts_subcommand_respects_top() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["conflicts", "--top", "0"])
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout("Showing the top 0 of 1\n1 artifact(s) with several versions\n");
}

#[test]
fn test_conflicts_subcommand_discovers_default_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mvnscope.toml"), "top_conflicts = 0\n").unwrap();

    mvnscope_cmd(&dir)
        .arg("conflicts")
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(predicate::str::contains("slf4j-api").not())
        .stdout(predicate::str::contains("Showing the top 0 of 1"));
}

#[test]
fn test_conflicts_subcommand_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "top_conflicts = \"ten\"\n").unwrap();

    mvnscope_cmd(&dir)
        .args(["conflicts", "--config"])
        .arg(&config)
        .write_stdin(TREE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Could not load config"));
}

#[test]
fn test_search_subcommand_with_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("tree.txt");
    fs::write(&input, TREE).unwrap();

    mvnscope_cmd(&dir)
        .args(["search", "SLF4J"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "com.example:shop:2.1.0 > org.slf4j:slf4j-api:1.7.36\n",
        ))
        .stdout(predicate::str::contains(
            "com.example:shop:2.1.0 > ch.qos.logback:logback-classic:1.2.11 > org.slf4j:slf4j-api:1.7.32 [conflict]",
        ))
        .stdout(predicate::str::contains("2 match(es) for 'SLF4J'"));
}

#[test]
fn test_search_lists_each_chain_once() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["search", "logback"])
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout(
            "com.example:shop:2.1.0 > ch.qos.logback:logback-classic:1.2.11\n\
             com.example:shop:2.1.0 > ch.qos.logback:logback-classic:1.2.11 > ch.qos.logback:logback-core:1.2.11\n\
             2 match(es) for 'logback'\n",
        );
}

#[test]
fn test_search_without_hits() {
    let dir = tempdir().unwrap();
    mvnscope_cmd(&dir)
        .args(["search", "guava"])
        .write_stdin(TREE)
        .assert()
        .success()
        .stdout("0 match(es) for 'guava'\n");
}
