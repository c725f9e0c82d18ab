// ABOUTME: Integration tests for the nodelink CLI commands.
// ABOUTME: Runs link commands against temporary inventory files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const INVENTORY: &str = r#"
nodes:
  - system_id: 4y3h7n
    hostname: worker-1
    status: Deploying
    interfaces:
      - id: 1
        name: eth0
        links:
          - id: 42
            mode: AUTO
            subnet: 3
"#;

fn nodelink_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nodelink"));
    cmd.current_dir(dir);
    cmd
}

fn write_inventory(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("inventory.yml");
    fs::write(&path, INVENTORY).unwrap();
    path
}

#[test]
fn help_shows_commands() {
    let temp_dir = tempfile::tempdir().unwrap();
    nodelink_cmd(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("nodelink.yml");

    nodelink_cmd(temp_dir.path()).arg("init").assert().success();

    assert!(config_path.exists(), "nodelink.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("abort_message:"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("nodelink.yml"), "default_mode: DHCP").unwrap();

    nodelink_cmd(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn classify_reports_plan() {
    let temp_dir = tempfile::tempdir().unwrap();
    nodelink_cmd(temp_dir.path())
        .args(["classify", "Deploying"])
        .assert()
        .success()
        .stdout(predicate::str::contains("transitional"))
        .stdout(predicate::str::contains("abort, release, unlink"));
}

#[test]
fn classify_unknown_status_is_refused() {
    let temp_dir = tempfile::tempdir().unwrap();
    nodelink_cmd(temp_dir.path())
        .args(["classify", "Hibernating"])
        .assert()
        .success()
        .stdout(predicate::str::contains("teardown refused"));
}

#[test]
fn classify_ignores_invalid_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("nodelink.yml"),
        "teardown:\n  abort_message: \"\"\n",
    )
    .unwrap();

    nodelink_cmd(temp_dir.path())
        .args(["classify", "Ready"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn link_commands_reject_invalid_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());
    fs::write(
        temp_dir.path().join("nodelink.yml"),
        "teardown:\n  abort_message: \"\"\n",
    )
    .unwrap();

    nodelink_cmd(temp_dir.path())
        .args(["delete", "--inventory"])
        .arg(&inventory)
        .args(["--machine", "4y3h7n", "--interface", "1", "--link", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("abort_message cannot be empty"));
}

#[test]
fn delete_prints_call_trace_and_persists() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["delete", "--inventory"])
        .arg(&inventory)
        .args(["--machine", "4y3h7n", "--interface", "1", "--link", "42", "--write"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abort 4y3h7n"))
        .stdout(predicate::str::contains("release 4y3h7n"))
        .stdout(predicate::str::contains("unlink 42"));

    let saved = fs::read_to_string(&inventory).unwrap();
    assert!(saved.contains("Ready"), "machine should be released: {saved}");
    assert!(!saved.contains("id: 42"), "link should be gone: {saved}");
}

#[test]
fn delete_without_write_leaves_file_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["delete", "--inventory"])
        .arg(&inventory)
        .args(["--machine", "4y3h7n", "--interface", "1", "--link", "42"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&inventory).unwrap(), INVENTORY);
}

#[test]
fn create_static_link_outputs_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["--output", "json", "create", "--inventory"])
        .arg(&inventory)
        .args([
            "--machine",
            "4y3h7n",
            "--interface",
            "1",
            "--subnet",
            "8",
            "--mode",
            "STATIC",
            "--ip-address",
            "10.0.0.5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"call\":\"link_subnet\""))
        .stdout(predicate::str::contains("\"ip_address\":\"10.0.0.5\""))
        .stdout(predicate::str::contains("\"mode\":\"STATIC\""));
}

#[test]
fn create_static_without_address_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["create", "--inventory"])
        .arg(&inventory)
        .args([
            "--machine",
            "4y3h7n",
            "--interface",
            "1",
            "--subnet",
            "8",
            "--mode",
            "static",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires an ip_address"));
}

#[test]
fn read_missing_link_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["read", "--inventory"])
        .arg(&inventory)
        .args(["--machine", "4y3h7n", "--interface", "1", "--link", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find link (7)"));
}

#[test]
fn delete_on_missing_machine_is_a_no_op() {
    let temp_dir = tempfile::tempdir().unwrap();
    let inventory = write_inventory(temp_dir.path());

    nodelink_cmd(temp_dir.path())
        .args(["delete", "--inventory"])
        .arg(&inventory)
        .args(["--machine", "gone01", "--interface", "1", "--link", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer exists"));
}
