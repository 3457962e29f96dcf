use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

use datalink_core::{Identifier, Payload, Payloads};
use datalink_store::{config, open_at};

fn datalink_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("datalink"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env_remove("RUST_LOG");
    cmd
}

fn init_link(home: &Path) {
    datalink_cmd(home)
        .args([
            "init",
            "--source-host",
            "db.lab",
            "--source-schema",
            "lab_ephys",
            "--table",
            "recording",
            "--local-host",
            "localhost",
            "--local-schema",
            "mirror",
        ])
        .assert()
        .success()
        .stdout(contains("Linked lab_ephys.recording"));
}

/// Seed the source table the way the source owner's tooling would.
fn seed_source(home: &Path, ids: &[&str]) {
    let cfg = config::load_at(home).expect("load config");
    let mut repos = open_at(home, &cfg).expect("open");
    let payloads: Payloads = ids
        .iter()
        .map(|id| {
            let mut p = Payload::new();
            p.insert("subject".to_string(), json!(format!("mouse-{id}")));
            (Identifier::from(*id), p)
        })
        .collect();
    repos.source.upsert(payloads).expect("seed source");
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run datalink");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn commands_require_init() {
    let home = TempDir::new().expect("home");
    datalink_cmd(home.path())
        .arg("pull")
        .assert()
        .failure()
        .stderr(contains("datalink init"));
}

#[test]
fn init_reports_outbound_table_and_is_idempotent() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    assert!(home.path().join(".datalink/config.yaml").exists());

    datalink_cmd(home.path())
        .args([
            "init",
            "--source-host",
            "other",
            "--source-schema",
            "x",
            "--table",
            "y",
            "--local-host",
            "z",
            "--local-schema",
            "w",
        ])
        .assert()
        .success()
        .stdout(contains("left unchanged"))
        .stdout(contains("lab_ephys_outbound.outbound_"));
}

#[test]
fn pull_then_list_local() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    seed_source(home.path(), &["r1", "r2"]);

    datalink_cmd(home.path())
        .arg("pull")
        .assert()
        .success()
        .stdout(contains("Pulled 2 row(s)"));

    let entities = json_stdout(datalink_cmd(home.path()).args(["list", "local", "--json"]));
    assert_eq!(
        entities,
        json!([
            {"role": "local", "identifier": "r1", "deletion_requested": false},
            {"role": "local", "identifier": "r2", "deletion_requested": false},
        ])
    );

    datalink_cmd(home.path())
        .arg("pull")
        .assert()
        .success()
        .stdout(contains("Nothing to pull"));
}

#[test]
fn pull_with_unknown_id_warns_but_succeeds() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    seed_source(home.path(), &["r1"]);

    datalink_cmd(home.path())
        .args(["pull", "r1", "ghost"])
        .assert()
        .success()
        .stderr(contains("not in source: ghost"));
}

#[test]
fn source_requested_deletion_flows_through_refresh_and_delete() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    seed_source(home.path(), &["A", "B", "C"]);

    datalink_cmd(home.path()).arg("pull").assert().success();
    datalink_cmd(home.path())
        .args(["request-deletion", "B"])
        .assert()
        .success();

    let refreshed = json_stdout(datalink_cmd(home.path()).args(["refresh", "--json"]));
    assert_eq!(refreshed, json!({"operation": "refresh", "flagged": ["B"]}));

    let deleted = json_stdout(datalink_cmd(home.path()).args(["delete", "B", "C", "--json"]));
    assert_eq!(
        deleted,
        json!({"operation": "delete", "approved": ["B"], "removed": ["C"]})
    );

    let outbound = json_stdout(datalink_cmd(home.path()).args(["list", "outbound", "--json"]));
    assert_eq!(
        outbound,
        json!([
            {"role": "outbound", "identifier": "A", "deletion_requested": false, "deletion_approved": false},
            {"role": "outbound", "identifier": "B", "deletion_requested": true, "deletion_approved": true},
        ])
    );

    // B stays out while its request is pending; C comes back.
    let pulled = json_stdout(datalink_cmd(home.path()).args(["pull", "--json"]));
    assert_eq!(
        pulled,
        json!({"operation": "pull", "pulled": ["C"], "skipped": ["B"], "unknown": []})
    );
}

#[test]
fn delete_of_unknown_id_fails_without_changes() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    seed_source(home.path(), &["r1"]);
    datalink_cmd(home.path()).arg("pull").assert().success();

    datalink_cmd(home.path())
        .args(["delete", "r1", "ghost"])
        .assert()
        .failure()
        .stderr(contains("ghost"));

    datalink_cmd(home.path())
        .args(["list", "local"])
        .assert()
        .success()
        .stdout(contains("r1"));
}

#[test]
fn list_empty_repository() {
    let home = TempDir::new().expect("home");
    init_link(home.path());
    datalink_cmd(home.path())
        .args(["list", "source"])
        .assert()
        .success()
        .stdout(contains("source repository is empty"));
}

#[test]
fn home_flag_overrides_environment() {
    let env_home = TempDir::new().expect("env home");
    let flag_home = TempDir::new().expect("flag home");

    datalink_cmd(env_home.path())
        .arg("--home")
        .arg(flag_home.path())
        .args([
            "init",
            "--source-host",
            "db.lab",
            "--source-schema",
            "s",
            "--table",
            "t",
            "--local-host",
            "localhost",
            "--local-schema",
            "m",
        ])
        .assert()
        .success();

    assert!(flag_home.path().join(".datalink/config.yaml").exists());
    assert!(!env_home.path().join(".datalink").exists());
}

#[test]
fn init_refuses_local_that_overlaps_source() {
    let home = TempDir::new().expect("home");
    datalink_cmd(home.path())
        .args([
            "init",
            "--source-host",
            "db.lab",
            "--source-schema",
            "lab_ephys",
            "--table",
            "recording",
            "--local-host",
            "db.lab",
            "--local-schema",
            "lab_ephys",
        ])
        .assert()
        .failure()
        .stderr(contains("would share"));
    assert!(!home.path().join(".datalink/config.yaml").exists());
}
