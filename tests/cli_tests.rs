//! End-to-end checks of the ppsubmit binary's offline commands

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ABSTRACT: &str = "We revisit the seven bridges of Königsberg with new data.";

fn ppsubmit() -> Command {
    let mut cmd = Command::cargo_bin("ppsubmit").unwrap();
    cmd.env_remove("PPSUBMIT_TOKEN")
        .env_remove("OSF_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_manifest(dir: &Path, manifest: &serde_json::Value) -> PathBuf {
    fs::write(dir.join("paper.pdf"), b"%PDF-1.7").unwrap();
    let path = dir.join("submission.json");
    fs::write(&path, serde_json::to_string_pretty(manifest).unwrap()).unwrap();
    path
}

fn valid_manifest() -> serde_json::Value {
    json!({
        "title": "Seven bridges",
        "file": "paper.pdf",
        "abstract": ABSTRACT,
        "tags": ["graphs"],
        "subjects": [["eng"]],
        "contributors": [{ "full_name": "Charles Babbage", "email": "charles@example.org" }]
    })
}

#[test]
fn test_help_lists_commands() {
    ppsubmit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("withdraw"))
        .stdout(predicate::str::contains("resubmit"));
}

#[test]
fn test_check_accepts_valid_manifest() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(dir.path(), &valid_manifest());

    ppsubmit()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("is ready to submit"));
}

#[test]
fn test_check_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(
        dir.path(),
        &json!({
            "title": "  ",
            "file": "missing.pdf",
            "abstract": "too short",
            "doi": "not a doi",
            "subjects": []
        }),
    );

    ppsubmit()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title can't be blank"))
        .stderr(predicate::str::contains("Abstract is too short"))
        .stderr(predicate::str::contains("Discipline can't be blank"))
        .stderr(predicate::str::contains("File can't be blank"))
        .stderr(predicate::str::contains("5 problems"));
}

#[test]
fn test_check_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"title\": ").unwrap();

    ppsubmit().arg("check").arg(&path).assert().failure();
}

#[test]
fn test_submit_dry_run_prints_plan_offline() {
    let dir = TempDir::new().unwrap();
    let path = write_manifest(dir.path(), &valid_manifest());

    ppsubmit()
        .arg("submit")
        .arg(&path)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Submission plan"))
        .stdout(predicate::str::contains("Create project Seven bridges"))
        .stdout(predicate::str::contains("1 subject path"))
        .stdout(predicate::str::contains("1 additional contributor"))
        .stdout(predicate::str::contains("Dry run: nothing was submitted"));
}

#[test]
fn test_submit_dry_run_with_existing_project() {
    let dir = TempDir::new().unwrap();
    let mut manifest = valid_manifest();
    manifest["project"] = json!({ "id": "node-b", "mode": "copy" });
    let path = write_manifest(dir.path(), &manifest);

    ppsubmit()
        .args(["submit", "--dry-run"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Use project node-b (Copy)"));
}

#[test]
fn test_auth_setup_explains_token_sources() {
    ppsubmit()
        .args(["auth", "setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authentication Setup"))
        .stdout(predicate::str::contains("PPSUBMIT_TOKEN"));
}
