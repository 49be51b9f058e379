#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn panelz_cmd(data: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("panelz"));
    cmd.env("PANELZ_DATA", data.as_os_str())
        .env("NO_COLOR", "1")
        .env_remove("PANELZ_LOG");
    cmd
}

/// Writes a session profile so commands run as `role` without a login call.
fn seed_user(data: &Path, role: &str) {
    fs::create_dir_all(data).unwrap();
    fs::write(
        data.join("user.json"),
        format!(
            r#"{{"id":1,"username":"emilys","firstName":"Emily","lastName":"Johnson","role":"{}"}}"#,
            role
        ),
    )
    .unwrap();
}

fn read_collection(data: &Path, key: &str) -> Vec<Value> {
    let content = fs::read_to_string(data.join(format!("{}.json", key))).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn first_id(data: &Path, key: &str) -> String {
    read_collection(data, key)[0]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn commands_require_login() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    panelz_cmd(&data)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));

    panelz_cmd(&data)
        .args(["candidate", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn whoami_shows_seeded_user() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "ta_member");

    panelz_cmd(&data)
        .args(["whoami"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emily Johnson"))
        .stdout(predicate::str::contains("ta_member"));
}

#[test]
fn candidate_lifecycle() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "admin");

    panelz_cmd(&data)
        .args([
            "candidate",
            "create",
            "Ada",
            "Lovelace",
            "--email",
            "ada@x.com",
            "--department",
            "Engineering",
            "--designation",
            "Backend Developer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Candidate created"));

    let candidates = read_collection(&data, "candidates");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["firstName"], "Ada");
    assert_eq!(candidates[0]["status"], "scheduled");

    panelz_cmd(&data)
        .args(["candidate", "list", "--search", "love"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ada Lovelace"));

    let id = first_id(&data, "candidates");
    panelz_cmd(&data)
        .args(["candidate", "edit", &id, "--status", "completed"])
        .assert()
        .success();
    assert_eq!(read_collection(&data, "candidates")[0]["status"], "completed");

    panelz_cmd(&data)
        .args(["candidate", "delete", &id])
        .assert()
        .success();
    assert!(read_collection(&data, "candidates").is_empty());

    panelz_cmd(&data)
        .args(["candidate", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("candidate not found"));
}

#[test]
fn scheduling_updates_candidate_status() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "ta_member");

    panelz_cmd(&data)
        .args(["candidate", "create", "Ada", "Lovelace"])
        .assert()
        .success();
    panelz_cmd(&data)
        .args(["interviewer", "add", "Grace Hopper", "grace@x.com"])
        .assert()
        .success();

    let cid = first_id(&data, "candidates");
    let iid = first_id(&data, "interviewers");
    panelz_cmd(&data)
        .args([
            "interview",
            "schedule",
            &cid,
            &iid,
            "2024-01-10T10:00",
            "--status",
            "completed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interview scheduled"));

    let interviews = read_collection(&data, "interviews");
    assert_eq!(interviews.len(), 1);
    assert_eq!(interviews[0]["candidateId"], cid.as_str());
    assert_eq!(read_collection(&data, "candidates")[0]["status"], "completed");

    panelz_cmd(&data)
        .args(["interview", "list", "--candidate", &cid])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grace Hopper"));

    let interview_id = first_id(&data, "interviews");
    panelz_cmd(&data)
        .args([
            "interview",
            "edit",
            &interview_id,
            "--date",
            "2024-02-01 09:30",
            "--status",
            "cancelled",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Interview updated"));

    let interviews = read_collection(&data, "interviews");
    assert_eq!(interviews.len(), 1);
    assert_eq!(interviews[0]["date"], "2024-02-01T09:30");
    assert_eq!(read_collection(&data, "candidates")[0]["status"], "cancelled");

    panelz_cmd(&data)
        .args(["interview", "edit", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interview not found"));

    // The interviewer is referenced, and only admins manage roles anyway.
    panelz_cmd(&data)
        .args(["interviewer", "remove", &iid])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot access role management"));

    seed_user(&data, "admin");
    panelz_cmd(&data)
        .args(["interviewer", "remove", &iid])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still referenced"));
}

#[test]
fn panelist_feedback_is_validated() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "admin");
    panelz_cmd(&data)
        .args(["candidate", "create", "Ada", "Lovelace"])
        .assert()
        .success();
    let cid = first_id(&data, "candidates");

    seed_user(&data, "panelist");
    panelz_cmd(&data)
        .args(["candidate", "create", "Alan", "Turing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Role panelist cannot access"));

    panelz_cmd(&data)
        .args(["feedback", "add", &cid, "--score", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid feedback"));
    assert!(!data.join("feedback.json").exists());

    panelz_cmd(&data)
        .args([
            "feedback",
            "add",
            &cid,
            "--score",
            "4",
            "--strengths",
            "Clear reasoning",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedback recorded"));

    let feedback = read_collection(&data, "feedback");
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["authorRole"], "panelist");

    panelz_cmd(&data)
        .args(["feedback", "list", &cid])
        .assert()
        .success()
        .stdout(predicate::str::contains("Clear reasoning"));
}

#[test]
fn config_set_and_show() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");

    panelz_cmd(&data)
        .args(["config", "dashboard-days", "14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard-days set to 14"));

    panelz_cmd(&data)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard-days = 14"))
        .stdout(predicate::str::contains("default-role = panelist"));

    panelz_cmd(&data)
        .args(["config", "default-role", "owner"])
        .assert()
        .failure();
}

#[test]
fn corrupt_config_does_not_block_commands() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "admin");
    fs::write(data.join("config.json"), "{ not json").unwrap();

    panelz_cmd(&data)
        .args(["candidate", "list"])
        .assert()
        .success();

    panelz_cmd(&data)
        .args(["config", "dashboard-days", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard-days set to 10"));

    panelz_cmd(&data)
        .args(["config", "dashboard-days"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10"));
}

#[test]
fn export_then_import_into_fresh_data_dir() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let target = temp.path().join("target");
    let out = temp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    seed_user(&source, "admin");
    seed_user(&target, "admin");

    panelz_cmd(&source)
        .args(["candidate", "create", "Ada", "Lovelace"])
        .assert()
        .success();
    panelz_cmd(&source)
        .args(["export", "--dir", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 record(s)"));

    let archive = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| p.to_string_lossy().ends_with(".tar.gz"))
        .unwrap();

    panelz_cmd(&target)
        .args(["import", archive.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total imported: 1"));

    assert_eq!(
        read_collection(&target, "candidates"),
        read_collection(&source, "candidates")
    );
}

#[test]
fn logout_removes_session_file() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "admin");

    panelz_cmd(&data)
        .args(["logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out emilys"));
    assert!(!data.join("user.json").exists());
}

#[test]
fn dashboard_counts_window() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    seed_user(&data, "admin");
    fs::write(
        data.join("candidates.json"),
        r#"[{"id":"c1","firstName":"Ada","lastName":"Lovelace","status":"completed"}]"#,
    )
    .unwrap();
    fs::write(
        data.join("interviews.json"),
        r#"[{"id":"i1","candidateId":"c1","interviewerId":"iv1","date":"2024-01-10T10:00","status":"completed"},
            {"id":"i2","candidateId":"c1","interviewerId":"iv1","date":"not a date","status":"scheduled"}]"#,
    )
    .unwrap();

    panelz_cmd(&data)
        .args(["dashboard", "--from", "2024-01-01", "--to", "2024-01-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interviews      1"))
        .stdout(predicate::str::contains("completed       1"));
}
