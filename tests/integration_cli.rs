// Drives the compiled binary against a temp data dir so no real user
// state is touched.

use assert_cmd::Command;
use tempfile::tempdir;

fn cmd(dir: &std::path::Path) -> Command {
    let mut c = Command::cargo_bin("examquest").unwrap();
    c.arg("--data-dir").arg(dir);
    c
}

#[test]
fn status_on_fresh_state() {
    let dir = tempdir().unwrap();
    let out = cmd(dir.path()).arg("status").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Novice"));
    assert!(stdout.contains("50 coins"));
}

#[test]
fn answer_then_status_reflects_rewards() {
    let dir = tempdir().unwrap();
    let out = cmd(dir.path())
        .args([
            "answer",
            "--zone",
            "foundations",
            "--phase",
            "boss",
            "--question",
            "q1",
            "--correct",
            "--elapsed-ms",
            "5000",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("+45 xp"));

    let out = cmd(dir.path()).arg("status").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("45 xp"));
    assert!(stdout.contains("75 coins"));
}

#[test]
fn complete_unlocks_next_phase() {
    let dir = tempdir().unwrap();
    cmd(dir.path())
        .args([
            "complete",
            "--zone",
            "foundations",
            "--phase",
            "absorb",
            "--score",
            "88",
        ])
        .assert()
        .success();

    let out = cmd(dir.path()).arg("zones").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("completed"));
    assert!(stdout.contains("available"));
}

#[test]
fn unknown_zone_fails_cleanly() {
    let dir = tempdir().unwrap();
    cmd(dir.path())
        .args([
            "complete",
            "--zone",
            "atlantis",
            "--phase",
            "absorb",
            "--score",
            "88",
        ])
        .assert()
        .failure();
}

#[test]
fn speedrun_scoring_is_stateless() {
    let dir = tempdir().unwrap();
    let out = cmd(dir.path())
        .args([
            "speedrun",
            "--correct",
            "--elapsed-ms",
            "7000",
            "--difficulty",
            "medium",
        ])
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("100 (fast)"));
}
