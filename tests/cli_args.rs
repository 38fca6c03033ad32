use predicates::prelude::*;

#[test]
fn missing_author_is_usage_error() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ameblo-dl");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("<AUTHOR>"));
}

#[test]
fn extra_arguments_are_rejected() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ameblo-dl");
    cmd.args(["alice", "bob"]).assert().failure();
}

#[test]
fn author_with_path_separator_is_rejected() {
    let temp = tempfile::TempDir::new().expect("create temp dir");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ameblo-dl");
    cmd.args(["--domain", "http://127.0.0.1:9", "--out"])
        .arg(temp.path())
        .arg("../etc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validate author"));
}

#[test]
fn rust_log_debug_emits_debug_line_to_stderr() {
    let temp = tempfile::TempDir::new().expect("create temp dir");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ameblo-dl");
    cmd.env("RUST_LOG", "debug")
        .args(["--domain", "not a url", "--out"])
        .arg(temp.path())
        .arg("alice")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsed cli"))
        .stderr(predicate::str::contains("parse --domain"));
}
