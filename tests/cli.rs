// ==============================================
// COMMAND-LINE DRIVER (integration)
// ==============================================

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn evictkit() -> Command {
    Command::cargo_bin("evictkit").unwrap()
}

#[test]
fn run_prints_compact_counts_in_policy_order() {
    evictkit()
        .arg("run")
        .write_stdin("2 6\n1 2 3 1 2 3\n")
        .assert()
        .success()
        .stdout("0\n0\n2\n");
}

#[test]
fn run_verbose_names_each_policy() {
    evictkit()
        .args(["run", "--verbose"])
        .write_stdin("2 4 1 1 2 2")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ARC hits: 2 out of 4 requests")
                .and(predicate::str::contains("LRU hits: 2 out of 4 requests"))
                .and(predicate::str::contains("Ideal hits: 2 out of 4 requests")),
        );
}

#[test]
fn run_selected_policies_only() {
    evictkit()
        .args(["run", "-p", "ideal", "--policy", "LRU"])
        .write_stdin("2 6\n1 2 1 3 1 2\n")
        .assert()
        .success()
        .stdout("3\n2\n");
}

#[test]
fn run_reads_trace_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.dat");
    fs::write(&path, "2 5\n1 2 1 3 1\n").unwrap();

    evictkit()
        .args(["run", "-p", "lru"])
        .arg(&path)
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn run_with_capacity_larger_than_memory() {
    evictkit()
        .arg("run")
        .write_stdin("1000000000000 3\n1 2 1\n")
        .assert()
        .success()
        .stdout("1\n1\n1\n");
}

#[test]
fn bad_header_exits_with_input_status() {
    evictkit()
        .arg("run")
        .write_stdin("0 3\n1 2 3\n")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("only positive values are accepted"));
}

#[test]
fn truncated_trace_exits_with_input_status() {
    evictkit()
        .arg("run")
        .write_stdin("2 4\n1 2\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 4 keys, found 2"));
}

#[test]
fn missing_file_is_an_io_failure() {
    let dir = TempDir::new().unwrap();
    evictkit()
        .arg("run")
        .arg(dir.path().join("absent.dat"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("opening"));
}

#[test]
fn unknown_policy_is_a_usage_error() {
    evictkit()
        .args(["run", "--policy", "fifo"])
        .write_stdin("1 1 1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fifo"));
}

#[test]
fn gen_writes_standard_fixtures() {
    let dir = TempDir::new().unwrap();
    evictkit()
        .args(["gen", "--seed", "11", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0.dat").and(predicate::str::contains("4.dat")));

    for idx in 0..5 {
        assert!(dir.path().join(format!("{idx}.dat")).is_file());
    }
    let first = fs::read_to_string(dir.path().join("0.dat")).unwrap();
    assert!(first.starts_with("15 1000\n"));
}

#[test]
fn gen_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    evictkit()
        .args(["gen", "--dir"])
        .arg(dir.path().join("missing"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not a directory"));
}
