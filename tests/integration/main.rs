//! Integration tests for Lineage
//!
//! These drive the CLI binary against a temporary project root.

use std::path::Path;
use std::process::{Command, Output};

use lineage_core::{DEFAULT_EVENT_CAPACITY, Snapshot, snapshot_path};
use tempfile::TempDir;

fn lineage(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lineage"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("LINEAGE_LOG")
        .output()
        .expect("Failed to execute lineage")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run a command that must succeed and return its stdout
fn ok(root: &Path, args: &[&str]) -> String {
    let output = lineage(root, args);
    assert!(
        output.status.success(),
        "lineage {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    stdout(&output)
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let out = ok(dir.path(), &["--help"]);
    assert!(out.contains("Word lineage graphs"));
}

#[test]
fn test_sort_diamond() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for label in ["A", "B", "C", "D"] {
        ok(root, &["word", label]);
    }
    assert!(ok(root, &["link", "0", "1", "2"]).contains("2 link(s) created"));
    ok(root, &["link", "#1", "#3"]);
    ok(root, &["link", "2", "3"]);
    ok(root, &["family", "letters"]);
    ok(root, &["add", "letters", "3", "2", "1", "0"]);

    let out = ok(root, &["sort", "letters"]);
    assert_eq!(out, "1. #0 A\n2. #1 B\n3. #2 C\n4. #3 D\n");

    // the sorted order is persisted
    let snapshot = Snapshot::load(&snapshot_path(root)).unwrap().unwrap();
    let (lexicon, families) = snapshot.restore(DEFAULT_EVENT_CAPACITY).unwrap();
    let labels: Vec<&str> = families[0]
        .order()
        .iter()
        .map(|&w| lexicon.label(w).unwrap())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_sort_cycle_reports_problem_words() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for label in ["A", "B", "C"] {
        ok(root, &["word", label]);
    }
    ok(root, &["link", "0", "1"]);
    ok(root, &["link", "1", "0"]);
    ok(root, &["family", "loop"]);
    ok(root, &["add", "loop", "0", "1", "2"]);

    let output = lineage(root, &["sort", "loop"]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("#0 A"));
    assert!(out.contains("#1 B"));
    assert!(!out.contains("#2 C"));

    let shown = ok(root, &["show"]);
    assert!(shown.contains("loop: [#0 A, #1 B, #2 C]"));
}

#[test]
fn test_remove_severs_links() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for label in ["A", "B", "C"] {
        ok(root, &["word", label]);
    }
    ok(root, &["link", "0", "1"]);
    ok(root, &["link", "1", "2"]);
    ok(root, &["family", "chain"]);
    ok(root, &["add", "chain", "0", "1", "2"]);
    assert!(ok(root, &["remove", "chain", "1"]).contains("1 word(s) removed"));

    let shown = ok(root, &["show"]);
    assert!(shown.contains("  #0 A\n"));
    assert!(shown.contains("  #1 B\n"));
    assert!(shown.contains("chain: [#0 A, #2 C]"));
}

#[test]
fn test_unlink_and_isolate() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for label in ["A", "B", "C"] {
        ok(root, &["word", label]);
    }
    ok(root, &["link", "0", "1", "2"]);
    ok(root, &["link", "1", "0"]);

    assert!(ok(root, &["unlink", "1", "0"]).contains("2 link(s) removed"));
    assert!(ok(root, &["isolate", "2"]).contains("1 link(s) removed"));
    assert!(ok(root, &["show"]).contains("  #0 A\n"));
}

#[test]
fn test_family_names_are_addressable() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    ok(root, &["family", "kin"]);
    assert!(!lineage(root, &["family", "kin"]).status.success());
    ok(root, &["rename", "kin", "clan"]);
    assert!(!lineage(root, &["sort", "kin"]).status.success());
    assert_eq!(ok(root, &["sort", "clan"]), "");
    assert!(!lineage(root, &["add", "clan", "9"]).status.success());
}

#[test]
fn test_clear_removes_snapshot() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    ok(root, &["word", "A"]);
    assert!(snapshot_path(root).exists());
    ok(root, &["clear"]);
    assert!(!snapshot_path(root).exists());
    assert_eq!(ok(root, &["show"]), "words:\nfamilies:\n");
}

#[test]
fn test_clear_with_root_storage_keeps_project_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(root.join("lineage.toml"), "[storage]\ndir = \".\"\n").unwrap();
    std::fs::write(root.join("precious.txt"), "keep").unwrap();

    ok(root, &["word", "A"]);
    assert!(root.join("snapshot.json").exists());
    assert!(ok(root, &["clear"]).contains("snapshot cleared"));

    assert!(!root.join("snapshot.json").exists());
    assert!(root.join("precious.txt").exists());
    assert!(root.join("lineage.toml").exists());
}

#[test]
fn test_oversized_event_capacity_is_rejected() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(
        root.join("lineage.toml"),
        "[events]\ncapacity = 9223372036854775807\n",
    )
    .unwrap();

    let output = lineage(root, &["family", "kin"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("events.capacity"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
}

#[test]
fn test_log_filter_from_environment() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    ok(root, &["word", "A"]);
    ok(root, &["word", "B"]);

    let quiet = lineage(root, &["link", "0", "1"]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("connected"));

    let output = Command::new(env!("CARGO_BIN_EXE_lineage"))
        .arg("--root")
        .arg(root)
        .args(["link", "1", "0"])
        .env("LINEAGE_LOG", "lineage_core=debug")
        .output()
        .expect("Failed to execute lineage");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("connected"));
}

#[test]
fn test_verbose_enables_debug_logging() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    ok(root, &["word", "A"]);
    ok(root, &["word", "B"]);

    let output = lineage(root, &["--verbose", "link", "0", "1"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("connected"));
}

#[test]
fn test_config_changes_storage_location() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::write(
        root.join("lineage.toml"),
        "[storage]\ndir = \"data\"\nfile = \"words.json\"\n",
    )
    .unwrap();

    ok(root, &["word", "A"]);
    assert!(root.join("data").join("words.json").exists());
    assert!(!snapshot_path(root).exists());
}
