//! E2E CLI tests covering the single-metric commands:
//! - `edgerank pagerank`, `bfs`, `degrees`, `stats`
//! - Output mode selection (`--format`, `EDGERANK_FORMAT`)
//! - `edgerank completions`

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Two components: a path 0-1-2 and an edge 3->4, plus a self-loop on 4.
const TWO_PARTS: &str = "0 1\n1 2\n3 4\n4 4\n";

fn edgerank_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("edgerank"));
    cmd.current_dir(dir);
    cmd.env("EDGERANK_LOG", "error");
    cmd.env("EDGERANK_FORMAT", "text");
    cmd
}

fn setup(content: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("graph.txt"), content).expect("write graph");
    dir
}

fn stdout_json(dir: &Path, args: &[&str]) -> Value {
    let output = edgerank_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("edgerank should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// bfs
// ---------------------------------------------------------------------------

#[test]
fn bfs_prints_component_order() {
    let dir = setup(TWO_PARTS);
    edgerank_cmd(dir.path())
        .args(["bfs", "graph.txt", "--start", "1"])
        .assert()
        .success()
        .stdout("1\n0\n2\n");
}

#[test]
fn bfs_scan_matches_index() {
    let dir = setup(TWO_PARTS);
    let indexed = stdout_json(dir.path(), &["bfs", "graph.txt", "--start", "3"]);
    let scanned = stdout_json(dir.path(), &["bfs", "graph.txt", "--start", "3", "--scan"]);
    assert_eq!(indexed, scanned);
    assert_eq!(indexed["order"], serde_json::json!([3, 4]));
    assert_eq!(indexed["visited"], 2);
}

#[test]
fn bfs_out_writes_file() {
    let dir = setup(TWO_PARTS);
    let json = stdout_json(dir.path(), &["bfs", "graph.txt", "--out", "order.txt"]);
    assert!(json.get("order").is_none());
    assert_eq!(
        fs::read_to_string(dir.path().join("order.txt")).expect("order"),
        "0\n1\n2\n"
    );
}

#[test]
fn bfs_on_empty_input_is_a_no_op() {
    let dir = setup("");
    let json = stdout_json(dir.path(), &["bfs", "graph.txt", "--start", "5"]);
    assert!(json["start"].is_null());
    assert_eq!(json["visited"], 0);
}

// ---------------------------------------------------------------------------
// degrees / stats
// ---------------------------------------------------------------------------

#[test]
fn degrees_prints_histogram_lines() {
    // Out-degrees: 0:1 1:1 2:0 3:1 4:1
    let dir = setup(TWO_PARTS);
    edgerank_cmd(dir.path())
        .args(["degrees", "graph.txt"])
        .assert()
        .success()
        .stdout("0 1\n1 4\n");
}

#[test]
fn degrees_json_counts() {
    let dir = setup(TWO_PARTS);
    let json = stdout_json(dir.path(), &["degrees", "graph.txt", "--out", "d.txt"]);
    assert_eq!(json["nodes"], 5);
    assert_eq!(json["max_degree"], 1);
    assert_eq!(json["counts"], serde_json::json!([1, 4]));
    assert_eq!(
        fs::read_to_string(dir.path().join("d.txt")).expect("d.txt"),
        "0 1\n1 4\n"
    );
}

#[test]
fn stats_reports_graph_shape() {
    let dir = setup(TWO_PARTS);
    let json = stdout_json(dir.path(), &["stats", "graph.txt"]);
    assert_eq!(json["node_count"], 5);
    assert_eq!(json["edge_count"], 4);
    assert_eq!(json["self_loop_count"], 1);
    assert_eq!(json["isolated_node_count"], 0);
    assert_eq!(json["lines_read"], 4);
    let hash = json["content_hash"].as_str().expect("hash");
    assert!(hash.starts_with("blake3:"), "unexpected hash {hash}");
}

#[test]
fn stats_hash_is_stable_across_readers() {
    let dir = setup(TWO_PARTS);
    let buffered = stdout_json(dir.path(), &["stats", "graph.txt"]);
    let mapped = stdout_json(dir.path(), &["stats", "graph.txt", "--mmap"]);
    assert_eq!(buffered["content_hash"], mapped["content_hash"]);
}

// ---------------------------------------------------------------------------
// pagerank
// ---------------------------------------------------------------------------

#[test]
fn pagerank_top_is_sorted_and_limited() {
    let dir = setup(TWO_PARTS);
    let json = stdout_json(dir.path(), &["pagerank", "graph.txt", "--top", "2"]);
    let top = json["top"].as_array().expect("top array");
    assert_eq!(top.len(), 2);
    let first = top[0]["rank"].as_f64().expect("rank");
    let second = top[1]["rank"].as_f64().expect("rank");
    assert!(first >= second);
    assert_eq!(json["skipped_edges"], 0);
}

#[test]
fn pagerank_out_writes_one_line_per_node() {
    let dir = setup(TWO_PARTS);
    edgerank_cmd(dir.path())
        .args(["pagerank", "graph.txt", "--iterations", "0", "--out", "p.txt"])
        .assert()
        .success();
    let ranks = fs::read_to_string(dir.path().join("p.txt")).expect("p.txt");
    assert_eq!(ranks.lines().count(), 5);
    assert!(ranks.lines().all(|l| l.starts_with("0.2000000000")));
}

// ---------------------------------------------------------------------------
// output modes / completions
// ---------------------------------------------------------------------------

#[test]
fn format_env_selects_json() {
    let dir = setup(TWO_PARTS);
    let output = edgerank_cmd(dir.path())
        .env("EDGERANK_FORMAT", "json")
        .args(["stats", "graph.txt"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["edge_count"], 4);
}

#[test]
fn pretty_output_has_sections() {
    let dir = setup(TWO_PARTS);
    edgerank_cmd(dir.path())
        .args(["stats", "graph.txt", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph").and(predicate::str::contains("nodes:")));
}

#[test]
fn timing_report_goes_to_stderr() {
    let dir = setup(TWO_PARTS);
    edgerank_cmd(dir.path())
        .args(["--timing", "degrees", "graph.txt"])
        .assert()
        .success()
        .stdout("0 1\n1 4\n")
        .stderr(predicate::str::contains("cmd.degrees"));
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("tempdir");
    edgerank_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edgerank"));
}
