//! E2E Scenario: Evaluate Workflow Integration Tests
//!
//! Runs the full scoring pipeline through the binary:
//! - canonical JSONL end to end with artifact checks
//! - pairwise CSV reshape and scoring
//! - date window pruning and the --no-window escape hatch
//! - fail-open behavior when a candidate date is missing
//! - vocabulary pruned to nothing, recovered with --min-df
//! - row truncation via --top-k without touching metrics
//! - config file defaults and environment overrides

use predicates::prelude::*;
use serde_json::Value;

use super::common::{canonical_row, jsonl, matched_catalog, PAIRWISE_DATASET};
use super::fixture::E2EFixture;

#[test]
fn test_evaluate_canonical_dataset_end_to_end() {
    let fixture = E2EFixture::new();
    let data_path = fixture.write_file("items.jsonl", &jsonl(&matched_catalog()));
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["schema"], "canonical");
    assert_eq!(json["data"]["stats"]["total_items"], 4);
    assert_eq!(json["data"]["stats"]["queries_total"], 2);
    assert_eq!(json["data"]["stats"]["queries_scored"], 2);
    assert_eq!(json["data"]["stats"]["queries_qualifying"], 2);
    assert_eq!(json["data"]["stats"]["candidates_scored"], 4);
    assert_eq!(json["data"]["summary"]["mrr"], 1.0);
    assert_eq!(json["data"]["summary"]["recall@1"], 1.0);
    assert_eq!(json["data"]["summary"]["ndcg@10"], 1.0);

    let results = std::fs::read_to_string(out_dir.join("tfidf_results.csv")).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert_eq!(lines[0], "queryId,candidateId,score,rank,isMatch");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("L1,F1,"));
    assert!(lines[1].ends_with(",1,1"));
    assert!(lines[3].starts_with("L2,F2,"));

    let metrics: Value = serde_json::from_str(
        &std::fs::read_to_string(out_dir.join("tfidf_metrics_summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metrics["mrr"], 1.0);
    assert_eq!(metrics["recall@10"], 1.0);
}

#[test]
fn test_evaluate_pairwise_dataset_reshapes_and_scores() {
    let fixture = E2EFixture::new();
    let data_path = fixture.write_file("pairs.csv", PAIRWISE_DATASET);
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["schema"], "pairwise");
    assert_eq!(json["data"]["stats"]["total_items"], 4);
    assert_eq!(json["data"]["stats"]["lost_items"], 2);
    assert_eq!(json["data"]["stats"]["found_items"], 2);
    assert_eq!(json["data"]["stats"]["queries_labeled"], 2);
    assert_eq!(json["data"]["summary"]["mrr"], 1.0);

    let results = std::fs::read_to_string(out_dir.join("tfidf_results.csv")).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert!(lines[1].starts_with("L1,F1,"));
    assert!(lines[1].ends_with(",1,1"));
}

#[test]
fn test_evaluate_window_prunes_then_no_window_restores() {
    let fixture = E2EFixture::new();
    let rows = vec![
        canonical_row(
            "L1",
            "lost",
            "Wallet",
            "black leather wallet",
            "accessories",
            Some("2024-03-01"),
            Some("F1"),
        ),
        canonical_row(
            "F1",
            "found",
            "Wallet",
            "black leather wallet with zipper",
            "accessories",
            Some("2024-06-01"),
            None,
        ),
        canonical_row(
            "F2",
            "found",
            "Umbrella",
            "blue compact",
            "accessories",
            Some("2024-03-05"),
            None,
        ),
    ];
    let data_path = fixture.write_file("items.jsonl", &jsonl(&rows));
    let out_dir = fixture.path().join("out");

    // F1 sits three months out, so the default window leaves only F2 and
    // the query has no reachable positive.
    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["stats"]["queries_labeled"], 1);
    assert_eq!(json["data"]["stats"]["queries_qualifying"], 0);
    assert_eq!(json["data"]["stats"]["candidates_scored"], 1);
    assert!(json["data"]["summary"]["mrr"].is_null());
    assert!(json["data"]["summary"]["recall@1"].is_null());

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--no-window",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["options"]["window"], "disabled");
    assert_eq!(json["data"]["stats"]["candidates_scored"], 2);
    assert_eq!(json["data"]["summary"]["mrr"], 1.0);
}

#[test]
fn test_evaluate_fails_open_when_candidate_date_missing() {
    let fixture = E2EFixture::new();
    let rows = vec![
        canonical_row(
            "L1",
            "lost",
            "Wallet",
            "black leather wallet",
            "accessories",
            Some("2024-03-01"),
            Some("F1"),
        ),
        canonical_row(
            "F1",
            "found",
            "Wallet",
            "black leather wallet with zipper",
            "accessories",
            None,
            None,
        ),
        canonical_row(
            "F2",
            "found",
            "Umbrella",
            "blue compact",
            "accessories",
            Some("2024-03-03"),
            None,
        ),
    ];
    let data_path = fixture.write_file("items.jsonl", &jsonl(&rows));
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    // an undated candidate disables the window for the whole pool
    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["stats"]["candidates_scored"], 2);
    assert_eq!(json["data"]["summary"]["mrr"], 1.0);
}

#[test]
fn test_evaluate_min_df_can_empty_the_vocabulary() {
    let fixture = E2EFixture::new();
    let data_path = fixture.write_file("items.jsonl", &jsonl(&matched_catalog()));
    let out_dir = fixture.path().join("out");

    // four documents cannot satisfy a document-frequency floor of five
    fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--min-df",
            "5",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"error\":true"))
        .stdout(predicate::str::contains("\"code\":\"empty_vocabulary\""));

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--min-df",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["options"]["tfidf"]["min_doc_freq"], 1);
    assert_eq!(json["data"]["summary"]["mrr"], 1.0);
}

#[test]
fn test_evaluate_top_k_truncates_rows_not_metrics() {
    let fixture = E2EFixture::new();
    let rows = vec![
        canonical_row(
            "L1",
            "lost",
            "Wallet",
            "black leather wallet",
            "accessories",
            None,
            Some("F2"),
        ),
        canonical_row(
            "F1",
            "found",
            "Wallet",
            "black leather wallet",
            "accessories",
            None,
            None,
        ),
        canonical_row(
            "F2",
            "found",
            "Wallet",
            "black leather wallet monogrammed",
            "accessories",
            None,
            None,
        ),
    ];
    let data_path = fixture.write_file("items.jsonl", &jsonl(&rows));
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--top-k",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    // F1 repeats the query text verbatim and outranks the true match, so
    // the only saved row is a non-match while metrics still see rank 2.
    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["stats"]["candidates_scored"], 2);
    assert_eq!(json["data"]["summary"]["mrr"], 0.5);
    assert_eq!(json["data"]["summary"]["recall@1"], 0.0);
    assert_eq!(json["data"]["summary"]["recall@3"], 1.0);

    let results = std::fs::read_to_string(out_dir.join("tfidf_results.csv")).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("L1,F1,"));
    assert!(lines[1].ends_with(",1,0"));
}

#[test]
fn test_evaluate_config_file_sets_defaults() {
    let fixture = E2EFixture::new();
    fixture.write_file(
        "config.toml",
        r#"
[candidates]
days_window = "disabled"

[output]
results_file = "ranked.csv"
metrics_file = "scores.json"
"#,
    );
    let data_path = fixture.write_file("items.jsonl", &jsonl(&matched_catalog()));
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["options"]["window"], "disabled");
    assert!(out_dir.join("ranked.csv").exists());
    assert!(out_dir.join("scores.json").exists());
    assert!(!out_dir.join("tfidf_results.csv").exists());
}

#[test]
fn test_evaluate_env_overrides_beat_config_file() {
    let fixture = E2EFixture::new();
    fixture.write_file(
        "config.toml",
        r#"
[output]
results_file = "ranked.csv"
"#,
    );
    let data_path = fixture.write_file("items.jsonl", &jsonl(&matched_catalog()));
    let out_dir = fixture.path().join("out");

    let output = fixture
        .cmd()
        .env("LFMATCH_RESULTS_FILE", "env.csv")
        .args([
            "--robot",
            "evaluate",
            "--data",
            data_path.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    let results_path = json["data"]["results_path"].as_str().unwrap();
    assert!(results_path.ends_with("env.csv"));
    assert!(out_dir.join("env.csv").exists());
    assert!(!out_dir.join("ranked.csv").exists());
}
