//! E2E Scenario: Inspect Workflow Integration Tests
//!
//! Covers dataset summaries through the binary:
//! - canonical counts, labels, and date range in robot mode
//! - pairwise reshape counts
//! - human layout rendering
//! - dataset errors on the human path

use predicates::prelude::*;

use super::common::{canonical_row, jsonl, matched_catalog, PAIRWISE_DATASET};
use super::fixture::E2EFixture;

#[test]
fn test_inspect_canonical_counts_and_date_range() {
    let fixture = E2EFixture::new();
    let data_path = fixture.write_file("items.jsonl", &jsonl(&matched_catalog()));

    let output = fixture
        .cmd()
        .args(["--robot", "inspect", "--data", data_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["schema"], "canonical");
    assert_eq!(json["data"]["total_items"], 4);
    assert_eq!(json["data"]["lost_items"], 2);
    assert_eq!(json["data"]["found_items"], 2);
    assert_eq!(json["data"]["dated_items"], 4);
    assert_eq!(json["data"]["labeled_lost"], 2);
    assert_eq!(json["data"]["direct_labels"], 2);
    assert_eq!(json["data"]["group_labels"], 0);
    assert_eq!(json["data"]["earliest_date"], "2024-03-01");
    assert_eq!(json["data"]["latest_date"], "2024-03-04");
}

#[test]
fn test_inspect_pairwise_reports_reshaped_counts() {
    let fixture = E2EFixture::new();
    let data_path = fixture.write_file("pairs.csv", PAIRWISE_DATASET);

    let output = fixture
        .cmd()
        .args(["--robot", "inspect", "--data", data_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = E2EFixture::robot_json(&output);
    assert_eq!(json["data"]["schema"], "pairwise");
    assert_eq!(json["data"]["total_items"], 4);
    assert_eq!(json["data"]["lost_items"], 2);
    assert_eq!(json["data"]["labeled_lost"], 2);
}

#[test]
fn test_inspect_human_layout_lists_counts() {
    let fixture = E2EFixture::new();
    let rows = vec![
        canonical_row("L1", "lost", "Scarf", "red wool scarf", "clothing", None, None),
        canonical_row("F1", "found", "Scarf", "red scarf", "clothing", None, None),
        canonical_row("F2", "found", "Glove", "left glove", "clothing", None, None),
    ];
    let data_path = fixture.write_file("items.jsonl", &jsonl(&rows));

    fixture
        .cmd()
        .args(["inspect", "--data", data_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset inspection"))
        .stdout(predicate::str::contains("canonical"))
        .stdout(predicate::str::contains("1 / 2"));
}

#[test]
fn test_inspect_missing_file_reports_dataset_error() {
    let fixture = E2EFixture::new();
    let missing = fixture.path().join("nowhere.jsonl");

    fixture
        .cmd()
        .args(["inspect", "--data", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataset error in"));
}
