//! Dataset builders shared across integration tests.
//!
//! The wallet/umbrella catalog is deliberately small and fully matched:
//! each lost item's true counterpart shares its name and most description
//! tokens, so with default options both queries rank their match first.

use serde_json::{json, Value};

/// One canonical row. Date and label columns are optional, like the format.
pub fn canonical_row(
    id: &str,
    kind: &str,
    name: &str,
    description: &str,
    category: &str,
    date: Option<&str>,
    true_match: Option<&str>,
) -> Value {
    let mut row = json!({
        "itemId": id,
        "type": kind,
        "name": name,
        "description": description,
        "category": category,
    });
    if let Some(date) = date {
        row["lostFoundDate"] = json!(date);
    }
    if let Some(true_match) = true_match {
        row["trueMatchId"] = json!(true_match);
    }
    row
}

/// Serialize rows as JSON Lines, one compact object per line.
pub fn jsonl(rows: &[Value]) -> String {
    let mut text = String::new();
    for row in rows {
        text.push_str(&row.to_string());
        text.push('\n');
    }
    text
}

/// Two lost items, two found items, every query labeled and dated within
/// the default candidate window.
pub fn matched_catalog() -> Vec<Value> {
    vec![
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
            "L2",
            "lost",
            "Umbrella",
            "blue compact umbrella",
            "accessories",
            Some("2024-03-02"),
            Some("F2"),
        ),
        canonical_row(
            "F1",
            "found",
            "Wallet",
            "black leather wallet with zipper",
            "accessories",
            Some("2024-03-03"),
            None,
        ),
        canonical_row(
            "F2",
            "found",
            "Umbrella",
            "small blue compact umbrella",
            "accessories",
            Some("2024-03-04"),
            None,
        ),
    ]
}

/// Pairwise export of the same catalog: the full lost-by-found cross with
/// 0/1 labels. Descriptions repeat with a stable category and date so the
/// reshape collapses them into one item per side.
pub const PAIRWISE_DATASET: &str = "\
pair_id,lost_description,found_description,category,date_lost,date_found,label
p1,black leather wallet,black wallet with zipper,accessories,2024-03-01,2024-03-02,1
p2,black leather wallet,blue compact umbrella,accessories,2024-03-01,2024-03-04,0
p3,blue small umbrella,blue compact umbrella,accessories,2024-03-03,2024-03-04,1
p4,blue small umbrella,black wallet with zipper,accessories,2024-03-03,2024-03-02,0
";
