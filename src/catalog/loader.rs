//! Tabular input loading: JSONL and CSV, canonical or pairwise schema.
//!
//! Both readers produce untyped rows first, because schema detection has to
//! inspect column names before any record can be interpreted. Cells are
//! strings; absent, null, and nested values all count as missing.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::item::{compose_text, parse_item_date, Item, ItemKind, LabelEvidence};
use crate::catalog::pairwise::{self, PairRecord, PAIRWISE_COLUMNS};
use crate::catalog::table::ItemTable;
use crate::error::{LfError, Result};

/// Columns every canonical dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["itemId", "type", "name", "description", "category"];

/// Which source layout a file was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSchema {
    /// One row per item with ids, kinds, and optional label columns.
    Canonical,
    /// One row per (lost, found) pair with a 0/1 label.
    Pairwise,
}

impl std::fmt::Display for SourceSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonical => write!(f, "canonical"),
            Self::Pairwise => write!(f, "pairwise"),
        }
    }
}

/// A validated table plus the schema it was read from.
#[derive(Debug)]
pub struct LoadedTable {
    pub table: ItemTable,
    pub schema: SourceSchema,
}

type Row = BTreeMap<String, String>;

/// Load, detect the schema, validate, and build the item table.
pub fn load_table(path: &Path) -> Result<LoadedTable> {
    let rows = read_rows(path)?;
    debug!(rows = rows.len(), path = %path.display(), "read input rows");

    if is_pairwise(&rows) {
        info!("detected pairwise schema, reshaping into item catalog");
        let records = pairwise_records(&rows);
        let items = pairwise::reshape(&records)?;
        Ok(LoadedTable {
            table: ItemTable::new(items)?,
            schema: SourceSchema::Pairwise,
        })
    } else {
        validate_columns(&rows)?;
        let items = canonical_items(&rows)?;
        Ok(LoadedTable {
            table: ItemTable::new(items)?,
            schema: SourceSchema::Canonical,
        })
    }
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => read_csv_rows(path),
        "jsonl" | "ndjson" => read_jsonl_rows(path),
        other => Err(LfError::dataset(
            path,
            format!("unsupported input format {other:?} (expected .csv, .jsonl, or .ndjson)"),
        )),
    }
}

fn is_pairwise(rows: &[Row]) -> bool {
    PAIRWISE_COLUMNS
        .iter()
        .all(|column| rows.iter().any(|row| row.contains_key(*column)))
}

fn validate_columns(rows: &[Row]) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !rows.iter().any(|row| row.contains_key(**column)))
        .copied()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LfError::ValidationFailed(format!(
            "missing required columns: {}",
            missing.join(", ")
        )))
    }
}

fn canonical_items(rows: &[Row]) -> Result<Vec<Item>> {
    let mut items = Vec::with_capacity(rows.len());
    let mut bad_kinds: Vec<String> = Vec::new();

    for (number, row) in rows.iter().enumerate() {
        let id = cell(row, "itemId").trim();
        if id.is_empty() {
            return Err(LfError::ValidationFailed(format!(
                "row {}: missing itemId",
                number + 1
            )));
        }

        let kind_raw = cell(row, "type");
        let Some(kind) = ItemKind::parse(kind_raw) else {
            let normalized = kind_raw.trim().to_lowercase();
            if !bad_kinds.contains(&normalized) {
                bad_kinds.push(normalized);
            }
            continue;
        };

        items.push(Item {
            id: id.to_string(),
            kind,
            text: compose_text(cell(row, "name"), cell(row, "description"), cell(row, "category")),
            date: parse_item_date(cell(row, "lostFoundDate")),
            label: LabelEvidence::resolve(
                row.get("trueMatchId").map(String::as_str),
                row.get("matchGroupId").map(String::as_str),
            ),
            group: row
                .get("matchGroupId")
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        });
    }

    if bad_kinds.is_empty() {
        Ok(items)
    } else {
        Err(LfError::ValidationFailed(format!(
            "invalid values in type column: {bad_kinds:?} (expected lost or found)"
        )))
    }
}

fn pairwise_records(rows: &[Row]) -> Vec<PairRecord> {
    rows.iter()
        .map(|row| PairRecord {
            lost_description: cell(row, "lost_description").to_string(),
            found_description: cell(row, "found_description").to_string(),
            category: cell(row, "category").to_string(),
            date_lost: cell(row, "date_lost").to_string(),
            date_found: cell(row, "date_found").to_string(),
            label: cell(row, "label").to_string(),
        })
        .collect()
}

fn cell<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map_or("", String::as_str)
}

fn read_jsonl_rows(path: &Path) -> Result<Vec<Row>> {
    let file =
        File::open(path).map_err(|err| LfError::dataset(path, format!("open: {err}")))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|err| LfError::dataset(path, format!("line {}: {err}", number + 1)))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|err| LfError::dataset(path, format!("line {}: {err}", number + 1)))?;
        let serde_json::Value::Object(fields) = value else {
            return Err(LfError::dataset(
                path,
                format!("line {}: expected a JSON object", number + 1),
            ));
        };

        let mut row = Row::new();
        for (key, value) in fields {
            if let Some(cell) = scalar_cell(&value) {
                row.insert(key, cell);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Scalar JSON values become cells; null, arrays, and objects are absent.
fn scalar_cell(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Row>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| LfError::dataset(path, format!("read: {err}")))?;
    let mut records = parse_csv(&raw).map_err(|message| LfError::dataset(path, message))?;
    if records.is_empty() {
        return Err(LfError::dataset(path, "empty file, expected a header row"));
    }

    let header = records.remove(0);
    let mut rows = Vec::with_capacity(records.len());
    for (number, record) in records.into_iter().enumerate() {
        if record.len() != header.len() {
            return Err(LfError::dataset(
                path,
                format!(
                    "record {}: has {} fields, header has {}",
                    number + 1,
                    record.len(),
                    header.len()
                ),
            ));
        }
        rows.push(header.iter().cloned().zip(record).collect());
    }
    Ok(rows)
}

/// Minimal RFC 4180 reader: quoted fields may contain commas, doubled
/// quotes, and line breaks. Both LF and CRLF records are accepted.
fn parse_csv(raw: &str) -> std::result::Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
