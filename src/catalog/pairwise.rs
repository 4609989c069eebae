//! Reshape of the pairwise source schema into the canonical item catalog.
//!
//! Some source exports arrive as one row per (lost, found) pair with a 0/1
//! label instead of one row per item. This module deduplicates each side
//! into its own catalog, synthesizes stable ids, and propagates the pair
//! labels as direct match evidence on the lost side.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::catalog::item::{compose_text, parse_item_date, Item, ItemKind, LabelEvidence};
use crate::error::{LfError, Result};

/// One row of the pairwise source schema, cells as read.
#[derive(Debug, Clone, Default)]
pub struct PairRecord {
    pub lost_description: String,
    pub found_description: String,
    pub category: String,
    pub date_lost: String,
    pub date_found: String,
    pub label: String,
}

/// Column names that identify the pairwise schema.
pub const PAIRWISE_COLUMNS: [&str; 7] = [
    "pair_id",
    "lost_description",
    "found_description",
    "category",
    "date_lost",
    "date_found",
    "label",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CatalogKey {
    description: String,
    category: String,
    date: Option<NaiveDate>,
}

#[derive(Debug)]
struct CatalogEntry {
    description: String,
    category: String,
    date: Option<NaiveDate>,
}

/// Deduplicated catalog for one side of the pairs, ids assigned in
/// first-seen order.
struct SideCatalog {
    prefix: &'static str,
    entries: Vec<CatalogEntry>,
    seen: HashMap<CatalogKey, usize>,
}

impl SideCatalog {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            entries: Vec::new(),
            seen: HashMap::new(),
        }
    }

    fn insert(&mut self, description: &str, category: &str, date: Option<NaiveDate>) {
        let key = CatalogKey {
            description: description.to_string(),
            category: category.to_string(),
            date,
        };
        self.seen.entry(key).or_insert_with(|| {
            self.entries.push(CatalogEntry {
                description: description.to_string(),
                category: category.to_string(),
                date,
            });
            self.entries.len() - 1
        });
    }

    fn id_for(&self, slot: usize) -> String {
        format!("{}{}", self.prefix, slot + 1)
    }
}

/// Turn pairwise rows into canonical items: the lost catalog first, then the
/// found catalog, so synthesized row order is reproducible.
///
/// Each side is deduplicated by (description, category, parsed date). For a
/// lost description, the first row carrying label 1 decides its single
/// direct positive; a description reused by several found entries resolves
/// to the last entry with that description.
pub fn reshape(records: &[PairRecord]) -> Result<Vec<Item>> {
    let mut lost = SideCatalog::new("L");
    let mut found = SideCatalog::new("F");
    let mut positive_desc: HashMap<String, String> = HashMap::new();

    for (row, record) in records.iter().enumerate() {
        lost.insert(
            &record.lost_description,
            &record.category,
            parse_item_date(&record.date_lost),
        );
        found.insert(
            &record.found_description,
            &record.category,
            parse_item_date(&record.date_found),
        );

        if parse_label(&record.label, row)? {
            positive_desc
                .entry(record.lost_description.clone())
                .or_insert_with(|| record.found_description.clone());
        }
    }

    let mut found_id_by_desc: HashMap<&str, String> = HashMap::new();
    for (slot, entry) in found.entries.iter().enumerate() {
        found_id_by_desc.insert(entry.description.as_str(), found.id_for(slot));
    }

    let mut items = Vec::with_capacity(lost.entries.len() + found.entries.len());
    for (slot, entry) in lost.entries.iter().enumerate() {
        let true_match = positive_desc
            .get(&entry.description)
            .and_then(|desc| found_id_by_desc.get(desc.as_str()));
        items.push(Item {
            id: lost.id_for(slot),
            kind: ItemKind::Lost,
            text: compose_text("", &entry.description, &entry.category),
            date: entry.date,
            label: LabelEvidence::resolve(true_match.map(String::as_str), None),
            group: None,
        });
    }
    for (slot, entry) in found.entries.iter().enumerate() {
        items.push(Item {
            id: found.id_for(slot),
            kind: ItemKind::Found,
            text: compose_text("", &entry.description, &entry.category),
            date: entry.date,
            label: LabelEvidence::None,
            group: None,
        });
    }
    Ok(items)
}

/// A pair is positive when its numeric label truncates to 1.
fn parse_label(raw: &str, row: usize) -> Result<bool> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        LfError::ValidationFailed(format!("pairwise row {}: label {raw:?} is not numeric", row + 1))
    })?;
    Ok(value.trunc() == 1.0)
}
