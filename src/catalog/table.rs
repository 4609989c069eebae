//! In-memory item table with id lookup and label resolution.

use std::collections::{BTreeSet, HashMap};

use crate::catalog::item::{Item, ItemKind, LabelEvidence};
use crate::error::{LfError, Result};

/// Validated, immutable collection of items for one evaluation run.
///
/// Row order is load order and is observable: queries are visited in row
/// order and candidate ties keep row order after ranking.
#[derive(Debug, Clone)]
pub struct ItemTable {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemTable {
    /// Build a table, rejecting duplicate ids.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (row, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), row).is_some() {
                return Err(LfError::ValidationFailed(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(Self { items, index })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&row| &self.items[row])
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Row indices of all items of `kind`, in row order.
    #[must_use]
    pub fn indices_of_kind(&self, kind: ItemKind) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.kind == kind)
            .map(|(row, _)| row)
            .collect()
    }

    #[must_use]
    pub fn count_of_kind(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }

    /// Ground-truth positive ids for `query`.
    ///
    /// Direct evidence yields exactly that id, whether or not it exists in
    /// the table. Group evidence scans opposite-kind rows sharing the group
    /// tag. No evidence yields the empty set.
    #[must_use]
    pub fn positives_for(&self, query: &Item) -> BTreeSet<String> {
        match &query.label {
            LabelEvidence::None => BTreeSet::new(),
            LabelEvidence::Direct(id) => BTreeSet::from([id.clone()]),
            LabelEvidence::Group(group) => {
                let opposite = query.kind.opposite();
                self.items
                    .iter()
                    .filter(|item| item.kind == opposite)
                    .filter(|item| item.group.as_deref() == Some(group.as_str()))
                    .map(|item| item.id.clone())
                    .collect()
            }
        }
    }
}
