//! Candidate pool selection for a query.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::item::Item;
use crate::catalog::table::ItemTable;

/// Days a lost and a found date may lie apart by default.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Time window for candidate filtering, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Disabled,
    Days(u32),
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::Days(DEFAULT_WINDOW_DAYS)
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Days(days) => write!(f, "{days}"),
        }
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("disabled") {
            return Ok(Self::Disabled);
        }
        trimmed
            .parse::<u32>()
            .map(Self::Days)
            .map_err(|_| format!("invalid window {raw:?} (expected a day count or \"disabled\")"))
    }
}

// In config files the window is either a day count or the literal string
// "disabled", so (de)serialization does not use the enum shape.
impl Serialize for DateWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_str("disabled"),
            Self::Days(days) => serializer.serialize_u32(*days),
        }
    }
}

impl<'de> Deserialize<'de> for DateWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Days(u32),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Days(days) => Ok(Self::Days(days)),
            Raw::Text(text) => Self::from_str(&text).map_err(de::Error::custom),
        }
    }
}

/// Row indices of eligible candidates for `query`, in table row order.
///
/// The base pool is every opposite-kind row. Date filtering is fail-open
/// and never errors: a disabled window, a query without a parsed date, or
/// any pool candidate without a parsed date leaves the base pool untouched.
/// Otherwise candidates stay when their absolute day distance from the
/// query is at most the window, boundary inclusive.
#[must_use]
pub fn select_candidates(table: &ItemTable, query: &Item, window: DateWindow) -> Vec<usize> {
    let pool = table.indices_of_kind(query.kind.opposite());

    let DateWindow::Days(days) = window else {
        return pool;
    };
    let Some(query_date) = query.date else {
        return pool;
    };
    let dated: Option<Vec<(usize, NaiveDate)>> = pool
        .iter()
        .map(|&row| table.items()[row].date.map(|date| (row, date)))
        .collect();
    let Some(dated) = dated else {
        return pool;
    };

    dated
        .into_iter()
        .filter(|&(_, date)| {
            date.signed_duration_since(query_date).num_days().abs() <= i64::from(days)
        })
        .map(|(row, _)| row)
        .collect()
}
