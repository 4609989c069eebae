//! Item data model for the lost & found catalog.
//!
//! Everything downstream of loading works with [`Item`] values: composed
//! retrieval text, a pre-parsed calendar date, and ground-truth label
//! evidence resolved once. Loaders are responsible for producing these;
//! nothing later in the pipeline re-reads raw source fields.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side of the matching problem a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

impl ItemKind {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Lost => Self::Found,
            Self::Found => Self::Lost,
        }
    }

    /// Parse a raw `type` cell. Case and surrounding whitespace are ignored;
    /// anything other than lost/found is a schema violation for the caller.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "lost" => Some(Self::Lost),
            "found" => Some(Self::Found),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lost => write!(f, "lost"),
            Self::Found => write!(f, "found"),
        }
    }
}

/// Ground-truth evidence attached to an item, resolved once at load time.
///
/// `Direct` names the single correct counterpart id. `Group` marks
/// membership in a match group whose opposite-kind members are all correct.
/// Direct evidence wins when a record carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelEvidence {
    None,
    Direct(String),
    Group(String),
}

impl LabelEvidence {
    #[must_use]
    pub fn resolve(true_match_id: Option<&str>, match_group_id: Option<&str>) -> Self {
        match (non_empty(true_match_id), non_empty(match_group_id)) {
            (Some(id), _) => Self::Direct(id),
            (None, Some(group)) => Self::Group(group),
            (None, None) => Self::None,
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One normalized lost-or-found report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique within a table; uniqueness is enforced at load.
    pub id: String,
    pub kind: ItemKind,
    /// Composed, case-folded retrieval text.
    pub text: String,
    /// Calendar day of the loss or the find, when the source value parsed.
    pub date: Option<NaiveDate>,
    /// Evidence used when this item is the query side.
    pub label: LabelEvidence,
    /// Raw match-group tag; group evidence on a query matches against this.
    pub group: Option<String>,
}

impl Item {
    #[must_use]
    pub const fn has_valid_date(&self) -> bool {
        self.date.is_some()
    }
}

/// Compose the single retrieval text field from the source columns.
///
/// The fixed sentence frame keeps category tokens in the same lexical space
/// as free-text descriptions. Output is fully lower-cased.
#[must_use]
pub fn compose_text(name: &str, description: &str, category: &str) -> String {
    format!("{name}. {description}. Category: {category}").to_lowercase()
}

/// Lenient calendar-day parse. Datetime strings keep only their date part;
/// anything unrecognized is `None`, never an error.
#[must_use]
pub fn parse_item_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
