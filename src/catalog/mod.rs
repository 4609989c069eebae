//! Item catalog: data model, input loaders, and the in-memory table.

pub mod item;
pub mod loader;
pub mod pairwise;
pub mod table;

pub use item::{compose_text, parse_item_date, Item, ItemKind, LabelEvidence};
pub use loader::{load_table, LoadedTable, SourceSchema};
pub use table::ItemTable;
