//! Read-only access to SQLite b-trees.
//!
//! Pages come from any [`litewalk_storage::pager::Pager`]; this crate turns
//! their bytes into [`page::Page`]s and [`record::Record`]s and walks them in
//! key order with [`cursor::TableCursor`] and [`cursor::IndexCursor`].

pub mod codecs;
pub mod cursor;
pub mod page;
pub mod record;
pub mod render;

pub use cursor::{BTreeReader, IndexCursor, PrefixMatches, ScanStats, ScanStatsSnapshot, TableCursor};
pub use page::{Cell, Page, PageType};
pub use record::{Record, RowId, Value};
