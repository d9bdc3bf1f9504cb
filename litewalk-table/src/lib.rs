//! Table-level view of a SQLite file.
//!
//! [`Database`] owns the pager stack and the work counters; [`Catalog`]
//! resolves schema object names to b-tree root pages; [`Report`] is the
//! summary of work a query did.

pub mod catalog;
pub mod database;
pub mod report;

pub use catalog::{Catalog, CatalogEntry, SchemaObjectKind};
pub use database::{Database, SCHEMA_ROOT_PAGE};
pub use report::Report;
