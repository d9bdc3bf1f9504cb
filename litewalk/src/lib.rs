//! litewalk: read SQLite files page by page and join movie credits through
//! their indexes.
//!
//! This crate is the entrypoint for the toolkit. It re-exports the layers
//! underneath it so callers need a single dependency.
//!
//! # Quick Start
//!
//! ```no_run
//! use litewalk::{Database, find_people_covering_index};
//!
//! let db = Database::open("database.db")?;
//! let catalog = db.catalog()?;
//! find_people_covering_index(&db, &catalog, "Monsters, Inc.")?;
//! println!("{}", db.report());
//! # Ok::<(), litewalk::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **Errors** (`litewalk-result`): one `Error` enum for every layer.
//! - **Storage** (`litewalk-storage`): file header and pagers.
//! - **B-trees** (`litewalk-btree`): page and record decoding, cursors.
//! - **Tables** (`litewalk-table`): database handle, catalog, work report.
//! - **Joins** (`litewalk-join`): title lookups and people joins.

pub use litewalk_result::{Error, Result};

pub use litewalk_table::{Catalog, CatalogEntry, Database, Report, SchemaObjectKind};

pub use litewalk_join::{
    JoinStrategy, MovieSchema, PersonRow, Row, TitleLookup, TitleRow, collect_people,
    collect_titles, find_people, find_people_covering_index, for_each_person, scan_for_title,
    stab_for_title,
};

pub mod storage {
    //! File header and pager implementations.

    pub use litewalk_storage::pager::{
        FilePager, InstrumentedPager, IoStats, IoStatsSnapshot, MemPager, Pager,
    };
    pub use litewalk_storage::{DatabaseHeader, PageNumber, TextEncoding};
}

pub mod btree {
    //! Pages, records and cursors.

    pub use litewalk_btree::{
        BTreeReader, Cell, IndexCursor, Page, PageType, Record, RowId, ScanStats,
        ScanStatsSnapshot, TableCursor, Value,
    };
}
