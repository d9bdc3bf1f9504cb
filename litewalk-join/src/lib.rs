//! Joins between titles, crew and people.
//!
//! Every entry point takes a [`Database`](litewalk_table::Database) and a
//! [`Catalog`](litewalk_table::Catalog) and resolves the
//! b-trees it needs by name through a [`MovieSchema`]. Four strategies answer
//! "who is credited on this title"; they differ only in which b-trees they
//! read, which the database's [`Report`](litewalk_table::Report) makes
//! visible:
//!
//! | strategy | titles | crew | people |
//! |---|---|---|---|
//! | [`JoinStrategy::NestedScan`] | full scan | full scan per title | stab |
//! | [`JoinStrategy::CrewDriven`] | stab per crew row | full scan | stab |
//! | [`JoinStrategy::Index`] | index | index, then stab base row | stab |
//! | [`JoinStrategy::CoveringIndex`] | index | index only | stab |
#![forbid(unsafe_code)]

mod people;
mod schema;
mod titles;

pub use people::{collect_people, find_people, find_people_covering_index, for_each_person};
pub use schema::MovieSchema;
pub use titles::{TitleLookup, collect_titles, scan_for_title, stab_for_title};

use litewalk_btree::{Record, RowId};
use litewalk_result::Error;
use std::fmt;
use std::str::FromStr;

/// How to find the people credited on a title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinStrategy {
    /// Scan `titles`; for every match scan all of `crew`.
    NestedScan,
    /// Scan `crew` once and stab `titles` for each credit.
    CrewDriven,
    /// Walk both indexes and stab each crew base row for its person ID.
    Index,
    /// Walk both indexes; the crew index already holds the person ID.
    #[default]
    CoveringIndex,
}

impl JoinStrategy {
    pub const ALL: [JoinStrategy; 4] = [
        JoinStrategy::NestedScan,
        JoinStrategy::CrewDriven,
        JoinStrategy::Index,
        JoinStrategy::CoveringIndex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JoinStrategy::NestedScan => "nested-scan",
            JoinStrategy::CrewDriven => "crew-driven",
            JoinStrategy::Index => "index",
            JoinStrategy::CoveringIndex => "covering-index",
        }
    }
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JoinStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::InvalidArgumentError(format!(
                    "unknown join strategy '{s}' (expected one of: nested-scan, crew-driven, index, covering-index)"
                ))
            })
    }
}

/// A table row handed back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub rowid: RowId,
    pub record: Record,
}

/// A row of `people`.
pub type PersonRow = Row;
/// A row of `titles`.
pub type TitleRow = Row;

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rowid: {}, row: {}", self.rowid, self.record)
    }
}
