//! Single-table lookups of a title by its primary title.

use crate::{MovieSchema, Row, TitleRow};
use litewalk_btree::{RowId, Value};
use litewalk_result::{Error, Result};
use litewalk_storage::pager::Pager;
use litewalk_table::{Catalog, Database};
use std::fmt;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TitleLookup {
    /// Full scan of `titles`, filtering on the primary title.
    Scan,
    /// Walk `titles_by_primary_title` and stab `titles` for each match.
    #[default]
    Index,
}

impl fmt::Display for TitleLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleLookup::Scan => write!(f, "scan"),
            TitleLookup::Index => write!(f, "index"),
        }
    }
}

/// Print every `titles` row named `title`, found by a full table scan.
pub fn scan_for_title<P: Pager, W: Write>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
    out: &mut W,
) -> Result<usize> {
    print_titles(db, catalog, title, TitleLookup::Scan, out)
}

/// Print every `titles` row named `title`, found through the title index.
pub fn stab_for_title<P: Pager, W: Write>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
    out: &mut W,
) -> Result<usize> {
    print_titles(db, catalog, title, TitleLookup::Index, out)
}

fn print_titles<P: Pager, W: Write>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
    lookup: TitleLookup,
    out: &mut W,
) -> Result<usize> {
    let schema = MovieSchema::default();
    for_each_title(db, catalog, &schema, title, lookup, &mut |row| {
        writeln!(out, "{row}")?;
        Ok(())
    })
}

pub fn collect_titles<P: Pager>(
    db: &Database<P>,
    catalog: &Catalog,
    schema: &MovieSchema,
    title: &str,
    lookup: TitleLookup,
) -> Result<Vec<TitleRow>> {
    let mut rows = Vec::new();
    for_each_title(db, catalog, schema, title, lookup, &mut |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}

fn for_each_title<P: Pager>(
    db: &Database<P>,
    catalog: &Catalog,
    schema: &MovieSchema,
    title: &str,
    lookup: TitleLookup,
    emit: &mut dyn FnMut(Row) -> Result<()>,
) -> Result<usize> {
    tracing::debug!(%lookup, title, "looking up title");
    let titles = catalog.root(&schema.titles)?;
    let mut found = 0;

    match lookup {
        TitleLookup::Scan => {
            for row in db.step_table(titles, RowId::MIN)? {
                let (rowid, record) = row?;
                if schema.has_primary_title(&record, title) {
                    found += 1;
                    emit(Row { rowid, record })?;
                }
            }
        }
        TitleLookup::Index => {
            let index = catalog.root(&schema.titles_by_primary_title)?;
            for entry in db
                .step_index(index, vec![Value::from(title)])?
                .while_prefix_matches()
            {
                let title_id = entry?.integer_at(MovieSchema::TITLE_INDEX_TITLE_ID, "title_id")?;
                let record = db
                    .stab_table(titles, title_id)?
                    .ok_or_else(|| Error::dangling(&schema.titles, title_id))?;
                found += 1;
                emit(Row {
                    rowid: title_id,
                    record,
                })?;
            }
        }
    }
    Ok(found)
}
