//! Schema catalog: object name to b-tree root page.
//!
//! Built by scanning the schema table on page 1, whose rows are
//! `(type, name, tbl_name, rootpage, sql)`. Views and triggers have no
//! b-tree (root page 0) and are listed but never resolve to a root.

use crate::database::{Database, SCHEMA_ROOT_PAGE};
use litewalk_btree::{Record, RowId, Value};
use litewalk_result::{Error, Result};
use litewalk_storage::PageNumber;
use litewalk_storage::pager::Pager;
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaObjectKind {
    Table,
    Index,
    View,
    Trigger,
}

impl SchemaObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaObjectKind::Table => "table",
            SchemaObjectKind::Index => "index",
            SchemaObjectKind::View => "view",
            SchemaObjectKind::Trigger => "trigger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "table" => Some(SchemaObjectKind::Table),
            "index" => Some(SchemaObjectKind::Index),
            "view" => Some(SchemaObjectKind::View),
            "trigger" => Some(SchemaObjectKind::Trigger),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the schema table.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub kind: SchemaObjectKind,
    pub name: String,
    /// Table the object belongs to; equal to `name` for tables.
    pub table_name: String,
    /// `None` for views and triggers.
    pub root_page: Option<PageNumber>,
    /// Creation SQL. Absent for automatic indexes.
    pub sql: Option<String>,
}

impl CatalogEntry {
    fn from_record(rowid: RowId, record: &Record) -> Result<Self> {
        let text = |idx: usize, what: &str| -> Result<String> {
            match record.get(idx) {
                Some(Value::Text(s)) => Ok(s.clone()),
                other => Err(Error::corrupt(format_args!(
                    "schema row {rowid}: {what} should be text, found {other:?}"
                ))),
            }
        };

        let kind_text = text(0, "type")?;
        let kind = SchemaObjectKind::parse(&kind_text).ok_or_else(|| {
            Error::corrupt(format_args!("schema row {rowid}: unknown object type '{kind_text}'"))
        })?;
        let name = text(1, "name")?;
        let table_name = text(2, "tbl_name")?;
        let root_page = match record.get(3) {
            Some(Value::Integer(0)) | Some(Value::Null) | None => None,
            Some(Value::Integer(n)) => Some(PageNumber::try_from(*n).map_err(|_| {
                Error::corrupt(format_args!("schema row {rowid}: root page {n} out of range"))
            })?),
            Some(other) => {
                return Err(Error::corrupt(format_args!(
                    "schema row {rowid}: root page should be an integer, found {other}"
                )));
            }
        };
        let sql = match record.get(4) {
            Some(Value::Text(s)) => Some(s.clone()),
            _ => None,
        };

        Ok(Self {
            kind,
            name,
            table_name,
            root_page,
            sql,
        })
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}{:<32}", self.kind, self.name)?;
        match self.root_page {
            Some(root) => write!(f, "root {root}"),
            None => f.write_str("no b-tree"),
        }
    }
}

/// Name to root-page mapping for every b-tree in the file.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    roots: FxHashMap<String, PageNumber>,
}

impl Catalog {
    /// Scan the schema table of `db`.
    pub fn load<P: Pager>(db: &Database<P>) -> Result<Self> {
        let mut catalog = Catalog::default();
        for row in db.step_table(SCHEMA_ROOT_PAGE, RowId::MIN)? {
            let (rowid, record) = row?;
            catalog.insert(CatalogEntry::from_record(rowid, &record)?);
        }
        tracing::debug!(
            objects = catalog.entries.len(),
            btrees = catalog.roots.len(),
            "loaded schema catalog"
        );
        Ok(catalog)
    }

    /// Catalog from explicit `(name, root)` pairs, for callers that already
    /// know where their b-trees live.
    pub fn from_roots<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = (S, PageNumber)>,
        S: Into<String>,
    {
        let mut catalog = Catalog::default();
        for (name, root) in roots {
            let name = name.into();
            catalog.insert(CatalogEntry {
                kind: SchemaObjectKind::Table,
                table_name: name.clone(),
                name,
                root_page: Some(root),
                sql: None,
            });
        }
        catalog
    }

    fn insert(&mut self, entry: CatalogEntry) {
        if let Some(root) = entry.root_page {
            if self.roots.contains_key(&entry.name) {
                tracing::warn!(name = %entry.name, root, "duplicate schema object name; keeping the first");
            } else {
                self.roots.insert(entry.name.clone(), root);
            }
        }
        self.entries.push(entry);
    }

    /// Root page of the b-tree named `name`.
    pub fn root(&self, name: &str) -> Result<PageNumber> {
        self.get(name)
            .ok_or_else(|| Error::CatalogError(format!("no table or index named '{name}'")))
    }

    pub fn get(&self, name: &str) -> Option<PageNumber> {
        self.roots.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roots.contains_key(name)
    }

    /// Schema rows in file order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_row(kind: &str, name: &str, root: Value) -> Record {
        Record::new(vec![
            Value::from(kind),
            Value::from(name),
            Value::from(name),
            root,
            Value::Null,
        ])
    }

    #[test]
    fn views_have_no_root() {
        let view = CatalogEntry::from_record(3, &schema_row("view", "v", Value::Integer(0))).unwrap();
        assert_eq!(view.kind, SchemaObjectKind::View);
        assert_eq!(view.root_page, None);
        assert_eq!(view.sql, None);

        let mut catalog = Catalog::default();
        catalog.insert(view);
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains("v"));
        assert!(matches!(catalog.root("v"), Err(Error::CatalogError(_))));
    }

    #[test]
    fn malformed_rows_are_corrupt() {
        let bad_kind = schema_row("sequence", "s", Value::Integer(2));
        assert!(matches!(
            CatalogEntry::from_record(1, &bad_kind),
            Err(Error::Corrupt(msg)) if msg.contains("sequence")
        ));

        let bad_root = schema_row("table", "t", Value::from("two"));
        assert!(matches!(CatalogEntry::from_record(1, &bad_root), Err(Error::Corrupt(_))));

        let negative = schema_row("table", "t", Value::Integer(-4));
        assert!(matches!(CatalogEntry::from_record(1, &negative), Err(Error::Corrupt(_))));
    }

    #[test]
    fn first_duplicate_wins() {
        let catalog = Catalog::from_roots([("titles", 2), ("titles", 9), ("people", 4)]);
        assert_eq!(catalog.root("titles").unwrap(), 2);
        assert_eq!(catalog.get("people"), Some(4));
        assert_eq!(catalog.entries().len(), 3);
    }

    #[test]
    fn entry_display() {
        let entry = CatalogEntry::from_record(1, &schema_row("index", "ix", Value::Integer(12))).unwrap();
        assert_eq!(entry.to_string(), format!("index   {:<32}root 12", "ix"));
    }

    #[test]
    fn kind_honours_width() {
        assert_eq!(format!("{:<8}|", SchemaObjectKind::Table), "table   |");
        assert_eq!(format!("{:>7}", SchemaObjectKind::View), "   view");
        assert_eq!(SchemaObjectKind::Trigger.to_string(), "trigger");
    }
}
