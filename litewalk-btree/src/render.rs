//! Human-readable page dumps.
//!
//! One header line per page, then one line per cell:
//!
//! ```text
//! 3 is an interior index page with 2 cells and right child 9
//! cell has left child 4 and is an index mapping 5 -> 17
//! cell has left child 7 and 3 fields
//! cell ("Inception", 5)
//! ```

use crate::page::{Cell, Page, PageType};
use crate::record::{Record, Value, write_real};
use std::fmt;

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells.len();
        let kind = match self.page_type {
            PageType::IndexInterior => "an interior index",
            PageType::TableInterior => "an interior table",
            PageType::IndexLeaf => "a leaf index",
            PageType::TableLeaf => "a leaf table",
        };
        write!(f, "{} is {kind} page with {cells} cells", self.number)?;
        if let Some(right) = self.right_child {
            write!(f, " and right child {right}")?;
        }
        for cell in &self.cells {
            write!(f, "\n{cell}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::TableInterior { left_child, rowid } => {
                write!(f, "cell has left child {left_child} and rowid {rowid}")
            }
            Cell::IndexInterior { left_child, record } => match integer_pair(record) {
                Some((key, rowid)) => write!(
                    f,
                    "cell has left child {left_child} and is an index mapping {key} -> {rowid}"
                ),
                None => {
                    writeln!(f, "cell has left child {left_child} and {} fields", record.len())?;
                    write_fields(f, None, record)
                }
            },
            Cell::IndexLeaf { record } => match integer_pair(record) {
                Some((key, rowid)) => write!(f, "cell is an index mapping {key} -> {rowid}"),
                None => write_fields(f, None, record),
            },
            Cell::TableLeaf { rowid, record } => write_fields(f, Some(*rowid), record),
        }
    }
}

fn integer_pair(record: &Record) -> Option<(i64, i64)> {
    match record.values() {
        [Value::Integer(a), Value::Integer(b)] => Some((*a, *b)),
        _ => None,
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, rowid: Option<i64>, record: &Record) -> fmt::Result {
    f.write_str("cell (")?;
    if let Some(rowid) = rowid {
        write!(f, "{rowid}: ")?;
    }
    for (i, value) in record.values().iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match value {
            Value::Null => f.write_str("NULL")?,
            Value::Blob(bytes) => write!(f, "{}-byte blob", bytes.len())?,
            // Schema SQL spans lines; fence it so the dump stays readable.
            Value::Text(s) if s.contains('\n') => write!(f, "\"\"\"\n{s}\n\"\"\"")?,
            Value::Text(s) => write!(f, "\"{s}\"")?,
            Value::Integer(v) => write!(f, "{v}")?,
            Value::Real(v) => write_real(f, *v)?,
        }
    }
    f.write_str(")")
}
