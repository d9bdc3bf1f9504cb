//! Ordered, lazy cursors over table and index b-trees.
//!
//! A cursor is created with a seek key and walks the tree depth first,
//! loading one page at a time as it descends:
//!
//! - [`TableCursor`] yields `(rowid, record)` for every row whose rowid is
//!   at least the seek rowid, in ascending rowid order.
//! - [`IndexCursor`] yields every entry whose leading fields compare at or
//!   after the seek key, in index order. Entries stored on interior pages
//!   are yielded after the subtree to their left.
//!
//! Cells that sort before the seek key are skipped without descending into
//! their left subtree. The right child of an interior page is always
//! visited, so a cursor keeps going to the end of the tree; callers stop
//! early with [`IndexCursor::while_prefix_matches`] or by dropping the
//! cursor.
//!
//! Work is counted in [`ScanStats`]: one table or index scan per cursor,
//! one row scanned per cell examined, one row returned per item yielded.

use crate::page::{Cell, Page};
use crate::record::{Record, RowId, Value};
use core::cmp::Ordering as KeyOrdering;
use litewalk_result::{Error, Result};
use litewalk_storage::PageNumber;
use litewalk_storage::header::DatabaseHeader;
use litewalk_storage::pager::Pager;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Work counters shared by every cursor a reader creates.
#[derive(Debug, Default)]
pub struct ScanStats {
    pub table_scans: AtomicU64,
    pub index_scans: AtomicU64,
    pub rows_scanned: AtomicU64,
    pub rows_returned: AtomicU64,
}

impl ScanStats {
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        ScanStatsSnapshot {
            table_scans: self.table_scans.load(Ordering::Relaxed),
            index_scans: self.index_scans.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.table_scans.store(0, Ordering::Relaxed);
        self.index_scans.store(0, Ordering::Relaxed);
        self.rows_scanned.store(0, Ordering::Relaxed);
        self.rows_returned.store(0, Ordering::Relaxed);
    }

    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStatsSnapshot {
    pub table_scans: u64,
    pub index_scans: u64,
    pub rows_scanned: u64,
    pub rows_returned: u64,
}

impl ScanStatsSnapshot {
    /// Compute the delta between two snapshots (`newer - older`). Saturates at zero.
    pub fn delta_since(&self, older: &Self) -> Self {
        Self {
            table_scans: self.table_scans.saturating_sub(older.table_scans),
            index_scans: self.index_scans.saturating_sub(older.index_scans),
            rows_scanned: self.rows_scanned.saturating_sub(older.rows_scanned),
            rows_returned: self.rows_returned.saturating_sub(older.rows_returned),
        }
    }
}

/// Decodes pages from a pager and hands out cursors.
pub struct BTreeReader<P: Pager> {
    pager: P,
    stats: Arc<ScanStats>,
}

impl<P: Pager> BTreeReader<P> {
    pub fn new(pager: P) -> Self {
        Self {
            pager,
            stats: Arc::new(ScanStats::default()),
        }
    }

    pub fn pager(&self) -> &P {
        &self.pager
    }

    pub fn header(&self) -> &DatabaseHeader {
        self.pager.header()
    }

    pub fn stats(&self) -> Arc<ScanStats> {
        Arc::clone(&self.stats)
    }

    /// Read and decode one page.
    pub fn load_page(&self, number: PageNumber) -> Result<Page> {
        let bytes = self.pager.get_page(number)?;
        let page = Page::decode(number, bytes.as_ref(), self.header().usable_size())?;
        tracing::trace!(
            page = number,
            kind = ?page.page_type,
            cells = page.cells.len(),
            "loaded b-tree page"
        );
        Ok(page)
    }

    /// Cursor over the table b-tree at `root`, starting at the first rowid
    /// `>= min_rowid`. Pass `RowId::MIN` (or any key below the smallest
    /// rowid) for a full scan.
    pub fn step_table(&self, root: PageNumber, min_rowid: RowId) -> Result<TableCursor<'_, P>> {
        check_root(root)?;
        ScanStats::bump(&self.stats.table_scans);
        tracing::trace!(root, min_rowid, "table cursor");
        Ok(TableCursor {
            walk: Walk::new(self, root, Seek::Rowid(min_rowid)),
        })
    }

    /// Cursor over the index b-tree at `root`, starting at the first entry
    /// whose leading `key.len()` fields compare `>= key`.
    pub fn step_index(&self, root: PageNumber, key: Vec<Value>) -> Result<IndexCursor<'_, P>> {
        check_root(root)?;
        ScanStats::bump(&self.stats.index_scans);
        tracing::trace!(root, key_fields = key.len(), "index cursor");
        Ok(IndexCursor {
            walk: Walk::new(self, root, Seek::Key(key)),
        })
    }

    /// Stabbing lookup: the row with exactly `rowid`, if present.
    pub fn stab_table(&self, root: PageNumber, rowid: RowId) -> Result<Option<Record>> {
        let mut cursor = self.step_table(root, rowid)?;
        match cursor.next() {
            Some(Ok((found, record))) if found == rowid => Ok(Some(record)),
            Some(Ok(_)) | None => Ok(None),
            Some(Err(err)) => Err(err),
        }
    }
}

fn check_root(root: PageNumber) -> Result<()> {
    if root == 0 {
        return Err(Error::InvalidArgumentError(
            "b-tree root page 0 does not exist".to_string(),
        ));
    }
    Ok(())
}

enum Seek {
    Rowid(RowId),
    Key(Vec<Value>),
}

impl Seek {
    fn admits_table_pages(&self) -> bool {
        matches!(self, Seek::Rowid(_))
    }

    /// Whether `cell` sorts at or after the seek position.
    fn at_or_after(&self, cell: &Cell) -> bool {
        match (self, cell) {
            (Seek::Rowid(min), Cell::TableInterior { rowid, .. } | Cell::TableLeaf { rowid, .. }) => {
                rowid >= min
            }
            (Seek::Key(key), Cell::IndexInterior { record, .. } | Cell::IndexLeaf { record }) => {
                record.cmp_prefix(key) != KeyOrdering::Less
            }
            _ => false,
        }
    }
}

struct Frame {
    page: Page,
    next_cell: usize,
    /// Index interior cell waiting for its left subtree to finish.
    pending: Option<usize>,
    right_visited: bool,
}

enum Step {
    Emit(Option<RowId>, Record),
    Descend(PageNumber),
    Pop,
    Skip,
}

/// Depth-first walk shared by both cursor kinds.
struct Walk<'a, P: Pager> {
    reader: &'a BTreeReader<P>,
    seek: Seek,
    root: Option<PageNumber>,
    stack: Vec<Frame>,
    done: bool,
}

impl<'a, P: Pager> Walk<'a, P> {
    fn new(reader: &'a BTreeReader<P>, root: PageNumber, seek: Seek) -> Self {
        Self {
            reader,
            seek,
            root: Some(root),
            stack: Vec::new(),
            done: false,
        }
    }

    fn push(&mut self, number: PageNumber) -> Result<()> {
        let page = self.reader.load_page(number)?;
        if page.page_type.is_table() != self.seek.admits_table_pages() {
            let wanted = if self.seek.admits_table_pages() {
                "table"
            } else {
                "index"
            };
            return Err(Error::corrupt(format_args!(
                "page {number} is a {:?} page inside a {wanted} b-tree",
                page.page_type
            )));
        }
        self.stack.push(Frame {
            page,
            next_cell: 0,
            pending: None,
            right_visited: false,
        });
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<(Option<RowId>, Record)>> {
        if let Some(root) = self.root.take() {
            self.push(root)?;
        }
        let reader = self.reader;
        let stats = &reader.stats;

        loop {
            let step = {
                let Some(frame) = self.stack.last_mut() else {
                    return Ok(None);
                };
                if let Some(idx) = frame.pending.take() {
                    Step::Emit(None, frame.page.cells[idx].take_record())
                } else if frame.next_cell < frame.page.cells.len() {
                    let idx = frame.next_cell;
                    frame.next_cell += 1;
                    ScanStats::bump(&stats.rows_scanned);

                    let cell = &mut frame.page.cells[idx];
                    if !self.seek.at_or_after(cell) {
                        Step::Skip
                    } else {
                        match *cell {
                            Cell::TableInterior { left_child, .. } => Step::Descend(left_child),
                            Cell::IndexInterior { left_child, .. } => {
                                frame.pending = Some(idx);
                                Step::Descend(left_child)
                            }
                            Cell::TableLeaf { rowid, .. } => {
                                Step::Emit(Some(rowid), cell.take_record())
                            }
                            Cell::IndexLeaf { .. } => Step::Emit(None, cell.take_record()),
                        }
                    }
                } else {
                    match frame.page.right_child {
                        Some(right) if !frame.right_visited => {
                            frame.right_visited = true;
                            Step::Descend(right)
                        }
                        _ => Step::Pop,
                    }
                }
            };

            match step {
                Step::Emit(rowid, record) => {
                    ScanStats::bump(&stats.rows_returned);
                    return Ok(Some((rowid, record)));
                }
                Step::Descend(child) => self.push(child)?,
                Step::Pop => {
                    self.stack.pop();
                }
                Step::Skip => {}
            }
        }
    }

    /// Advance, fusing the walk after the first error or the end.
    fn next_item(&mut self) -> Option<Result<(Option<RowId>, Record)>> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Rows of a table b-tree in ascending rowid order.
pub struct TableCursor<'a, P: Pager> {
    walk: Walk<'a, P>,
}

impl<P: Pager> Iterator for TableCursor<'_, P> {
    type Item = Result<(RowId, Record)>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.walk.next_item()?.and_then(|(rowid, record)| {
            rowid
                .map(|rowid| (rowid, record))
                .ok_or_else(|| Error::Internal("table cursor produced an entry without a rowid".into()))
        }))
    }
}

/// Entries of an index b-tree in key order.
pub struct IndexCursor<'a, P: Pager> {
    walk: Walk<'a, P>,
}

impl<'a, P: Pager> IndexCursor<'a, P> {
    /// Stop at the first entry whose leading fields differ from the seek key.
    /// That entry is still read (and counted), but not yielded.
    pub fn while_prefix_matches(self) -> PrefixMatches<'a, P> {
        PrefixMatches {
            inner: self,
            finished: false,
        }
    }

    fn seek_key(&self) -> &[Value] {
        match &self.walk.seek {
            Seek::Key(key) => key.as_slice(),
            Seek::Rowid(_) => &[],
        }
    }
}

impl<P: Pager> Iterator for IndexCursor<'_, P> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.walk.next_item()?.map(|(_, record)| record))
    }
}

/// See [`IndexCursor::while_prefix_matches`].
pub struct PrefixMatches<'a, P: Pager> {
    inner: IndexCursor<'a, P>,
    finished: bool,
}

impl<P: Pager> Iterator for PrefixMatches<'_, P> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.inner.next()? {
            Ok(record) if record.starts_with(self.inner.seek_key()) => Some(Ok(record)),
            Ok(_) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
