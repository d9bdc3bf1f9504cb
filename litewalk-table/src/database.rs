//! The database handle: a pager wrapped for I/O accounting, plus a b-tree
//! reader that counts scans and rows.

use crate::catalog::Catalog;
use crate::report::Report;
use litewalk_btree::{BTreeReader, IndexCursor, Page, Record, RowId, ScanStats, TableCursor, Value};
use litewalk_result::Result;
use litewalk_storage::pager::{FilePager, InstrumentedPager, IoStats, MemPager, Pager};
use litewalk_storage::{DatabaseHeader, PageNumber};
use std::path::Path;
use std::sync::Arc;

/// Root page of the schema table.
pub const SCHEMA_ROOT_PAGE: PageNumber = 1;

/// Read-only handle on one database file (or image).
///
/// Every page fetched through the handle is counted in its [`IoStats`] and
/// every cursor in its [`ScanStats`]. Independent handles never share counts.
pub struct Database<P: Pager = FilePager> {
    reader: BTreeReader<InstrumentedPager<P>>,
    io_stats: Arc<IoStats>,
}

impl Database<FilePager> {
    /// Open the file at `path` and validate its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_pager(FilePager::open(path)?))
    }
}

impl Database<MemPager> {
    /// Wrap a complete database image held in memory.
    pub fn from_image(image: &[u8]) -> Result<Self> {
        Ok(Self::from_pager(MemPager::from_image(image)?))
    }
}

impl<P: Pager> Database<P> {
    pub fn from_pager(pager: P) -> Self {
        let (pager, io_stats) = InstrumentedPager::new(pager);
        Self {
            reader: BTreeReader::new(pager),
            io_stats,
        }
    }

    pub fn header(&self) -> &DatabaseHeader {
        self.reader.header()
    }

    pub fn page_count(&self) -> PageNumber {
        self.reader.pager().page_count()
    }

    /// The uninstrumented pager underneath.
    pub fn pager(&self) -> &P {
        self.reader.pager().inner()
    }

    pub fn load_page(&self, number: PageNumber) -> Result<Page> {
        self.reader.load_page(number)
    }

    pub fn step_table(
        &self,
        root: PageNumber,
        min_rowid: RowId,
    ) -> Result<TableCursor<'_, InstrumentedPager<P>>> {
        self.reader.step_table(root, min_rowid)
    }

    pub fn step_index(
        &self,
        root: PageNumber,
        key: Vec<Value>,
    ) -> Result<IndexCursor<'_, InstrumentedPager<P>>> {
        self.reader.step_index(root, key)
    }

    pub fn stab_table(&self, root: PageNumber, rowid: RowId) -> Result<Option<Record>> {
        self.reader.stab_table(root, rowid)
    }

    /// Build the catalog from the schema table.
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::load(self)
    }

    pub fn scan_stats(&self) -> Arc<ScanStats> {
        self.reader.stats()
    }

    pub fn io_stats(&self) -> Arc<IoStats> {
        Arc::clone(&self.io_stats)
    }

    /// Work done since the handle was opened or last reset.
    pub fn report(&self) -> Report {
        let io = self.io_stats.snapshot();
        let scans = self.reader.stats().snapshot();
        Report {
            page_reads: io.page_reads,
            table_scans: scans.table_scans,
            index_scans: scans.index_scans,
            rows_scanned: scans.rows_scanned,
            rows_returned: scans.rows_returned,
        }
    }

    pub fn reset_stats(&self) {
        self.io_stats.reset();
        self.reader.stats().reset();
    }
}
