use std::fmt;

/// Work done since the counters were last reset.
///
/// Displays as two lines:
///
/// ```text
/// read 7 pages with 3 table scans and 2 index scans
/// scanned 41 total rows and returned 5 rows to the client app
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub page_reads: u64,
    pub table_scans: u64,
    pub index_scans: u64,
    pub rows_scanned: u64,
    pub rows_returned: u64,
}

struct Counted(u64, &'static str);

impl fmt::Display for Counted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Counted(n, noun) = *self;
        write!(f, "{n} {noun}{}", if n == 1 { "" } else { "s" })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "read {} with {} and {}",
            Counted(self.page_reads, "page"),
            Counted(self.table_scans, "table scan"),
            Counted(self.index_scans, "index scan"),
        )?;
        write!(
            f,
            "scanned {} total {} and returned {} to the client app",
            self.rows_scanned,
            if self.rows_scanned == 1 { "row" } else { "rows" },
            Counted(self.rows_returned, "row"),
        )
    }
}
