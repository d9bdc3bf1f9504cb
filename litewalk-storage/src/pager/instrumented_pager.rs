use crate::header::DatabaseHeader;
use crate::pager::{BatchGet, GetResult, Pager};
use crate::types::PageNumber;
use litewalk_result::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe container for I/O statistics.
#[derive(Debug, Default)]
pub struct IoStats {
    /// Pages requested from the inner pager (one per `BatchGet`).
    pub page_reads: AtomicU64,
    /// Calls to `batch_get`.
    pub get_batches: AtomicU64,
    /// Requests that came back `Missing`.
    pub missing_pages: AtomicU64,
}

impl IoStats {
    /// Capture a point-in-time snapshot of the accumulated metrics.
    pub fn snapshot(&self) -> IoStatsSnapshot {
        IoStatsSnapshot {
            page_reads: self.page_reads.load(Ordering::Relaxed),
            get_batches: self.get_batches.load(Ordering::Relaxed),
            missing_pages: self.missing_pages.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics to zero.
    pub fn reset(&self) {
        self.page_reads.store(0, Ordering::Relaxed);
        self.get_batches.store(0, Ordering::Relaxed);
        self.missing_pages.store(0, Ordering::Relaxed);
    }
}

/// Immutable copy of [`IoStats`] counters captured at a specific moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoStatsSnapshot {
    pub page_reads: u64,
    pub get_batches: u64,
    pub missing_pages: u64,
}

impl IoStatsSnapshot {
    /// Compute the delta between two snapshots (`newer - older`). Saturates at zero.
    pub fn delta_since(&self, older: &Self) -> Self {
        macro_rules! delta {
            ($field:ident) => {
                self.$field.saturating_sub(older.$field)
            };
        }

        Self {
            page_reads: delta!(page_reads),
            get_batches: delta!(get_batches),
            missing_pages: delta!(missing_pages),
        }
    }
}

/// A wrapper around any Pager implementation that counts page reads.
#[derive(Debug)]
pub struct InstrumentedPager<P: Pager> {
    inner: P,
    stats: Arc<IoStats>,
}

impl<P> InstrumentedPager<P>
where
    P: Pager,
{
    /// Wraps a Pager and returns the instrumented version along with a handle
    /// to its statistics.
    pub fn new(inner: P) -> (Self, Arc<IoStats>) {
        let stats = Arc::new(IoStats::default());
        (
            Self {
                inner,
                stats: Arc::clone(&stats),
            },
            stats,
        )
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P> Pager for InstrumentedPager<P>
where
    P: Pager,
{
    type Blob = P::Blob;

    fn header(&self) -> &DatabaseHeader {
        self.inner.header()
    }

    fn page_count(&self) -> PageNumber {
        self.inner.page_count()
    }

    fn batch_get(&self, gets: &[BatchGet]) -> Result<Vec<GetResult<Self::Blob>>> {
        self.stats
            .page_reads
            .fetch_add(gets.len() as u64, Ordering::Relaxed);
        self.stats.get_batches.fetch_add(1, Ordering::Relaxed);
        let results = self.inner.batch_get(gets)?;
        let missing = results
            .iter()
            .filter(|r| matches!(r, GetResult::Missing { .. }))
            .count();
        if missing > 0 {
            self.stats
                .missing_pages
                .fetch_add(missing as u64, Ordering::Relaxed);
        }
        Ok(results)
    }
}
