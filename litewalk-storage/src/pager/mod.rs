//! Read-only pager trait plus file-backed and in-memory implementations.
//!
//! Pages come back as `Arc<[u8]>`-style blobs so a decoded page can keep
//! borrowing the bytes it was read from.

use crate::header::DatabaseHeader;
use crate::types::PageNumber;
use litewalk_result::{Error, Result};

pub mod file_pager;
pub use file_pager::*;

pub mod instrumented_pager;
pub use instrumented_pager::*;

pub mod mem_pager;
pub use mem_pager::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchGet {
    Page { number: PageNumber },
}

#[derive(Clone, Debug)]
pub enum GetResult<B> {
    Page { number: PageNumber, bytes: B },
    Missing { number: PageNumber },
}

pub trait Pager: Send + Sync + 'static {
    type Blob: AsRef<[u8]> + Clone + Send + Sync + 'static;

    /// Header decoded when the pager was opened.
    fn header(&self) -> &DatabaseHeader;

    /// Number of whole pages available.
    fn page_count(&self) -> PageNumber;

    /// Batch get pages; returns one `GetResult` per request in order.
    /// Page 0 and pages past the end come back as `Missing`.
    fn batch_get(&self, gets: &[BatchGet]) -> Result<Vec<GetResult<Self::Blob>>>;

    /// Fetch a single page, treating a missing page as corruption: every page
    /// number this reader follows comes from a pointer inside the file.
    fn get_page(&self, number: PageNumber) -> Result<Self::Blob> {
        let mut results = self.batch_get(&[BatchGet::Page { number }])?;
        match results.pop() {
            Some(GetResult::Page { bytes, .. }) => Ok(bytes),
            Some(GetResult::Missing { number }) => Err(Error::corrupt(format_args!(
                "page {number} is outside the database ({} pages)",
                self.page_count()
            ))),
            None => Err(Error::Internal(
                "pager returned no result for a single get".to_string(),
            )),
        }
    }
}
