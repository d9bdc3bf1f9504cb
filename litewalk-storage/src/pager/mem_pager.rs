use super::*;
use crate::constants::FILE_HEADER_SIZE;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// In-memory pager over a complete database image. Used by tests and for
/// small files that are cheaper to slurp than to seek.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct MemPager {
    header: DatabaseHeader,
    pages: FxHashMap<PageNumber, Arc<[u8]>>,
    page_count: PageNumber,
}

impl MemPager {
    /// Split a full file image into pages. A trailing partial page is ignored.
    pub fn from_image(image: &[u8]) -> Result<Self> {
        let header = DatabaseHeader::decode(image.get(..FILE_HEADER_SIZE).unwrap_or(image))?;
        let page_size = header.page_size();

        let mut pages = FxHashMap::default();
        for (idx, chunk) in image.chunks_exact(page_size).enumerate() {
            let number = PageNumber::try_from(idx + 1)
                .map_err(|_| Error::unsupported("image has more pages than fit in u32"))?;
            pages.insert(number, Arc::from(chunk));
        }
        let page_count = pages.len() as PageNumber;

        Ok(Self {
            header,
            pages,
            page_count,
        })
    }

    /// Replace the bytes of an existing page. The new page must be exactly one
    /// page long.
    pub fn with_page(mut self, number: PageNumber, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != self.header.page_size() {
            return Err(Error::InvalidArgumentError(format!(
                "page {number} must be {} bytes, got {}",
                self.header.page_size(),
                bytes.len()
            )));
        }
        if !self.pages.contains_key(&number) {
            return Err(Error::InvalidArgumentError(format!(
                "page {number} is not part of this image"
            )));
        }
        self.pages.insert(number, Arc::from(bytes));
        Ok(self)
    }
}

impl Pager for MemPager {
    type Blob = Arc<[u8]>;

    fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    fn page_count(&self) -> PageNumber {
        self.page_count
    }

    fn batch_get(&self, gets: &[BatchGet]) -> Result<Vec<GetResult<Self::Blob>>> {
        let mut out = Vec::with_capacity(gets.len());
        for g in gets {
            match *g {
                BatchGet::Page { number } => {
                    if let Some(b) = self.pages.get(&number) {
                        out.push(GetResult::Page {
                            number,
                            bytes: b.clone(),
                        });
                    } else {
                        out.push(GetResult::Missing { number });
                    }
                }
            }
        }
        Ok(out)
    }
}
