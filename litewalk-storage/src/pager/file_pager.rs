use super::*;
use crate::constants::FILE_HEADER_SIZE;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Pager over a database file on disk. Every get is a seek plus a read of
/// one full page; nothing is cached.
#[derive(Debug)]
pub struct FilePager {
    path: PathBuf,
    file: Mutex<File>,
    header: DatabaseHeader,
    page_count: PageNumber,
}

impl FilePager {
    /// Open `path` and decode its file header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;

        let mut raw = [0u8; FILE_HEADER_SIZE];
        file.read_exact(&mut raw).map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::corrupt(format_args!("{} is too short for a file header", path.display()))
            }
            _ => Error::Io(err),
        })?;
        let header = DatabaseHeader::decode(&raw)?;

        let len = file.metadata()?.len();
        let page_count = PageNumber::try_from(len / header.page_size() as u64).map_err(|_| {
            Error::unsupported(format_args!("{} has more pages than fit in u32", path.display()))
        })?;

        tracing::debug!(
            path = %path.display(),
            page_size = header.page_size(),
            page_count,
            "opened database file"
        );

        Ok(Self {
            path,
            file: Mutex::new(file),
            header,
            page_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_page(&self, file: &mut File, number: PageNumber) -> Result<Arc<[u8]>> {
        let page_size = self.header.page_size();
        let offset = (number as u64 - 1) * page_size as u64;
        let mut buf = vec![0u8; page_size];
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        tracing::trace!(page = number, offset, "read page from file");
        Ok(Arc::from(buf))
    }
}

impl Pager for FilePager {
    type Blob = Arc<[u8]>;

    fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    fn page_count(&self) -> PageNumber {
        self.page_count
    }

    fn batch_get(&self, gets: &[BatchGet]) -> Result<Vec<GetResult<Self::Blob>>> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| Error::Internal("FilePager file lock poisoned".to_string()))?;
        let mut out = Vec::with_capacity(gets.len());
        for g in gets {
            match *g {
                BatchGet::Page { number } => {
                    if number == 0 || number > self.page_count {
                        out.push(GetResult::Missing { number });
                    } else {
                        let bytes = self.read_page(&mut file, number)?;
                        out.push(GetResult::Page { number, bytes });
                    }
                }
            }
        }
        Ok(out)
    }
}
