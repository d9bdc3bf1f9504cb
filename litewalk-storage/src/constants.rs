/// Size of the file header that precedes the b-tree header on page 1.
pub const FILE_HEADER_SIZE: usize = 100;

/// Magic string that opens every SQLite version 3 file.
pub const HEADER_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// The page size field stores 1 to mean 65536.
pub const MAX_PAGE_SIZE: usize = 65_536;

pub const MIN_PAGE_SIZE: usize = 512;
