//! The 100-byte database file header.
//!
//! Fields appear here in file order. See the "Database Header" section of the
//! SQLite file format documentation for the meaning of each one.

use crate::constants::{FILE_HEADER_SIZE, HEADER_MAGIC, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use litewalk_result::{Error, Result};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(TextEncoding::Utf8),
            2 => Ok(TextEncoding::Utf16Le),
            3 => Ok(TextEncoding::Utf16Be),
            other => Err(Error::corrupt(format_args!(
                "text encoding {other} is not 1, 2 or 3"
            ))),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16Le => 2,
            TextEncoding::Utf16Be => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseHeader {
    /// Raw page size field; 1 stands for 65536. Use [`Self::page_size`].
    pub page_size_raw: u16,
    pub file_format_write_version: u8,
    pub file_format_read_version: u8,
    pub reserved_bytes_per_page: u8,
    pub max_embedded_payload_fraction: u8,
    pub min_embedded_payload_fraction: u8,
    pub leaf_payload_fraction: u8,
    pub file_change_counter: u32,
    pub database_size_in_pages: u32,

    pub first_freelist_trunk_page: u32,
    pub freelist_page_count: u32,
    pub schema_cookie: u32,
    pub schema_format: u32,

    pub default_page_cache_size: u32,
    pub largest_root_page: u32,
    pub text_encoding: TextEncoding,
    pub user_version: u32,

    pub incremental_vacuum: u32,
    pub application_id: u32,
    pub version_valid_for: u32,
    pub sqlite_version_number: u32,
}

#[inline]
fn be_u16(raw: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([raw[at], raw[at + 1]])
}

#[inline]
fn be_u32(raw: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]])
}

impl DatabaseHeader {
    /// Decode the header from the first [`FILE_HEADER_SIZE`] bytes of `raw`.
    ///
    /// Rejects a wrong magic string, a page size that is not a power of two
    /// in `512..=65536`, and UTF-16 databases.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < FILE_HEADER_SIZE {
            return Err(Error::corrupt(format_args!(
                "file header needs {FILE_HEADER_SIZE} bytes, got {}",
                raw.len()
            )));
        }
        if &raw[..16] != HEADER_MAGIC {
            return Err(Error::corrupt("not a SQLite 3 database (bad magic)"));
        }

        let header = DatabaseHeader {
            page_size_raw: be_u16(raw, 16),
            file_format_write_version: raw[18],
            file_format_read_version: raw[19],
            reserved_bytes_per_page: raw[20],
            max_embedded_payload_fraction: raw[21],
            min_embedded_payload_fraction: raw[22],
            leaf_payload_fraction: raw[23],
            file_change_counter: be_u32(raw, 24),
            database_size_in_pages: be_u32(raw, 28),
            first_freelist_trunk_page: be_u32(raw, 32),
            freelist_page_count: be_u32(raw, 36),
            schema_cookie: be_u32(raw, 40),
            schema_format: be_u32(raw, 44),
            default_page_cache_size: be_u32(raw, 48),
            largest_root_page: be_u32(raw, 52),
            text_encoding: TextEncoding::from_code(be_u32(raw, 56))?,
            user_version: be_u32(raw, 60),
            incremental_vacuum: be_u32(raw, 64),
            application_id: be_u32(raw, 68),
            // 72..92 is reserved for expansion and must be zero.
            version_valid_for: be_u32(raw, 92),
            sqlite_version_number: be_u32(raw, 96),
        };

        let page_size = header.page_size();
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&page_size) || !page_size.is_power_of_two()
        {
            return Err(Error::corrupt(format_args!(
                "page size {page_size} is not a power of two between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
            )));
        }
        if header.text_encoding != TextEncoding::Utf8 {
            return Err(Error::unsupported(format_args!(
                "text encoding {:?}; only UTF-8 databases can be read",
                header.text_encoding
            )));
        }
        Ok(header)
    }

    /// Page size in bytes.
    pub fn page_size(&self) -> usize {
        match self.page_size_raw {
            1 => MAX_PAGE_SIZE,
            n => n as usize,
        }
    }

    /// Page size minus the bytes reserved at the end of each page.
    pub fn usable_size(&self) -> usize {
        self.page_size() - self.reserved_bytes_per_page as usize
    }
}

impl fmt::Display for DatabaseHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: [(&str, String); 22] = [
            ("header string", "SQLite format 3".to_string()),
            ("page size", self.page_size().to_string()),
            (
                "file format write version",
                self.file_format_write_version.to_string(),
            ),
            (
                "file format read version",
                self.file_format_read_version.to_string(),
            ),
            (
                "bytes reserved at end of each page",
                self.reserved_bytes_per_page.to_string(),
            ),
            (
                "max embedded payload fraction",
                self.max_embedded_payload_fraction.to_string(),
            ),
            (
                "min embedded payload fraction",
                self.min_embedded_payload_fraction.to_string(),
            ),
            (
                "min leaf payload fraction",
                self.leaf_payload_fraction.to_string(),
            ),
            ("file change counter", self.file_change_counter.to_string()),
            ("file size in pages", self.database_size_in_pages.to_string()),
            (
                "first freelist page",
                self.first_freelist_trunk_page.to_string(),
            ),
            (
                "number of freelist pages",
                self.freelist_page_count.to_string(),
            ),
            ("schema version cookie", self.schema_cookie.to_string()),
            ("schema format number", self.schema_format.to_string()),
            ("page cache size", self.default_page_cache_size.to_string()),
            ("largest root page", self.largest_root_page.to_string()),
            ("text encoding", self.text_encoding.code().to_string()),
            ("user version", self.user_version.to_string()),
            ("incremental vacuum", self.incremental_vacuum.to_string()),
            ("application id", self.application_id.to_string()),
            ("version valid for", self.version_valid_for.to_string()),
            ("sqlite version number", self.sqlite_version_number.to_string()),
        ];
        for (label, value) in rows {
            writeln!(f, "{label:<36}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_header(page_size: u16, encoding: u32) -> Vec<u8> {
        let mut raw = vec![0u8; FILE_HEADER_SIZE];
        raw[..16].copy_from_slice(HEADER_MAGIC);
        raw[16..18].copy_from_slice(&page_size.to_be_bytes());
        raw[18] = 1;
        raw[19] = 1;
        raw[21] = 64;
        raw[22] = 32;
        raw[23] = 32;
        raw[28..32].copy_from_slice(&7u32.to_be_bytes());
        raw[56..60].copy_from_slice(&encoding.to_be_bytes());
        raw[96..100].copy_from_slice(&3_045_001u32.to_be_bytes());
        raw
    }

    #[test]
    fn decodes_fields_in_file_order() {
        let header = DatabaseHeader::decode(&raw_header(4096, 1)).unwrap();
        assert_eq!(header.page_size(), 4096);
        assert_eq!(header.usable_size(), 4096);
        assert_eq!(header.database_size_in_pages, 7);
        assert_eq!(header.max_embedded_payload_fraction, 64);
        assert_eq!(header.text_encoding, TextEncoding::Utf8);
        assert_eq!(header.sqlite_version_number, 3_045_001);
    }

    #[test]
    fn page_size_one_means_64k() {
        let header = DatabaseHeader::decode(&raw_header(1, 1)).unwrap();
        assert_eq!(header.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut raw = raw_header(4096, 1);
        raw[0] = b'X';
        assert!(matches!(
            DatabaseHeader::decode(&raw),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_odd_page_size_and_short_input() {
        assert!(matches!(
            DatabaseHeader::decode(&raw_header(1000, 1)),
            Err(Error::Corrupt(_))
        ));
        assert!(matches!(
            DatabaseHeader::decode(&raw_header(4096, 1)[..50]),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn rejects_utf16() {
        assert!(matches!(
            DatabaseHeader::decode(&raw_header(4096, 2)),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn display_lists_one_line_per_field() {
        let header = DatabaseHeader::decode(&raw_header(4096, 1)).unwrap();
        let text = header.to_string();
        assert_eq!(text.lines().count(), 22);
        assert!(text.contains("page size                           : 4096"));
    }
}
