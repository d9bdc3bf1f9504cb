//! B-tree page layout: page header, cell pointer array, and the four cell
//! shapes.

use crate::codecs::ByteReader;
use crate::record::{Record, RowId};
use litewalk_result::{Error, Result};
use litewalk_storage::PageNumber;
use litewalk_storage::constants::FILE_HEADER_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageType {
    IndexInterior,
    TableInterior,
    IndexLeaf,
    TableLeaf,
}

impl PageType {
    pub const INDEX_INTERIOR: u8 = 2;
    pub const TABLE_INTERIOR: u8 = 5;
    pub const INDEX_LEAF: u8 = 10;
    pub const TABLE_LEAF: u8 = 13;

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            Self::INDEX_INTERIOR => Some(PageType::IndexInterior),
            Self::TABLE_INTERIOR => Some(PageType::TableInterior),
            Self::INDEX_LEAF => Some(PageType::IndexLeaf),
            Self::TABLE_LEAF => Some(PageType::TableLeaf),
            _ => None,
        }
    }

    pub fn is_interior(self) -> bool {
        matches!(self, PageType::IndexInterior | PageType::TableInterior)
    }

    pub fn is_table(self) -> bool {
        matches!(self, PageType::TableInterior | PageType::TableLeaf)
    }

    pub fn is_index(self) -> bool {
        !self.is_table()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Separator: every rowid in `left_child` is <= `rowid`.
    TableInterior { left_child: PageNumber, rowid: RowId },
    TableLeaf { rowid: RowId, record: Record },
    /// Index interior cells carry a real entry that sorts after everything
    /// in `left_child`.
    IndexInterior { left_child: PageNumber, record: Record },
    IndexLeaf { record: Record },
}

impl Cell {
    pub fn left_child(&self) -> Option<PageNumber> {
        match self {
            Cell::TableInterior { left_child, .. } | Cell::IndexInterior { left_child, .. } => {
                Some(*left_child)
            }
            _ => None,
        }
    }

    pub fn rowid(&self) -> Option<RowId> {
        match self {
            Cell::TableInterior { rowid, .. } | Cell::TableLeaf { rowid, .. } => Some(*rowid),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Cell::TableLeaf { record, .. }
            | Cell::IndexInterior { record, .. }
            | Cell::IndexLeaf { record } => Some(record),
            Cell::TableInterior { .. } => None,
        }
    }

    /// Move the record out, leaving an empty one behind.
    pub(crate) fn take_record(&mut self) -> Record {
        match self {
            Cell::TableLeaf { record, .. }
            | Cell::IndexInterior { record, .. }
            | Cell::IndexLeaf { record } => std::mem::take(record),
            Cell::TableInterior { .. } => Record::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub number: PageNumber,
    pub page_type: PageType,
    /// Rightmost child; only interior pages have one.
    pub right_child: Option<PageNumber>,
    pub cells: Vec<Cell>,
}

impl Page {
    /// Decode page `number` from its raw bytes. `usable_size` is the page
    /// size minus the reserved tail and bounds every cell read.
    pub fn decode(number: PageNumber, raw: &[u8], usable_size: usize) -> Result<Self> {
        if usable_size > raw.len() {
            return Err(Error::corrupt(format_args!(
                "page {number}: usable size {usable_size} exceeds {} bytes read",
                raw.len()
            )));
        }
        let raw = &raw[..usable_size];
        let header_start = if number == 1 { FILE_HEADER_SIZE } else { 0 };
        let mut hdr = ByteReader::new(raw, header_start)?;

        let type_byte = hdr.read_u8()?;
        let page_type = PageType::from_byte(type_byte).ok_or_else(|| {
            Error::corrupt(format_args!("page {number} has unknown b-tree type {type_byte}"))
        })?;
        let _first_freeblock = hdr.read_u16()?;
        let cell_count = hdr.read_u16()? as usize;
        let _cell_content_start = hdr.read_u16()?;
        let _fragmented_bytes = hdr.read_u8()?;
        let right_child = if page_type.is_interior() {
            Some(hdr.read_u32()?)
        } else {
            None
        };

        let mut cells = Vec::with_capacity(cell_count);
        for i in 0..cell_count {
            let offset = hdr.read_u16()? as usize;
            let cell = decode_cell(page_type, raw, offset).map_err(|err| match err {
                Error::Corrupt(msg) => {
                    Error::Corrupt(format!("page {number} cell {i} at offset {offset}: {msg}"))
                }
                Error::Unsupported(msg) => {
                    Error::Unsupported(format!("page {number} cell {i}: {msg}"))
                }
                other => other,
            })?;
            cells.push(cell);
        }

        Ok(Self {
            number,
            page_type,
            right_child,
            cells,
        })
    }
}

/// Largest payload stored entirely on the page; anything bigger spills.
fn max_local_payload(page_type: PageType, usable_size: usize) -> usize {
    match page_type {
        PageType::TableLeaf => usable_size - 35,
        _ => ((usable_size - 12) * 64 / 255) - 23,
    }
}

fn decode_cell(page_type: PageType, raw: &[u8], offset: usize) -> Result<Cell> {
    let mut r = ByteReader::new(raw, offset)?;

    let left_child = if page_type.is_interior() {
        Some(r.read_u32()?)
    } else {
        None
    };

    if page_type == PageType::TableInterior {
        let rowid = r.read_varint()? as RowId;
        return Ok(Cell::TableInterior {
            left_child: left_child.unwrap_or_default(),
            rowid,
        });
    }

    let payload_len = r.read_varint()?;
    let rowid = if page_type == PageType::TableLeaf {
        Some(r.read_varint()? as RowId)
    } else {
        None
    };

    let max_local = max_local_payload(page_type, raw.len()) as u64;
    if payload_len > max_local {
        return Err(Error::unsupported(format_args!(
            "{payload_len}-byte payload spills to overflow pages (local limit {max_local})"
        )));
    }
    let payload = r.read_bytes(payload_len as usize)?;
    let record = Record::decode(payload)?;

    Ok(match (page_type, left_child, rowid) {
        (PageType::TableLeaf, _, Some(rowid)) => Cell::TableLeaf { rowid, record },
        (PageType::IndexInterior, Some(left_child), _) => Cell::IndexInterior { left_child, record },
        (PageType::IndexLeaf, _, _) => Cell::IndexLeaf { record },
        _ => {
            return Err(Error::Internal(format!(
                "cell shape mismatch for {page_type:?}"
            )));
        }
    })
}
