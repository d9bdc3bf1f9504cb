//! Page-level access to SQLite version 3 database files.
//!
//! This crate knows about the 100-byte file header and about fixed-size
//! pages, nothing more. Decoding the b-tree structure inside a page is the
//! job of `litewalk-btree`.

pub mod constants;
pub mod header;
pub mod pager;
pub mod types;

pub use header::{DatabaseHeader, TextEncoding};
pub use types::PageNumber;
