//! Error types and result definitions for litewalk.
//!
//! Every crate in the workspace returns [`Result<T>`], whose error variant is
//! the single [`Error`] enum defined here. Errors propagate upward with `?`;
//! only the CLI turns them into user-facing messages.
//!
//! # Error Categories
//!
//! - **I/O errors** ([`Error::Io`]): opening or reading the database file
//! - **Format errors** ([`Error::Corrupt`], [`Error::Unsupported`]): bytes that
//!   do not decode as a SQLite b-tree page or record, or features this reader
//!   deliberately does not handle
//! - **Lookup failures** ([`Error::CatalogError`]): missing schema objects
//! - **Integrity failures** ([`Error::DanglingReference`]): a row refers to a
//!   key that does not exist in the referenced table
//! - **User input errors** ([`Error::InvalidArgumentError`])
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
