use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all litewalk operations.
///
/// The reader never repairs or skips bad data: a page that fails to decode,
/// a record that spills to overflow pages, or a row that references a
/// missing key all surface as an error to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while opening or reading the database file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bytes that do not decode as the SQLite file format.
    ///
    /// Raised for a bad magic string, an unknown page type, a cell pointer or
    /// record field that runs past the end of its page, or a reserved serial
    /// type. The message names what was being decoded.
    #[error("corrupt database: {0}")]
    Corrupt(String),

    /// Valid file content that this reader does not handle.
    ///
    /// Overflow pages and UTF-16 text encodings fall here.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Invalid user input or API parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Schema catalog lookup failure, e.g. a table or index name that is not
    /// present in the schema table.
    #[error("{0}")]
    CatalogError(String),

    /// A row references a key that is absent from the referenced table.
    ///
    /// The covering index over `crew` is assumed to be consistent with
    /// `people`; when it is not, the join stops here instead of silently
    /// dropping the row.
    #[error("dangling reference: no row {rowid} in table '{table}'")]
    DanglingReference { table: String, rowid: i64 },

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a corruption error from any displayable value.
    ///
    /// # Examples
    ///
    /// ```
    /// use litewalk_result::Error;
    ///
    /// let err = Error::corrupt(format_args!("page {} has type {}", 7, 0x42));
    /// assert!(matches!(err, Error::Corrupt(msg) if msg.contains("page 7")));
    /// ```
    #[inline]
    pub fn corrupt<E: fmt::Display>(err: E) -> Self {
        Error::Corrupt(err.to_string())
    }

    #[inline]
    pub fn unsupported<E: fmt::Display>(err: E) -> Self {
        Error::Unsupported(err.to_string())
    }

    /// Create a dangling-reference error for `rowid` in `table`.
    #[inline]
    pub fn dangling(table: impl Into<String>, rowid: i64) -> Self {
        Error::DanglingReference {
            table: table.into(),
            rowid,
        }
    }
}
