use crate::error::Error;

/// Result type alias used throughout litewalk.
pub type Result<T> = std::result::Result<T, Error>;
