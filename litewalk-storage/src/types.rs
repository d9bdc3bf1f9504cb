/// 1-based page number inside the database file. Page 0 does not exist.
pub type PageNumber = u32;
