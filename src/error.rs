// Typed errors for list operations
// One enum, one meaning per variant; the CLI boundary decides exit behavior.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    /// Add of an id that is already in the list
    #[error("entry {0} is already in the list")]
    DuplicateId(u32),

    /// Mutation or removal of an id the list does not contain
    #[error("id {0} not found in list")]
    IdNotFound(u32),

    /// Date input that cannot be parsed in any accepted format
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// I/O failure while reading or writing the list store
    #[error("failed to access list store: {0}")]
    Persistence(#[from] std::io::Error),

    /// Store contents that do not decode as a list
    #[error("list store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type ListResult<T> = Result<T, ListError>;
