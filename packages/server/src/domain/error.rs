//! Domain error types.

use thiserror::Error;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Node ids are never reused or overwritten
    #[error("Node '{0}' already exists")]
    DuplicateId(String),

    /// Only accepted nodes (with an assigned id) can be stored
    #[error("Node has no id")]
    MissingId,
}
