//! UseCase error types.

use thiserror::Error;

use crate::domain::RepositoryError;

/// Errors answering a QUERY
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No node with the requested id; the query is dropped
    #[error("Unable to find queried id '{0}'")]
    NotFound(String),
}

/// Errors accepting a NEW_MESSAGE
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcceptError {
    /// Only the server-created root may lack a parent
    #[error("New message has no parent")]
    MissingParent,

    /// The node could not be persisted
    #[error("Failed to store new message: {0}")]
    Repository(#[from] RepositoryError),
}
