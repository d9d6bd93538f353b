//! UseCase: answer a QUERY from the store.

use std::sync::Arc;

use bough_shared::protocol::{Envelope, NodeId};

use crate::domain::MessageRepository;

use super::error::QueryError;

pub struct QueryMessageUseCase {
    repository: Arc<dyn MessageRepository>,
}

impl QueryMessageUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// Look up `id` and wrap the node as a NEW_MESSAGE for the asking client
    /// only.
    pub async fn execute(&self, id: &NodeId) -> Result<Envelope, QueryError> {
        match self.repository.get(id).await {
            Some(node) => Ok(Envelope::new_message(node)),
            None => Err(QueryError::NotFound(id.to_string())),
        }
    }
}
