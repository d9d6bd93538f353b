//! In-memory message repository
//!
//! Implements the domain's `MessageRepository` with a `HashMap` behind a
//! `tokio::sync::RwLock`. Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use bough_shared::protocol::{Node, NodeId};
use tokio::sync::RwLock;

use crate::domain::{MessageRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryMessageRepository {
    nodes: RwLock<HashMap<NodeId, Node>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn add(&self, node: Node) -> Result<(), RepositoryError> {
        if node.id.is_empty() {
            return Err(RepositoryError::MissingId);
        }
        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&node.id) {
            return Err(RepositoryError::DuplicateId(node.id.to_string()));
        }
        nodes.insert(node.id.clone(), node);
        Ok(())
    }

    async fn get(&self, id: &NodeId) -> Option<Node> {
        self.nodes.read().await.get(id).cloned()
    }

    async fn count(&self) -> usize {
        self.nodes.read().await.len()
    }
}
