//! Message repository trait
//!
//! The authoritative id → node map. The server only ever appends to it: the
//! NEW_MESSAGE path adds, QUERY and the HTTP surface read.

use async_trait::async_trait;
use bough_shared::protocol::{Node, NodeId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store an accepted node. Fails if the id is empty or already present.
    async fn add(&self, node: Node) -> Result<(), RepositoryError>;

    /// Look up a node by id
    async fn get(&self, id: &NodeId) -> Option<Node>;

    /// Number of stored nodes (root included)
    async fn count(&self) -> usize;
}
