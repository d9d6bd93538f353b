//! UseCase: accept a NEW_MESSAGE from a client.
//!
//! The id is assigned and the node persisted before fan-out, so any client
//! that receives the broadcast can immediately query its ancestors.

use std::sync::Arc;

use bough_shared::protocol::{Envelope, Node};

use crate::{
    domain::{MessageRepository, NodeIdFactory},
    infrastructure::{Broadcaster, Recents},
};

use super::error::AcceptError;

pub struct AcceptMessageUseCase {
    repository: Arc<dyn MessageRepository>,
    recents: Recents,
    broadcaster: Broadcaster,
}

impl AcceptMessageUseCase {
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        recents: Recents,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            repository,
            recents,
            broadcaster,
        }
    }

    /// Assign a fresh id, persist the node, record it and broadcast it.
    ///
    /// A node the store rejects is neither recorded nor broadcast.
    ///
    /// Any client-supplied id is overwritten. Returns the accepted node.
    pub async fn execute(&self, mut node: Node) -> Result<Node, AcceptError> {
        if node.parent.is_none() {
            return Err(AcceptError::MissingParent);
        }
        node.id = NodeIdFactory::generate();

        self.repository.add(node.clone()).await?;
        self.recents.add(node.id.clone());
        self.broadcaster.send(Envelope::new_message(node.clone()));

        tracing::info!(
            "Accepted message '{}' (parent '{}') from '{}'",
            node.id,
            node.parent.as_ref().map(|p| p.as_str()).unwrap_or_default(),
            node.author
        );
        Ok(node)
    }
}
