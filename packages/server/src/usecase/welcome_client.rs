//! UseCase: build the WELCOME handshake for a new connection.

use bough_shared::protocol::{Envelope, NodeId};

use crate::infrastructure::Recents;

pub struct WelcomeClientUseCase {
    root_id: NodeId,
    recents: Recents,
}

impl WelcomeClientUseCase {
    pub fn new(root_id: NodeId, recents: Recents) -> Self {
        Self { root_id, recents }
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    /// WELCOME carrying the root id and the current recents snapshot
    pub async fn execute(&self) -> Envelope {
        Envelope::welcome(self.root_id.clone(), self.recents.data().await)
    }
}
