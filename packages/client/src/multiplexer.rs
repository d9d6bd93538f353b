//! Request multiplexer.
//!
//! Serializes two independent intent streams onto one connection: ids to
//! query and locally authored nodes to publish. Both are awaited in the same
//! `select!`, so a quiet source never starves the other.

use async_trait::async_trait;
use bough_shared::protocol::{Envelope, Node, NodeId};
use tokio::sync::mpsc;

use crate::error::ClientError;

/// Outbound half of a server connection.
#[async_trait]
pub trait EnvelopeWriter: Send {
    async fn write(&mut self, envelope: Envelope) -> Result<(), ClientError>;
}

/// Forward queries and new nodes to `writer` until both sources are closed.
///
/// New nodes are sent with an empty id; the server assigns it.
pub async fn run_request_multiplexer<W: EnvelopeWriter>(
    mut queries: mpsc::Receiver<NodeId>,
    mut outbound: mpsc::Receiver<Node>,
    mut writer: W,
) -> Result<(), ClientError> {
    loop {
        let envelope = tokio::select! {
            Some(id) = queries.recv() => {
                tracing::debug!("Querying '{}'", id);
                Envelope::query(id)
            }
            Some(mut node) = outbound.recv() => {
                node.id = NodeId::unassigned();
                tracing::debug!("Sending reply to '{:?}'", node.parent);
                Envelope::new_message(node)
            }
            else => return Ok(()),
        };
        writer.write(envelope).await?;
    }
}
