//! Server-side node id assignment.

use bough_shared::protocol::NodeId;
use uuid::Uuid;

/// Generates fresh node ids.
///
/// Ids are assigned exclusively by the server; whatever id a client put on a
/// node is discarded.
pub struct NodeIdFactory;

impl NodeIdFactory {
    pub fn generate() -> NodeId {
        NodeId::new(Uuid::new_v4().to_string())
    }
}
