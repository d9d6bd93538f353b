//! Envelope types exchanged over a connection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId};

/// Protocol version announced in the welcome handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion { major: 0, minor: 1 };

/// Handshake payload sent once to every newly connected client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    /// Id of the single root node of the conversation.
    pub root: NodeId,
    /// Sample of recently accepted ids. Never padded with empty slots.
    #[serde(default)]
    pub recent: Vec<NodeId>,
    #[serde(flatten)]
    pub version: ProtocolVersion,
}

/// A single protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Envelope {
    Welcome(Welcome),
    /// Request for the node with the given id.
    Query { id: NodeId },
    /// A node, either newly authored (client → server, id unassigned),
    /// broadcast after acceptance, or returned for a query.
    NewMessage { node: Node },
}

/// Discriminant of an [`Envelope`], mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    Welcome,
    Query,
    NewMessage,
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvelopeKind::Welcome => "WELCOME",
            EnvelopeKind::Query => "QUERY",
            EnvelopeKind::NewMessage => "NEW_MESSAGE",
        };
        f.write_str(name)
    }
}

impl Envelope {
    pub fn welcome(root: NodeId, recent: Vec<NodeId>) -> Self {
        Envelope::Welcome(Welcome {
            root,
            recent,
            version: PROTOCOL_VERSION,
        })
    }

    pub fn query(id: NodeId) -> Self {
        Envelope::Query { id }
    }

    pub fn new_message(node: Node) -> Self {
        Envelope::NewMessage { node }
    }

    pub fn kind(&self) -> EnvelopeKind {
        match self {
            Envelope::Welcome(_) => EnvelopeKind::Welcome,
            Envelope::Query { .. } => EnvelopeKind::Query,
            Envelope::NewMessage { .. } => EnvelopeKind::NewMessage,
        }
    }
}
