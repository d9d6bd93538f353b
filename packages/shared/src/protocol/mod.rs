//! Wire protocol shared by the server and the client.
//!
//! A conversation is a tree of [`Node`]s linked by parent ids. Nodes travel
//! inside [`Envelope`]s, which distinguish the handshake (`WELCOME`), ancestor
//! lookups (`QUERY`) and new or looked-up nodes (`NEW_MESSAGE`).

mod envelope;
mod node;

pub use envelope::{Envelope, EnvelopeKind, PROTOCOL_VERSION, ProtocolVersion, Welcome};
pub use node::{Node, NodeId};
