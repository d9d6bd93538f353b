//! Thread view navigation errors.

use bough_shared::protocol::NodeId;
use thiserror::Error;

/// Reasons a cursor move was refused. The view is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Cannot move the cursor while composing a reply")]
    Replying,

    #[error("No message is focused yet")]
    NoCursor,

    #[error("Message '{0}' is not known locally")]
    UnknownMessage(NodeId),

    #[error("Already at the root message")]
    AtRoot,

    #[error("Refusing to move onto unresolved message '{0}'")]
    UnresolvedParent(NodeId),

    #[error("Already at the newest message of the thread")]
    AtLeaf,

    #[error("Message '{0}' is not part of the current thread")]
    NotInThread(NodeId),

    #[error("Message has no siblings")]
    NoSiblings,
}
