//! Domain layer: connection identities, repository contract, id assignment.

mod connection;
mod error;
mod id;
mod repository;

pub use connection::{ConnectionId, ConnectionState, Destination, OUTBOUND_CAPACITY};
pub use error::RepositoryError;
pub use id::NodeIdFactory;
pub use repository::MessageRepository;

#[cfg(test)]
pub use repository::MockMessageRepository;
