//! Connection identity and outbound destination.

use std::{fmt, sync::Arc};

use bough_shared::protocol::Envelope;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Capacity of each connection's outbound queue.
///
/// When a client stops reading, deliveries to it wait here without holding up
/// anybody else.
pub const OUTBOUND_CAPACITY: usize = 64;

/// Identity of one client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Protocol state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered for broadcasts, welcome not sent yet
    Accepted,
    /// Welcome handed to the outbound queue
    Welcomed,
    /// First inbound envelope processed
    Active,
}

impl ConnectionState {
    /// Advance after the welcome has been queued.
    pub fn welcomed(self) -> Self {
        match self {
            ConnectionState::Accepted => ConnectionState::Welcomed,
            other => other,
        }
    }

    /// Advance after an inbound envelope has been received.
    pub fn activated(self) -> Self {
        ConnectionState::Active
    }
}

/// Outbound side of a client connection, as registered with the broadcaster.
#[derive(Debug, Clone)]
pub struct Destination {
    pub id: ConnectionId,
    pub sender: mpsc::Sender<Arc<Envelope>>,
}

impl Destination {
    /// Create a destination with a fresh id and its receiving end.
    pub fn channel() -> (Self, mpsc::Receiver<Arc<Envelope>>) {
        let (sender, receiver) = mpsc::channel(OUTBOUND_CAPACITY);
        (
            Self {
                id: ConnectionId::generate(),
                sender,
            },
            receiver,
        )
    }
}
