//! Fan-out hub delivering every accepted envelope to every connected client.
//!
//! ## Design
//!
//! One dispatch task owns the membership map and handles send, connect and
//! disconnect requests strictly one at a time, so the map needs no lock.
//!
//! Each destination has its own delivery task fed through an unbounded queue.
//! The dispatch task only pushes onto those queues and never waits on a
//! client. A client that stops reading stalls its own delivery task and
//! nobody else's. When the client's receiver goes away, either noticed by a
//! failed delivery or while waiting for work, the delivery task reports a
//! disconnect back to the dispatch task and exits.

use std::{collections::HashMap, sync::Arc};

use bough_shared::protocol::Envelope;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, Destination};

enum BroadcastRequest {
    Send(Arc<Envelope>),
    Connect(Destination),
    Disconnect(ConnectionId),
    ClientCount(oneshot::Sender<usize>),
}

/// Handle to the broadcaster's dispatch task.
///
/// Cheap to clone. The dispatch task stops once every handle is dropped.
#[derive(Clone)]
pub struct Broadcaster {
    requests: mpsc::UnboundedSender<BroadcastRequest>,
}

impl Broadcaster {
    /// Spawn the dispatch task. Must be called inside a tokio runtime.
    pub fn spawn() -> Self {
        let (requests, receiver) = mpsc::unbounded_channel();
        let feedback = requests.downgrade();
        tokio::spawn(run_dispatch(receiver, feedback));
        Self { requests }
    }

    /// Register a destination. Adding an already registered id is a no-op.
    pub fn add(&self, destination: Destination) {
        self.request(BroadcastRequest::Connect(destination));
    }

    /// Queue `envelope` for every destination registered when the dispatch
    /// task gets to it. Returns immediately.
    pub fn send(&self, envelope: Envelope) {
        self.request(BroadcastRequest::Send(Arc::new(envelope)));
    }

    /// Number of currently registered destinations.
    pub async fn client_count(&self) -> usize {
        let (reply, response) = oneshot::channel();
        self.request(BroadcastRequest::ClientCount(reply));
        response.await.unwrap_or_default()
    }

    fn request(&self, request: BroadcastRequest) {
        if self.requests.send(request).is_err() {
            tracing::error!("Broadcaster dispatch task has stopped");
        }
    }
}

async fn run_dispatch(
    mut requests: mpsc::UnboundedReceiver<BroadcastRequest>,
    feedback: mpsc::WeakUnboundedSender<BroadcastRequest>,
) {
    let mut clients: HashMap<ConnectionId, mpsc::UnboundedSender<Arc<Envelope>>> = HashMap::new();

    while let Some(request) = requests.recv().await {
        match request {
            BroadcastRequest::Send(envelope) => {
                // A closed queue means the delivery task already failed and a
                // disconnect is on its way; drop the entry now.
                clients.retain(|id, queue| {
                    let delivered = queue.send(Arc::clone(&envelope)).is_ok();
                    if !delivered {
                        tracing::debug!("Delivery queue for '{}' closed, removing", id);
                    }
                    delivered
                });
                tracing::debug!(
                    "Dispatched {} to {} client(s)",
                    envelope.kind(),
                    clients.len()
                );
            }
            BroadcastRequest::Connect(destination) => {
                if clients.contains_key(&destination.id) {
                    tracing::debug!("Client '{}' is already registered", destination.id);
                    continue;
                }
                let (queue, pending) = mpsc::unbounded_channel();
                tokio::spawn(deliver(destination.clone(), pending, feedback.clone()));
                clients.insert(destination.id, queue);
                tracing::info!(
                    "Client '{}' registered ({} connected)",
                    destination.id,
                    clients.len()
                );
            }
            BroadcastRequest::Disconnect(id) => {
                if clients.remove(&id).is_some() {
                    tracing::info!("Client '{}' removed ({} connected)", id, clients.len());
                }
            }
            BroadcastRequest::ClientCount(reply) => {
                let _ = reply.send(clients.len());
            }
        }
    }
    tracing::debug!("Broadcaster dispatch task finished");
}

/// Forward queued envelopes to one destination, in dispatch order.
///
/// Exits and reports a disconnect as soon as the destination's receiver is
/// gone, whether that shows up as a failed send or while idle.
async fn deliver(
    destination: Destination,
    mut pending: mpsc::UnboundedReceiver<Arc<Envelope>>,
    feedback: mpsc::WeakUnboundedSender<BroadcastRequest>,
) {
    loop {
        tokio::select! {
            next = pending.recv() => {
                let Some(envelope) = next else { return };
                if destination.sender.send(envelope).await.is_err() {
                    tracing::warn!("Error sending to client '{}', removing", destination.id);
                    report_disconnect(&feedback, destination.id);
                    return;
                }
            }
            _ = destination.sender.closed() => {
                tracing::debug!("Client '{}' went away, removing", destination.id);
                report_disconnect(&feedback, destination.id);
                return;
            }
        }
    }
}

fn report_disconnect(feedback: &mpsc::WeakUnboundedSender<BroadcastRequest>, id: ConnectionId) {
    if let Some(requests) = feedback.upgrade() {
        let _ = requests.send(BroadcastRequest::Disconnect(id));
    }
}
